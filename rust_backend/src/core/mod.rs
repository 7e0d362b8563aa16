//! Core domain vocabulary for the funding-round cleaner.
//!
//! This module names the columns of the two source tables and the fixed
//! column lists the cleaning steps act on, plus the crate's error type.

pub mod domain;
pub mod error;

pub use domain::{
    DatasetRole, CATEGORY_LIST, COMPANY_COLUMNS, COMPANY_KEY, COUNTRY_CODE, DROPPED_COLUMNS,
    RAISED_AMOUNT, REQUIRED_COLUMNS, ROUND_COLUMNS, ROUND_FOREIGN_KEY,
};
pub use error::{CleaningError, CleaningResult};
