//! Funding-round master table cleaner.
//!
//! Loads company and funding-round tables, checks that rounds reference
//! known companies, joins them, removes redundant and irrelevant columns,
//! drops rows missing an amount, country or category, and writes the
//! result as CSV.

pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod transformations;

pub use config::CleaningConfig;
pub use preprocessing::{CleaningPipeline, CleaningReport};
