//! Table transformations applied to the merged company/round data.
//!
//! Every operation takes a `&DataFrame` and returns a new one; nothing is
//! modified in place.
//!
//! # Modules
//!
//! - [`merging`]: Ordered inner join on the company key
//! - [`cleaning`]: Drop columns and rows with missing values
//! - [`summary`]: Missing-value, numeric and frequency profiles
//!
//! # Example
//!
//! ```no_run
//! use funding_clean::transformations::{drop_columns, drop_missing};
//! use polars::prelude::*;
//!
//! # fn example(df: DataFrame) -> Result<(), PolarsError> {
//! let pruned = drop_columns(&df, &["funding_round_code"])?;
//! let funded = drop_missing(&pruned, "raised_amount_usd")?;
//! # Ok(())
//! # }
//! ```

pub mod cleaning;
pub mod merging;
pub mod summary;

pub use cleaning::{drop_columns, drop_missing, drop_missing_in, present_mask, validate_schema};
pub use merging::{inner_join_ordered, merge_on_key};
pub use summary::{
    describe_numeric, missing_count, missing_summary, value_frequencies, ColumnMissing,
    NumericSummary, ValueFrequency,
};
