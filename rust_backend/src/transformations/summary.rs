//! Column profiles used to report on each cleaning stage.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Missing values in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
    /// Share of the current row count, rounded to two decimals.
    pub percent: f64,
}

/// Descriptive statistics of a numeric column, ignoring missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// How often a value occurs in a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFrequency {
    pub value: String,
    pub count: usize,
    /// Share of the current row count, rounded to two decimals.
    pub percent: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `whole`; zero when `whole` is zero.
pub fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Number of missing entries in a column. NaN counts as missing in float
/// columns.
pub fn missing_count(column: &Column) -> PolarsResult<usize> {
    let nulls = column.null_count();
    if !column.dtype().is_float() {
        return Ok(nulls);
    }

    let values = column.cast(&DataType::Float64)?;
    let nans = values.f64()?.is_nan().num_trues();
    Ok(nulls + nans)
}

/// Missing count and percentage for every column, in column order.
pub fn missing_summary(df: &DataFrame) -> PolarsResult<Vec<ColumnMissing>> {
    let height = df.height();
    df.get_columns()
        .iter()
        .map(|column| {
            let missing = missing_count(column)?;
            Ok(ColumnMissing {
                column: column.name().to_string(),
                missing,
                percent: round2(percent_of(missing, height)),
            })
        })
        .collect()
}

/// Count, mean, sample standard deviation, min, quartiles and max.
///
/// Null and NaN entries are left out of every statistic.
pub fn describe_numeric(df: &DataFrame, column: &str) -> PolarsResult<NumericSummary> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;
    let present = values.filter(&values.is_not_nan())?;

    let count = present.len() - present.null_count();
    let std = if count > 1 { present.std(1) } else { None };

    Ok(NumericSummary {
        count,
        mean: present.mean(),
        std,
        min: present.min(),
        p25: present.quantile(0.25, QuantileMethod::Linear)?,
        median: present.quantile(0.5, QuantileMethod::Linear)?,
        p75: present.quantile(0.75, QuantileMethod::Linear)?,
        max: present.max(),
    })
}

/// Frequency of each non-null value, most frequent first. Ties are ordered
/// by value so the result is stable.
pub fn value_frequencies(df: &DataFrame, column: &str) -> PolarsResult<Vec<ValueFrequency>> {
    let height = df.height();

    let counts = df
        .clone()
        .lazy()
        .select([col(column).cast(DataType::String).alias("value")])
        .filter(col("value").is_not_null())
        .group_by([col("value")])
        .agg([len().alias("count")])
        .sort(
            ["count", "value"],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    let values = counts.column("value")?.str()?;
    let totals = counts.column("count")?.cast(&DataType::UInt64)?;
    let totals = totals.u64()?;

    Ok(values
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(value, count)| {
            let count = count? as usize;
            Some(ValueFrequency {
                value: value?.to_string(),
                count,
                percent: round2(percent_of(count, height)),
            })
        })
        .collect())
}
