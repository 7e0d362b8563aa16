//! Inner join of the company and funding-round tables.

use polars::prelude::*;

const COMPANY_ROW: &str = "__company_row";
const ROUND_ROW: &str = "__round_row";

/// Inner-join `left` and `right` on `left[left_key] == right[right_key]`.
///
/// Rows without a match on the other side are dropped. Both key columns are
/// kept. The result lists the left table's columns followed by the right
/// table's, and rows come in left-table order, then right-table order for
/// keys with several matches, so the output does not depend on how the join
/// was scheduled.
pub fn inner_join_ordered(
    left: &DataFrame,
    right: &DataFrame,
    left_key: &str,
    right_key: &str,
) -> PolarsResult<DataFrame> {
    let args = JoinArgs::new(JoinType::Inner).with_coalesce(JoinCoalesce::KeepColumns);

    let joined = left
        .clone()
        .lazy()
        .with_row_index(COMPANY_ROW, None)
        .join(
            right.clone().lazy().with_row_index(ROUND_ROW, None),
            [col(left_key)],
            [col(right_key)],
            args,
        )
        .sort([COMPANY_ROW, ROUND_ROW], SortMultipleOptions::default())
        .collect()?;

    joined.drop(COMPANY_ROW)?.drop(ROUND_ROW)
}

/// Join companies with their funding rounds and drop the now redundant
/// foreign-key column, keeping the company key under its own name.
pub fn merge_on_key(
    companies: &DataFrame,
    rounds: &DataFrame,
    company_key: &str,
    round_key: &str,
) -> PolarsResult<DataFrame> {
    let merged = inner_join_ordered(companies, rounds, company_key, round_key)?;
    if company_key == round_key {
        return Ok(merged);
    }
    merged.drop(round_key)
}
