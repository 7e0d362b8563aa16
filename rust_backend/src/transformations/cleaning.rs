use polars::prelude::*;

/// Remove the named columns. Fails if any of them is absent, leaving the
/// caller's frame untouched.
pub fn drop_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> PolarsResult<DataFrame> {
    let mut result = df.clone();
    for column in columns {
        result = result.drop(column.as_ref())?;
    }
    Ok(result)
}

/// Mask that is `true` where the column holds a usable value: not null, and
/// not NaN for float columns.
pub fn present_mask(column: &Column) -> PolarsResult<BooleanChunked> {
    if column.dtype().is_float() {
        let values = column.cast(&DataType::Float64)?;
        let values = values.f64()?;
        Ok(&values.is_not_null() & &values.is_not_nan().fill_null_with_values(false)?)
    } else {
        Ok(column.is_not_null())
    }
}

/// Remove rows where `column` is null (or NaN).
pub fn drop_missing(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    let mask = present_mask(df.column(column)?)?;
    df.filter(&mask)
}

/// Apply [`drop_missing`] for each column in order, each pass working on
/// the output of the previous one.
pub fn drop_missing_in<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> PolarsResult<DataFrame> {
    let mut result = df.clone();
    for column in columns {
        result = drop_missing(&result, column.as_ref())?;
    }
    Ok(result)
}

/// Validate that a DataFrame carries the required columns
pub fn validate_schema<S: AsRef<str>>(
    df: &DataFrame,
    required_columns: &[S],
) -> (bool, Vec<String>) {
    let mut issues: Vec<String> = Vec::new();

    for column in required_columns {
        let name: &str = column.as_ref();
        if df.column(name).is_err() {
            issues.push(format!("Missing required column: {}", name));
        }
    }

    (issues.is_empty(), issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn master() -> DataFrame {
        df!(
            "permalink" => &["/o/a", "/o/b", "/o/c", "/o/d", "/o/e"],
            "category_list" => &[Some("Software"), Some("Media"), None, Some("Biotech"), Some("Games")],
            "country_code" => &[Some("USA"), None, Some("IND"), Some("GBR"), Some("USA")],
            "city" => &[Some("SF"), None, None, Some("London"), Some("NYC")],
            "raised_amount_usd" => &[Some(1.0), Some(2.0), Some(3.0), None, Some(f64::NAN)],
        )
        .unwrap()
    }

    #[test]
    fn test_drop_columns() {
        let df = master();
        let pruned = drop_columns(&df, &["city"]).unwrap();
        assert_eq!(pruned.width(), 4);
        assert!(pruned.column("city").is_err());
        assert_eq!(df.width(), 5);

        // remaining columns are unchanged
        let before = df.column("country_code").unwrap().as_materialized_series();
        let after = pruned.column("country_code").unwrap().as_materialized_series();
        assert!(after.equals_missing(before));
    }

    #[test]
    fn test_drop_unknown_column_fails() {
        assert!(drop_columns(&master(), &["city", "state_code"]).is_err());
    }

    #[test]
    fn test_drop_missing_treats_nan_as_missing() {
        let cleaned = drop_missing(&master(), "raised_amount_usd").unwrap();
        assert_eq!(cleaned.height(), 3);
        let keys: Vec<Option<&str>> = cleaned
            .column("permalink")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(keys, vec![Some("/o/a"), Some("/o/b"), Some("/o/c")]);
    }

    #[test]
    fn test_drop_missing_in_order() {
        let cleaned =
            drop_missing_in(&master(), &["raised_amount_usd", "country_code", "category_list"])
                .unwrap();
        assert_eq!(cleaned.height(), 1);
        assert_eq!(
            cleaned.column("permalink").unwrap().str().unwrap().get(0),
            Some("/o/a")
        );
        assert_eq!(
            cleaned.column("city").unwrap().str().unwrap().get(0),
            Some("SF")
        );
    }

    #[test]
    fn test_drop_missing_unknown_column_fails() {
        assert!(drop_missing(&master(), "funding_round_code").is_err());
    }

    #[test]
    fn test_validate_schema() {
        let (is_valid, issues) = validate_schema(&master(), &["permalink", "country_code"]);
        assert!(is_valid);
        assert!(issues.is_empty());

        let (is_valid, issues) = validate_schema(&master(), &["permalink", "missing_col"]);
        assert!(!is_valid);
        assert_eq!(issues, vec!["Missing required column: missing_col".to_string()]);
    }

    fn amount_strategy() -> impl Strategy<Value = Option<f64>> {
        prop::option::of(prop_oneof![Just(f64::NAN), -1e9..1e9f64])
    }

    proptest! {
        #[test]
        fn prop_no_missing_values_survive(
            rows in prop::collection::vec(
                (amount_strategy(), prop::option::of("[A-Z]{3}"), prop::option::of("[a-z]{1,8}")),
                0..40,
            )
        ) {
            let amounts: Vec<Option<f64>> = rows.iter().map(|r| r.0).collect();
            let countries: Vec<Option<String>> = rows.iter().map(|r| r.1.clone()).collect();
            let categories: Vec<Option<String>> = rows.iter().map(|r| r.2.clone()).collect();
            let df = df!(
                "raised_amount_usd" => amounts,
                "country_code" => countries,
                "category_list" => categories,
            )
            .unwrap();

            let required = ["raised_amount_usd", "country_code", "category_list"];
            let cleaned = drop_missing_in(&df, &required).unwrap();

            prop_assert!(cleaned.height() <= df.height());
            for name in required {
                let mask = present_mask(cleaned.column(name).unwrap()).unwrap();
                prop_assert!(mask.all());
            }

            let expected = rows
                .iter()
                .filter(|r| r.0.is_some_and(|x| !x.is_nan()) && r.1.is_some() && r.2.is_some())
                .count();
            prop_assert_eq!(cleaned.height(), expected);
        }
    }
}
