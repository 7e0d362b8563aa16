use anyhow::{Context, Result};
use polars::prelude::*;

use crate::config::{InputSettings, TableSource};
use crate::core::domain::DatasetRole;
use crate::parsing::csv_parser;

/// Result of loading one source table
#[derive(Debug)]
pub struct TableLoadResult {
    pub dataframe: DataFrame,
    pub role: DatasetRole,
    pub num_rows: usize,
}

impl TableLoadResult {
    pub fn new(dataframe: DataFrame, role: DatasetRole) -> Self {
        let num_rows = dataframe.height();
        Self {
            dataframe,
            role,
            num_rows,
        }
    }
}

/// Both source tables, ready for validation and merging
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub companies: DataFrame,
    pub rounds: DataFrame,
}

/// Loads the company and funding-round tables
pub struct FundingDataLoader;

impl FundingDataLoader {
    /// Load a single table described by `source`
    pub fn load_table(source: &TableSource) -> Result<TableLoadResult> {
        let df = csv_parser::parse_table_file(source)
            .with_context(|| format!("Failed to load {} table", source.role))?;

        let result = TableLoadResult::new(df, source.role);
        log::info!(
            "Loaded {} table from {}: {} rows, {} columns",
            result.role,
            source.path.display(),
            result.num_rows,
            result.dataframe.width()
        );
        Ok(result)
    }

    /// Load both tables named in the input settings
    pub fn load_tables(input: &InputSettings) -> Result<SourceTables> {
        let companies = Self::load_table(&input.companies_source()?)?;
        let rounds = Self::load_table(&input.rounds_source()?)?;

        Ok(SourceTables {
            companies: companies.dataframe,
            rounds: rounds.dataframe,
        })
    }
}
