use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::CleaningConfig;
use crate::core::domain::{COMPANY_KEY, COUNTRY_CODE, RAISED_AMOUNT, ROUND_FOREIGN_KEY};
use crate::core::error::CleaningError;
use crate::io::loaders::{FundingDataLoader, SourceTables};
use crate::io::writer::{self, WriteSummary};
use crate::preprocessing::validator::{ReferenceValidator, ValidationResult};
use crate::transformations::cleaning;
use crate::transformations::merging;
use crate::transformations::summary::{self, ColumnMissing, NumericSummary, ValueFrequency};

/// How many countries the report lists.
const TOP_COUNTRIES: usize = 10;

/// Shape of the table after one pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: String,
    pub rows: usize,
    pub columns: usize,
    pub missing: Vec<ColumnMissing>,
}

/// Everything the pipeline learned while cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub validation: ValidationResult,
    pub stages: Vec<StageReport>,
    pub amount_summary: Option<NumericSummary>,
    pub top_countries: Vec<ValueFrequency>,
    pub round_rows: usize,
    pub master_rows: usize,
    /// Master rows as a percentage of funding rounds read.
    pub retention_percent: f64,
    pub output: Option<WriteSummary>,
}

impl CleaningReport {
    /// Report for the stage with the given name
    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == name)
    }
}

/// Result of the in-memory part of the pipeline
#[derive(Debug)]
pub struct CleanedTable {
    pub master: DataFrame,
    pub report: CleaningReport,
}

/// Load, validate, merge, prune, filter and write the master table
pub struct CleaningPipeline {
    config: CleaningConfig,
}

impl CleaningPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: CleaningConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run the whole pipeline against the configured files.
    ///
    /// Nothing is written unless every step before the writer succeeds.
    pub fn run(&self) -> Result<CleaningReport> {
        let tables = FundingDataLoader::load_tables(&self.config.input)?;

        let CleanedTable { master, mut report } = self.clean(&tables)?;

        let output = writer::write_master_csv(&master, &self.config.output.path)
            .context("Failed to write master table")?;
        report.output = Some(output);

        if let Some(report_path) = &self.config.output.report_path {
            write_report(&report, report_path)?;
        }

        log::info!(
            "Retained {} of {} funding rounds ({:.2}%)",
            report.master_rows,
            report.round_rows,
            report.retention_percent
        );

        Ok(report)
    }

    /// Produce the master table from already loaded tables.
    ///
    /// # Arguments
    /// * `tables` - Company and funding-round frames as loaded
    ///
    /// # Returns
    /// The master table and a report with one [`StageReport`] per step
    pub fn clean(&self, tables: &SourceTables) -> Result<CleanedTable> {
        let settings = &self.config.cleaning;
        let mut stages = Vec::new();

        // Step 1: Referential check
        let validation = ReferenceValidator::validate(
            &tables.companies,
            &tables.rounds,
            settings.strict_references,
        );
        log_validation(&validation);
        if !validation.is_valid {
            if validation.stats.orphaned_rounds > 0 && settings.strict_references {
                return Err(CleaningError::OrphanedRounds {
                    orphaned: validation.stats.orphaned_rounds,
                }
                .into());
            }
            anyhow::bail!("Validation failed: {}", validation.errors.join("; "));
        }

        stages.push(stage_report("companies", &tables.companies)?);
        stages.push(stage_report("rounds", &tables.rounds)?);

        // Step 2: Inner join, keeping a single key column
        let merged = merging::merge_on_key(
            &tables.companies,
            &tables.rounds,
            COMPANY_KEY,
            ROUND_FOREIGN_KEY,
        )
        .context("Failed to merge companies with funding rounds")?;
        stages.push(stage_report("merged", &merged)?);

        // Step 3: Column pruning
        let (has_columns, issues) =
            cleaning::validate_schema(&merged, settings.drop_columns.as_slice());
        if !has_columns {
            anyhow::bail!("Cannot prune merged table: {}", issues.join("; "));
        }
        let pruned = cleaning::drop_columns(&merged, settings.drop_columns.as_slice())
            .context("Failed to drop columns")?;
        stages.push(stage_report("pruned", &pruned)?);

        let amount_summary = if pruned.column(RAISED_AMOUNT).is_ok() {
            let described = summary::describe_numeric(&pruned, RAISED_AMOUNT)?;
            log::debug!("{} before filtering: {:?}", RAISED_AMOUNT, described);
            Some(described)
        } else {
            None
        };

        // Step 4: Null filters, each on the output of the previous one
        let (has_columns, issues) =
            cleaning::validate_schema(&pruned, settings.required_columns.as_slice());
        if !has_columns {
            anyhow::bail!("Cannot filter missing values: {}", issues.join("; "));
        }
        // Country shares are reported once rows without an amount are gone
        let filters_amount = settings.required_columns.iter().any(|c| c == RAISED_AMOUNT);
        let mut top_countries = if filters_amount {
            Vec::new()
        } else {
            country_frequencies(&pruned)?
        };

        let mut master = pruned;
        for column in &settings.required_columns {
            let before = master.height();
            master = cleaning::drop_missing(&master, column)
                .with_context(|| format!("Failed to drop rows missing {}", column))?;
            log::info!(
                "Dropped {} rows with missing {} ({} remain)",
                before - master.height(),
                column,
                master.height()
            );
            stages.push(stage_report(&format!("dropped missing {}", column), &master)?);

            if column == RAISED_AMOUNT {
                top_countries = country_frequencies(&master)?;
            }
        }

        let round_rows = tables.rounds.height();
        let master_rows = master.height();
        let report = CleaningReport {
            validation,
            stages,
            amount_summary,
            top_countries,
            round_rows,
            master_rows,
            retention_percent: summary::round2(summary::percent_of(master_rows, round_rows)),
            output: None,
        };

        Ok(CleanedTable { master, report })
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to run the pipeline with `config`
pub fn clean_funding_data(config: CleaningConfig) -> Result<CleaningReport> {
    CleaningPipeline::with_config(config).run()
}

/// Write the report as pretty-printed JSON
pub fn write_report(report: &CleaningReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json).map_err(|e| CleaningError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    log::info!("Wrote cleaning report to {}", path.display());
    Ok(())
}

fn country_frequencies(df: &DataFrame) -> Result<Vec<ValueFrequency>> {
    if df.column(COUNTRY_CODE).is_err() {
        return Ok(Vec::new());
    }
    let mut freqs = summary::value_frequencies(df, COUNTRY_CODE)?;
    freqs.truncate(TOP_COUNTRIES);
    Ok(freqs)
}

fn stage_report(stage: &str, df: &DataFrame) -> Result<StageReport> {
    let missing = summary::missing_summary(df)
        .with_context(|| format!("Failed to summarize missing values after {}", stage))?;

    log::info!("{}: {} rows, {} columns", stage, df.height(), df.width());
    for entry in missing.iter().filter(|m| m.missing > 0) {
        log::debug!(
            "  {:<24} {:>8} missing ({:.2}%)",
            entry.column,
            entry.missing,
            entry.percent
        );
    }

    Ok(StageReport {
        stage: stage.to_string(),
        rows: df.height(),
        columns: df.width(),
        missing,
    })
}

fn log_validation(validation: &ValidationResult) {
    let stats = &validation.stats;
    log::info!(
        "Companies: {} rows, {} unique keys; rounds: {} rows, {} unique company references",
        stats.company_rows,
        stats.unique_company_keys,
        stats.round_rows,
        stats.unique_round_keys
    );
    log::info!("Rounds without a matching company: {}", stats.orphaned_rounds);

    for warning in &validation.warnings {
        log::warn!("{}", warning);
    }
    for error in &validation.errors {
        log::error!("{}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleaningSettings;

    fn tables() -> SourceTables {
        let companies = df!(
            "permalink" => &["/organization/a", "/organization/b", "/organization/c"],
            "name" => &["Alpha", "Beta", "Gamma"],
            "homepage_url" => &[Some("http://a.com"), None, None],
            "category_list" => &[Some("Software"), None, Some("Media")],
            "status" => &["operating", "closed", "operating"],
            "country_code" => &[Some("USA"), Some("IND"), None],
            "state_code" => &[Some("CA"), None, None],
            "region" => &[Some("SF Bay Area"), None, None],
            "city" => &[Some("San Francisco"), None, None],
            "founded_at" => &[Some("01-01-2010"), None, None],
        )
        .unwrap();

        let rounds = df!(
            "company_permalink" => &["/organization/a", "/organization/a", "/organization/b", "/organization/c"],
            "funding_round_permalink" => &["/funding-round/1", "/funding-round/2", "/funding-round/3", "/funding-round/4"],
            "funding_round_type" => &["venture", "seed", "venture", "angel"],
            "funding_round_code" => &[Some("A"), None, None, None],
            "funded_at" => &["05-01-2015", "14-10-2014", "01-03-2013", "19-07-2014"],
            "raised_amount_usd" => &[Some(10_000_000.0), None, Some(500_000.0), Some(20_000.0)],
        )
        .unwrap();

        SourceTables { companies, rounds }
    }

    #[test]
    fn test_clean_produces_master_table() {
        let cleaned = CleaningPipeline::new().clean(&tables()).unwrap();
        let master = cleaned.master;

        assert_eq!(master.height(), 1);
        let names: Vec<&str> = master.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "permalink",
                "name",
                "category_list",
                "status",
                "country_code",
                "funding_round_permalink",
                "funding_round_type",
                "funded_at",
                "raised_amount_usd",
            ]
        );
        assert_eq!(
            master.column("funding_round_permalink").unwrap().str().unwrap().get(0),
            Some("/funding-round/1")
        );
    }

    #[test]
    fn test_report_tracks_each_stage() {
        let report = CleaningPipeline::new().clean(&tables()).unwrap().report;

        let stages: Vec<(&str, usize)> =
            report.stages.iter().map(|s| (s.stage.as_str(), s.rows)).collect();
        assert_eq!(
            stages,
            vec![
                ("companies", 3),
                ("rounds", 4),
                ("merged", 4),
                ("pruned", 4),
                ("dropped missing raised_amount_usd", 3),
                ("dropped missing country_code", 2),
                ("dropped missing category_list", 1),
            ]
        );

        // Percentages are relative to the shrinking table
        let after_amount = report.stage("dropped missing raised_amount_usd").unwrap();
        let country = after_amount
            .missing
            .iter()
            .find(|m| m.column == "country_code")
            .unwrap();
        assert_eq!(country.missing, 1);
        assert_eq!(country.percent, 33.33);

        assert_eq!(report.round_rows, 4);
        assert_eq!(report.master_rows, 1);
        assert_eq!(report.retention_percent, 25.0);
        assert_eq!(report.amount_summary.as_ref().unwrap().count, 3);
        assert!(report.output.is_none());
    }

    #[test]
    fn test_source_tables_report_their_missing_values() {
        let report = CleaningPipeline::new().clean(&tables()).unwrap().report;

        let companies = report.stage("companies").unwrap();
        let category = companies
            .missing
            .iter()
            .find(|m| m.column == "category_list")
            .unwrap();
        assert_eq!(category.missing, 1);
        assert_eq!(category.percent, 33.33);

        let rounds = report.stage("rounds").unwrap();
        let amount = rounds
            .missing
            .iter()
            .find(|m| m.column == "raised_amount_usd")
            .unwrap();
        assert_eq!(amount.missing, 1);
        assert_eq!(amount.percent, 25.0);
    }

    #[test]
    fn test_country_shares_taken_after_amount_filter() {
        let report = CleaningPipeline::new().clean(&tables()).unwrap().report;

        // a/1 (USA), b/3 (IND) and c/4 (no country) have amounts
        let countries: Vec<(&str, usize, f64)> = report
            .top_countries
            .iter()
            .map(|f| (f.value.as_str(), f.count, f.percent))
            .collect();
        assert_eq!(countries, vec![("IND", 1, 33.33), ("USA", 1, 33.33)]);

        let covered: f64 = report.top_countries.iter().map(|f| f.percent).sum();
        assert!(covered < 100.0);
    }

    #[test]
    fn test_strict_references_abort_on_orphans() {
        let mut tables = tables();
        tables.rounds = tables
            .rounds
            .vstack(
                &df!(
                    "company_permalink" => &["/organization/zzz"],
                    "funding_round_permalink" => &["/funding-round/9"],
                    "funding_round_type" => &["seed"],
                    "funding_round_code" => &[None::<&str>],
                    "funded_at" => &["01-01-2015"],
                    "raised_amount_usd" => &[Some(1.0)],
                )
                .unwrap(),
            )
            .unwrap();

        let lenient = CleaningPipeline::new().clean(&tables).unwrap();
        assert_eq!(lenient.report.validation.stats.orphaned_rounds, 1);
        assert_eq!(lenient.master.height(), 1);

        let config = CleaningConfig {
            cleaning: CleaningSettings {
                strict_references: true,
                ..CleaningSettings::default()
            },
            ..CleaningConfig::default()
        };
        let err = CleaningPipeline::with_config(config).clean(&tables).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CleaningError>(),
            Some(CleaningError::OrphanedRounds { orphaned: 1 })
        ));
    }

    #[test]
    fn test_missing_drop_column_is_an_error() {
        let mut tables = tables();
        tables.companies = tables.companies.drop("region").unwrap();

        let err = CleaningPipeline::new().clean(&tables).unwrap_err();
        assert!(err.to_string().contains("region"));
    }
}
