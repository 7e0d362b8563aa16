//! Referential checks between the company and funding-round tables.
//!
//! Every round should reference a company that exists. The check reports
//! how far the data is from that; it does not repair anything. Rounds that
//! fail it are the ones the inner join will drop.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::domain::{COMPANY_KEY, ROUND_FOREIGN_KEY};

/// How many orphaned keys are quoted individually in warnings.
const MAX_LISTED_ORPHANS: usize = 5;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false; warnings are informational.
///
/// # Examples
///
/// ```
/// use funding_clean::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_warning("3 rounds reference unknown companies".to_string());
/// assert!(result.is_valid);
///
/// result.add_error("Missing column: permalink".to_string());
/// assert!(!result.is_valid);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Key statistics of both tables.
///
/// * `orphaned_rounds` - rounds whose foreign key is null or not a company key
/// * `duplicate_company_keys` - company rows repeating an earlier key; each
///   repeat multiplies that company's rounds in the join
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub company_rows: usize,
    pub round_rows: usize,
    pub unique_company_keys: usize,
    pub unique_round_keys: usize,
    pub null_company_keys: usize,
    pub null_round_keys: usize,
    pub duplicate_company_keys: usize,
    pub orphaned_rounds: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds a non-critical warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that funding rounds reference known companies.
pub struct ReferenceValidator;

impl ReferenceValidator {
    /// Validate the foreign-key relationship between the two tables.
    ///
    /// With `strict` set, orphaned rounds are errors; otherwise they are
    /// warnings and the result stays valid. Missing key columns are always
    /// errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use funding_clean::preprocessing::validator::ReferenceValidator;
    /// use polars::prelude::*;
    ///
    /// let companies = df!("permalink" => &["/organization/a"]).unwrap();
    /// let rounds = df!("company_permalink" => &["/organization/a", "/organization/z"]).unwrap();
    ///
    /// let result = ReferenceValidator::validate(&companies, &rounds, false);
    /// assert!(result.is_valid);
    /// assert_eq!(result.stats.orphaned_rounds, 1);
    /// ```
    pub fn validate(companies: &DataFrame, rounds: &DataFrame, strict: bool) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.company_rows = companies.height();
        result.stats.round_rows = rounds.height();

        let company_keys = match Self::key_column(companies, COMPANY_KEY, &mut result) {
            Some(keys) => keys,
            None => return result,
        };
        let round_keys = match Self::key_column(rounds, ROUND_FOREIGN_KEY, &mut result) {
            Some(keys) => keys,
            None => return result,
        };

        let (company_ca, round_ca) = match (company_keys.str(), round_keys.str()) {
            (Ok(c), Ok(r)) => (c, r),
            _ => {
                result.add_error("Key columns could not be read as strings".to_string());
                return result;
            }
        };

        let mut known: HashSet<&str> = HashSet::with_capacity(company_ca.len());
        for key in company_ca.into_iter() {
            match key {
                Some(k) => {
                    if !known.insert(k) {
                        result.stats.duplicate_company_keys += 1;
                    }
                }
                None => result.stats.null_company_keys += 1,
            }
        }
        result.stats.unique_company_keys = known.len();

        let mut referenced: HashSet<&str> = HashSet::new();
        let mut orphans: Vec<&str> = Vec::new();
        for key in round_ca.into_iter() {
            match key {
                Some(k) => {
                    referenced.insert(k);
                    if !known.contains(k) {
                        result.stats.orphaned_rounds += 1;
                        if orphans.len() < MAX_LISTED_ORPHANS && !orphans.contains(&k) {
                            orphans.push(k);
                        }
                    }
                }
                None => {
                    result.stats.null_round_keys += 1;
                    result.stats.orphaned_rounds += 1;
                }
            }
        }
        result.stats.unique_round_keys = referenced.len();

        if result.stats.null_company_keys > 0 {
            result.add_warning(format!(
                "{} companies have no {}",
                result.stats.null_company_keys, COMPANY_KEY
            ));
        }

        if result.stats.duplicate_company_keys > 0 {
            result.add_warning(format!(
                "{} company rows repeat an existing {}",
                result.stats.duplicate_company_keys, COMPANY_KEY
            ));
        }

        if result.stats.orphaned_rounds > 0 {
            let mut message = format!(
                "{} of {} rounds reference no known company and will be dropped by the join",
                result.stats.orphaned_rounds, result.stats.round_rows
            );
            if !orphans.is_empty() {
                message.push_str(&format!(" (e.g. {})", orphans.join(", ")));
            }

            if strict {
                result.add_error(message);
            } else {
                result.add_warning(message);
            }
        }

        result
    }

    fn key_column(df: &DataFrame, name: &str, result: &mut ValidationResult) -> Option<Column> {
        match df.column(name).and_then(|c| c.cast(&DataType::String)) {
            Ok(column) => Some(column),
            Err(_) => {
                result.add_error(format!("Missing required column: {}", name));
                None
            }
        }
    }
}
