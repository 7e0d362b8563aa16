//! Cleaning configuration file support.
//!
//! Every setting has a default that reproduces the standard run: read
//! `companies_clean.csv` (tab separated) and `rounds_clean.csv` (comma
//! separated), both ISO-8859-1, and write `master_df.csv`. A `cleaning.toml`
//! only needs the keys it overrides:
//!
//! ```toml
//! [input]
//! companies_path = "data/companies_clean.csv"
//!
//! [output]
//! report_path = "master_report.json"
//!
//! [cleaning]
//! strict_references = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::domain::{DatasetRole, DROPPED_COLUMNS, REQUIRED_COLUMNS};
use crate::core::error::{CleaningError, CleaningResult};

/// Null markers recognised in both input tables besides empty fields.
///
/// Mirrors the markers pandas treats as missing by default.
pub const DEFAULT_NULL_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Top-level cleaning configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub cleaning: CleaningSettings,
}

/// Text encoding of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "iso-8859-1", alias = "latin1", alias = "latin-1")]
    Latin1,
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
}

/// Input table settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_companies_path")]
    pub companies_path: PathBuf,
    #[serde(default = "default_companies_separator")]
    pub companies_separator: char,
    #[serde(default = "default_rounds_path")]
    pub rounds_path: PathBuf,
    #[serde(default = "default_rounds_separator")]
    pub rounds_separator: char,
    #[serde(default = "default_encoding")]
    pub encoding: TextEncoding,
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,
    #[serde(default)]
    pub try_parse_dates: bool,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

/// Cleaning step settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSettings {
    /// Abort instead of warning when rounds reference unknown companies.
    #[serde(default)]
    pub strict_references: bool,
    #[serde(default = "default_drop_columns")]
    pub drop_columns: Vec<String>,
    #[serde(default = "default_required_columns")]
    pub required_columns: Vec<String>,
}

/// Everything the loader needs to read one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSource {
    pub role: DatasetRole,
    pub path: PathBuf,
    pub separator: u8,
    pub encoding: TextEncoding,
    pub null_values: Vec<String>,
    pub try_parse_dates: bool,
}

fn default_companies_path() -> PathBuf {
    PathBuf::from("companies_clean.csv")
}

fn default_companies_separator() -> char {
    '\t'
}

fn default_rounds_path() -> PathBuf {
    PathBuf::from("rounds_clean.csv")
}

fn default_rounds_separator() -> char {
    ','
}

fn default_encoding() -> TextEncoding {
    TextEncoding::Latin1
}

fn default_null_values() -> Vec<String> {
    DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("master_df.csv")
}

fn default_drop_columns() -> Vec<String> {
    DROPPED_COLUMNS.iter().map(|s| s.to_string()).collect()
}

fn default_required_columns() -> Vec<String> {
    REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect()
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            companies_path: default_companies_path(),
            companies_separator: default_companies_separator(),
            rounds_path: default_rounds_path(),
            rounds_separator: default_rounds_separator(),
            encoding: default_encoding(),
            null_values: default_null_values(),
            try_parse_dates: false,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            report_path: None,
        }
    }
}

impl Default for CleaningSettings {
    fn default() -> Self {
        Self {
            strict_references: false,
            drop_columns: default_drop_columns(),
            required_columns: default_required_columns(),
        }
    }
}

impl InputSettings {
    /// Source description for the company table.
    pub fn companies_source(&self) -> CleaningResult<TableSource> {
        self.source(
            DatasetRole::Companies,
            &self.companies_path,
            self.companies_separator,
        )
    }

    /// Source description for the funding-round table.
    pub fn rounds_source(&self) -> CleaningResult<TableSource> {
        self.source(DatasetRole::Rounds, &self.rounds_path, self.rounds_separator)
    }

    fn source(&self, role: DatasetRole, path: &Path, separator: char) -> CleaningResult<TableSource> {
        Ok(TableSource {
            role,
            path: path.to_path_buf(),
            separator: separator_byte(role, separator)?,
            encoding: self.encoding,
            null_values: self.null_values.clone(),
            try_parse_dates: self.try_parse_dates,
        })
    }
}

/// The CSV reader splits on a single byte, so only ASCII separators work.
fn separator_byte(role: DatasetRole, separator: char) -> CleaningResult<u8> {
    if separator.is_ascii() && separator != '"' && separator != '\n' && separator != '\r' {
        Ok(separator as u8)
    } else {
        Err(CleaningError::Configuration(format!(
            "Invalid separator {:?} for {} table: must be a single ASCII character other than a quote or newline",
            separator, role
        )))
    }
}

impl CleaningConfig {
    /// Load cleaning configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(CleaningConfig)` if successful
    /// * `Err(CleaningError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> CleaningResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            CleaningError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse cleaning configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CleaningResult<Self> {
        let config: CleaningConfig = toml::from_str(content).map_err(|e| {
            CleaningError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load `cleaning.toml` from the working directory, falling back to the
    /// defaults when it does not exist.
    pub fn from_default_location() -> CleaningResult<Self> {
        let path = PathBuf::from("cleaning.toml");
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::from_file(&path)
        } else {
            log::debug!("No cleaning.toml found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> CleaningResult<()> {
        self.input.companies_source()?;
        self.input.rounds_source()?;

        if self.cleaning.required_columns.is_empty() {
            return Err(CleaningError::Configuration(
                "'cleaning.required_columns' must name at least one column".to_string(),
            ));
        }

        if let Some(col) = self
            .cleaning
            .required_columns
            .iter()
            .find(|c| self.cleaning.drop_columns.contains(c))
        {
            return Err(CleaningError::Configuration(format!(
                "Column '{}' is both dropped and required",
                col
            )));
        }

        Ok(())
    }
}
