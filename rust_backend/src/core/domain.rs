//! Column vocabulary for company and funding-round tables.
//!
//! The cleaning steps never inline column names; they refer to the
//! constants below so the pruned and required column lists can be audited
//! in one place.

use std::fmt;

/// Unique key of the company table.
pub const COMPANY_KEY: &str = "permalink";

/// Foreign key of the funding-round table, referencing [`COMPANY_KEY`].
pub const ROUND_FOREIGN_KEY: &str = "company_permalink";

/// Funding amount column, the quantity the master table is analysed on.
pub const RAISED_AMOUNT: &str = "raised_amount_usd";

/// ISO country code of the company.
pub const COUNTRY_CODE: &str = "country_code";

/// Pipe-separated category list, later joined against a sector mapping.
pub const CATEGORY_LIST: &str = "category_list";

/// Columns expected in `companies_clean.csv`.
pub const COMPANY_COLUMNS: [&str; 10] = [
    COMPANY_KEY,
    "name",
    "homepage_url",
    CATEGORY_LIST,
    "status",
    COUNTRY_CODE,
    "state_code",
    "region",
    "city",
    "founded_at",
];

/// Columns expected in `rounds_clean.csv`.
pub const ROUND_COLUMNS: [&str; 6] = [
    ROUND_FOREIGN_KEY,
    "funding_round_permalink",
    "funding_round_type",
    "funding_round_code",
    "funded_at",
    RAISED_AMOUNT,
];

/// Columns removed from the merged table.
///
/// `funding_round_code` is mostly empty (about 73% missing); the rest are
/// not needed for country/sector level funding analysis.
pub const DROPPED_COLUMNS: [&str; 6] = [
    "funding_round_code",
    "homepage_url",
    "founded_at",
    "state_code",
    "region",
    "city",
];

/// Columns that must be non-null in the master table, in filter order.
pub const REQUIRED_COLUMNS: [&str; 3] = [RAISED_AMOUNT, COUNTRY_CODE, CATEGORY_LIST];

/// Which source table a frame came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetRole {
    Companies,
    Rounds,
}

impl DatasetRole {
    /// Name of the join key column in this table.
    pub fn key_column(self) -> &'static str {
        match self {
            DatasetRole::Companies => COMPANY_KEY,
            DatasetRole::Rounds => ROUND_FOREIGN_KEY,
        }
    }

    /// Columns read as 64-bit floats regardless of what schema inference
    /// picked (all-integer or all-empty amounts would otherwise load as
    /// integers or strings).
    pub fn float_columns(self) -> &'static [&'static str] {
        match self {
            DatasetRole::Companies => &[],
            DatasetRole::Rounds => &[RAISED_AMOUNT],
        }
    }
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetRole::Companies => write!(f, "companies"),
            DatasetRole::Rounds => write!(f, "rounds"),
        }
    }
}
