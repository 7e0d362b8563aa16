//! Reading the source tables and writing the master table.
//!
//! # Example
//!
//! ```no_run
//! use funding_clean::config::InputSettings;
//! use funding_clean::io::FundingDataLoader;
//!
//! let tables = FundingDataLoader::load_tables(&InputSettings::default())
//!     .expect("Failed to load");
//! println!("Loaded {} companies", tables.companies.height());
//! ```

pub mod loaders;
pub mod writer;


pub use loaders::{FundingDataLoader, SourceTables, TableLoadResult};
pub use writer::{calculate_checksum, serialize_csv, write_master_csv, WriteSummary};
