//! Master table cleaner binary
//!
//! Reads `companies_clean.csv` and `rounds_clean.csv` from the working
//! directory and writes `master_df.csv`. Settings can be overridden in an
//! optional `cleaning.toml` next to the inputs.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin clean_master
//! RUST_LOG=debug cargo run --bin clean_master
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use anyhow::Result;
use log::info;

use funding_clean::{CleaningConfig, CleaningPipeline};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = CleaningConfig::from_default_location()?;
    info!(
        "Cleaning {} and {} into {}",
        config.input.companies_path.display(),
        config.input.rounds_path.display(),
        config.output.path.display()
    );

    let report = CleaningPipeline::with_config(config).run()?;

    if let Some(output) = &report.output {
        info!(
            "Master table: {} rows, {} columns, sha256 {}",
            output.rows, output.columns, output.checksum
        );
    }

    Ok(())
}
