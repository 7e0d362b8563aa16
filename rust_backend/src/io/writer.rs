//! Master table serialization.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::CleaningError;

/// What was written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub bytes: usize,
    /// SHA-256 of the file contents, hex encoded.
    pub checksum: String,
}

/// Calculate the SHA-256 checksum of serialized output.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Serialize a DataFrame as comma-separated text with a header row and no
/// index column.
pub fn serialize_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut df = df.clone();
    let mut buffer = Vec::new();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)
        .context("Failed to serialize DataFrame as CSV")?;

    Ok(buffer)
}

/// Write the master table to `path`.
///
/// The table is fully serialized before the file is opened, so a
/// serialization failure leaves no file behind.
pub fn write_master_csv(df: &DataFrame, path: &Path) -> Result<WriteSummary> {
    let buffer = serialize_csv(df)?;

    fs::write(path, &buffer).map_err(|e| CleaningError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let summary = WriteSummary {
        path: path.to_path_buf(),
        rows: df.height(),
        columns: df.width(),
        bytes: buffer.len(),
        checksum: calculate_checksum(&buffer),
    };

    log::info!(
        "Wrote {} rows x {} columns to {} (sha256 {})",
        summary.rows,
        summary.columns,
        summary.path.display(),
        summary.checksum
    );

    Ok(summary)
}
