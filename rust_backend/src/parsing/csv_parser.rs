use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs;
use std::io::Cursor;

use crate::config::{TableSource, TextEncoding};
use crate::core::error::CleaningError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Transcode ISO-8859-1 bytes to UTF-8.
///
/// Every Latin-1 byte is the code point of the same value, so this cannot
/// fail; bytes 0x80..=0xFF become two-byte UTF-8 sequences.
pub fn latin1_to_utf8(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decode raw file bytes into UTF-8 text according to `encoding`.
pub fn decode_text(bytes: Vec<u8>, encoding: TextEncoding) -> Result<String, CleaningError> {
    match encoding {
        TextEncoding::Latin1 => Ok(latin1_to_utf8(&bytes)),
        TextEncoding::Utf8 => {
            let bytes = match bytes.strip_prefix(UTF8_BOM) {
                Some(rest) => rest.to_vec(),
                None => bytes,
            };
            String::from_utf8(bytes).map_err(|e| {
                CleaningError::Encoding(format!(
                    "invalid UTF-8 at byte {}: {}",
                    e.utf8_error().valid_up_to(),
                    e.utf8_error()
                ))
            })
        }
    }
}

/// Read, decode and parse the table described by `source`.
pub fn parse_table_file(source: &TableSource) -> Result<DataFrame> {
    let bytes = fs::read(&source.path).map_err(|e| CleaningError::Io {
        path: source.path.display().to_string(),
        source: e,
    })?;

    let text = decode_text(bytes, source.encoding)
        .with_context(|| format!("Failed to decode {}", source.path.display()))?;

    parse_table_str(text, source)
        .with_context(|| format!("Failed to parse {}", source.path.display()))
}

/// Parse delimited UTF-8 text into a DataFrame.
///
/// The whole input is used for schema inference. Empty fields and the
/// configured null markers load as null. The table's key column is cast to
/// string and its amount columns to `Float64`. An owned `String` is parsed
/// without copying its bytes.
pub fn parse_table_str(text: impl Into<String>, source: &TableSource) -> Result<DataFrame> {
    let null_values = if source.null_values.is_empty() {
        None
    } else {
        Some(NullValues::AllColumns(
            source.null_values.iter().map(|s| s.as_str().into()).collect(),
        ))
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| {
            opts.with_separator(source.separator)
                .with_null_values(null_values.clone())
                .with_try_parse_dates(source.try_parse_dates)
        })
        .into_reader_with_file_handle(Cursor::new(text.into().into_bytes()))
        .finish()
        .context("Failed to parse CSV into DataFrame")?;

    let key = source.role.key_column();
    if df.column(key).is_err() {
        return Err(CleaningError::missing_column(source.role.to_string(), key).into());
    }

    let float_columns: Vec<&str> = source
        .role
        .float_columns()
        .iter()
        .copied()
        .filter(|name| df.column(name).is_ok())
        .collect();

    let mut lazy_df = df.lazy().with_column(col(key).cast(DataType::String));

    // Unparseable amounts become null and are removed by the null filter
    for name in float_columns {
        lazy_df = lazy_df.with_column(col(name).cast(DataType::Float64));
    }

    let df = lazy_df
        .collect()
        .context("Failed to cast columns to expected types")?;

    Ok(df)
}
