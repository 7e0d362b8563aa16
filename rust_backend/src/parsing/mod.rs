//! Readers for the delimited company and funding-round tables.
//!
//! The inputs are plain delimited text in either ISO-8859-1 or UTF-8. They
//! are decoded to UTF-8 in memory and handed to the polars CSV reader.
//!
//! # Example
//!
//! ```no_run
//! use funding_clean::config::InputSettings;
//! use funding_clean::parsing::csv_parser::parse_table_file;
//!
//! let source = InputSettings::default().rounds_source().unwrap();
//! let rounds = parse_table_file(&source).expect("Failed to parse rounds");
//! println!("{} rounds", rounds.height());
//! ```

pub mod csv_parser;


pub use csv_parser::{decode_text, latin1_to_utf8, parse_table_file, parse_table_str};
