pub mod pipeline;
pub mod validator;

pub use pipeline::{
    clean_funding_data, write_report, CleanedTable, CleaningPipeline, CleaningReport, StageReport,
};
pub use validator::{ReferenceValidator, ValidationResult, ValidationStats};
