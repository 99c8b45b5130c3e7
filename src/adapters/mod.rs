//! Adapters layer: Concrete implementations of ports.
//!
//! - `delimited`: CSV/TSV threshold tables and subject batches
//! - `json`: JSON threshold tables
//! - `memory`: rows held in memory
//! - `xlsx`: Excel workbooks

pub mod delimited;
pub mod json;
pub mod memory;
pub mod xlsx;

use std::path::Path;

use crate::ports::ThresholdSource;

pub use delimited::CsvThresholdSource;
pub use json::JsonThresholdSource;
pub use memory::InMemorySource;
pub use xlsx::XlsxThresholdSource;

/// File formats a threshold table can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Json,
    Xlsx,
}

impl SourceFormat {
    /// Guess the format from a file extension: `.json` is JSON, `.xlsx` and
    /// `.xls` are workbooks, anything else is delimited text.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls") => {
                Self::Xlsx
            }
            _ => Self::Delimited,
        }
    }
}

/// Build the threshold source for a file.
///
/// `format` overrides extension detection; `delimiter` applies to delimited
/// files only.
#[must_use]
pub fn source_for_path(
    path: &Path,
    format: Option<SourceFormat>,
    delimiter: u8,
) -> Box<dyn ThresholdSource> {
    match format.unwrap_or_else(|| SourceFormat::from_path(path)) {
        SourceFormat::Delimited => {
            Box::new(CsvThresholdSource::new(path).with_delimiter(delimiter))
        }
        SourceFormat::Json => Box::new(JsonThresholdSource::new(path)),
        SourceFormat::Xlsx => Box::new(XlsxThresholdSource::new(path)),
    }
}
