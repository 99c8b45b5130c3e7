//! Threshold source port: Trait for reading raw threshold rows.
//!
//! This trait abstracts the tabular data source (CSV file, JSON file, memory)
//! from the table builder. Parsing happens here; validation of the parsed
//! rows happens in [`ThresholdTable::build`](crate::domain::ThresholdTable::build).

use std::path::PathBuf;

use crate::domain::RawRow;

/// Errors raised while reading a threshold source. All are fatal to startup.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Threshold source {} is unavailable: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Threshold source is malformed: {0}")]
    Malformed(String),

    #[error("Threshold source is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
}

/// Trait for threshold data sources.
///
/// Implementations must check that every required column is present before
/// returning any rows, and report absent columns as [`SourceError::Schema`].
/// Individual empty cells are returned as `None` fields.
pub trait ThresholdSource: Send + Sync {
    /// Short description of the source for logs (e.g. a file path).
    fn describe(&self) -> String;

    /// Read every row of the source.
    ///
    /// # Errors
    /// - `Unavailable` if the underlying file cannot be opened or read
    /// - `Malformed` if it cannot be parsed
    /// - `Schema` if required columns are absent
    fn read_rows(&self) -> Result<Vec<RawRow>, SourceError>;
}

impl<T: ThresholdSource + ?Sized> ThresholdSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        (**self).read_rows()
    }
}

impl<T: ThresholdSource + ?Sized> ThresholdSource for std::sync::Arc<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        (**self).read_rows()
    }
}
