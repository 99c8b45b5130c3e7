//! In-memory threshold source, for embedding and tests.

use crate::domain::RawRow;
use crate::ports::{SourceError, ThresholdSource};

/// Threshold source over rows already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    rows: Vec<RawRow>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl From<Vec<RawRow>> for InMemorySource {
    fn from(rows: Vec<RawRow>) -> Self {
        Self::new(rows)
    }
}

impl ThresholdSource for InMemorySource {
    fn describe(&self) -> String {
        format!("memory:{} rows", self.rows.len())
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        Ok(self.rows.clone())
    }
}
