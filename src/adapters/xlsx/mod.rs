//! Spreadsheet adapter: threshold tables kept as an Excel workbook.
//!
//! Only the first worksheet is read. Its first used row is the header and
//! goes through the same column matching as delimited files, so the
//! workbook's Chinese headers resolve directly.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::StringRecord;

use crate::domain::RawRow;
use crate::ports::{SourceError, ThresholdSource};

use super::delimited::{require_columns, THRESHOLD_COLUMNS};

/// Threshold source backed by an `.xlsx`/`.xls` workbook.
#[derive(Debug, Clone)]
pub struct XlsxThresholdSource {
    path: PathBuf,
}

impl XlsxThresholdSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse threshold rows from the bytes of a workbook.
    ///
    /// # Errors
    /// `Malformed` if the bytes are not a readable workbook or a cell is not
    /// numeric, `Schema` if the first sheet lacks required columns.
    pub fn parse(bytes: Vec<u8>) -> Result<Vec<RawRow>, SourceError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SourceError::Malformed("workbook has no worksheets".into()))?
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        let first_line = range.start().map_or(1, |(row, _)| u64::from(row) + 1);
        let mut rows = range.rows();

        let headers: StringRecord = rows
            .next()
            .map(|cells| cells.iter().map(ToString::to_string).collect())
            .unwrap_or_default();
        let indices = require_columns(&headers, &THRESHOLD_COLUMNS)?;

        let mut parsed = Vec::new();
        for (n, cells) in rows.enumerate() {
            let line = first_line + 1 + n as u64;

            let mut values = [None; 5];
            for ((value, &idx), (name, _)) in
                values.iter_mut().zip(&indices).zip(&THRESHOLD_COLUMNS)
            {
                *value = number(cells.get(idx)).map_err(|text| {
                    SourceError::Malformed(format!(
                        "line {line}, column '{name}': '{text}' is not a number"
                    ))
                })?;
            }

            let [age, male_overweight, male_obese, female_overweight, female_obese] = values;
            parsed.push(RawRow {
                age,
                male_overweight,
                male_obese,
                female_overweight,
                female_obese,
            });
        }

        Ok(parsed)
    }
}

/// Numeric value of a cell. Blank cells are `None`; anything that is not a
/// number comes back as its text.
fn number(cell: Option<&Data>) -> Result<Option<f64>, String> {
    match cell {
        None | Some(Data::Empty) => Ok(None),
        Some(Data::Float(value)) => Ok(Some(*value)),
        Some(Data::Int(value)) => Ok(Some(*value as f64)),
        Some(Data::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(|_| text.to_string())
            }
        }
        Some(other) => Err(other.to_string()),
    }
}

impl ThresholdSource for XlsxThresholdSource {
    fn describe(&self) -> String {
        format!("xlsx:{}", self.path.display())
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        let bytes = std::fs::read(&self.path).map_err(|source| SourceError::Unavailable {
            path: self.path.clone(),
            source,
        })?;

        let rows = Self::parse(bytes)?;
        tracing::debug!("Read {} threshold rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }
}
