//! Threshold table reader for delimited text files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::{columns, RawRow};
use crate::ports::{SourceError, ThresholdSource};

use super::{cell, line_of, require_columns};

/// Accepted headers per logical column: canonical name first, then the
/// headers of the published workbook.
pub(crate) const THRESHOLD_COLUMNS: [(&str, &[&str]); 5] = [
    (columns::AGE, &[columns::AGE, "年龄 (岁)"]),
    (columns::MALE_OVERWEIGHT, &[columns::MALE_OVERWEIGHT, "男孩超重 (BMI)"]),
    (columns::MALE_OBESE, &[columns::MALE_OBESE, "男孩肥胖 (BMI)"]),
    (columns::FEMALE_OVERWEIGHT, &[columns::FEMALE_OVERWEIGHT, "女孩超重 (BMI)"]),
    (columns::FEMALE_OBESE, &[columns::FEMALE_OBESE, "女孩肥胖 (BMI)"]),
];

/// Threshold source backed by a CSV (or other single-byte delimited) file.
#[derive(Debug, Clone)]
pub struct CsvThresholdSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvThresholdSource {
    /// Comma-delimited source at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// Use a different field delimiter (e.g. `b'\t'` or `b';'`).
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse threshold rows from any reader.
    ///
    /// # Errors
    /// `Schema` for absent columns, `Malformed` for unparseable content or
    /// non-numeric cells.
    pub fn parse<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRow>, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| SourceError::Malformed(e.to_string()))?
            .clone();
        let indices = require_columns(&headers, &THRESHOLD_COLUMNS)?;

        let mut rows = Vec::new();
        for (n, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| SourceError::Malformed(e.to_string()))?;
            let line = line_of(&record, n as u64 + 2);

            let mut values = [None; 5];
            for ((value, &idx), (name, _)) in
                values.iter_mut().zip(&indices).zip(&THRESHOLD_COLUMNS)
            {
                *value = match cell(&record, idx) {
                    Some(text) => Some(text.parse::<f64>().map_err(|_| {
                        SourceError::Malformed(format!(
                            "line {line}, column '{name}': '{text}' is not a number"
                        ))
                    })?),
                    None => None,
                };
            }

            let [age, male_overweight, male_obese, female_overweight, female_obese] = values;
            rows.push(RawRow {
                age,
                male_overweight,
                male_obese,
                female_overweight,
                female_obese,
            });
        }

        Ok(rows)
    }
}

impl ThresholdSource for CsvThresholdSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Unavailable {
            path: self.path.clone(),
            source,
        })?;

        let rows = Self::parse(file, self.delimiter)?;
        tracing::debug!("Read {} threshold rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TABLE: &str = "\
age,male_overweight,male_obese,female_overweight,female_obese
10.0,19.0,21.5,18.5,21.0
10.5,19.3,22.0,18.9,21.6
";

    #[test]
    fn test_parse_canonical_headers() {
        let rows = CsvThresholdSource::parse(TABLE.as_bytes(), b',').expect("Should parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRow::new(10.0, 19.0, 21.5, 18.5, 21.0));
        assert_eq!(rows[1].female_obese, Some(21.6));
    }

    #[test]
    fn test_parse_workbook_headers_in_any_order() {
        let input = "\
女孩肥胖 (BMI),年龄 (岁),男孩超重 (BMI),男孩肥胖 (BMI),女孩超重 (BMI),备注
21.0,10.0,19.0,21.5,18.5,note
";
        let rows = CsvThresholdSource::parse(input.as_bytes(), b',').expect("Should parse");
        assert_eq!(rows, vec![RawRow::new(10.0, 19.0, 21.5, 18.5, 21.0)]);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let input = "age,male_overweight,male_obese,female_overweight\n10.0,19.0,21.5,18.5\n";
        match CsvThresholdSource::parse(input.as_bytes(), b',') {
            Err(SourceError::Schema { missing }) => assert_eq!(missing, vec!["female_obese"]),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_cell_becomes_missing_field() {
        let input = "age,male_overweight,male_obese,female_overweight,female_obese\n10.0,19.0,,18.5,21.0\n";
        let rows = CsvThresholdSource::parse(input.as_bytes(), b',').expect("Should parse");
        assert_eq!(rows[0].missing_fields(), vec!["male_obese"]);
    }

    #[test]
    fn test_short_row_becomes_missing_fields() {
        let input = "age,male_overweight,male_obese,female_overweight,female_obese\n10.0,19.0,21.5\n";
        let rows = CsvThresholdSource::parse(input.as_bytes(), b',').expect("Should parse");
        assert_eq!(
            rows[0].missing_fields(),
            vec!["female_overweight", "female_obese"]
        );
    }

    #[test]
    fn test_non_numeric_cell_is_malformed() {
        let input = "age,male_overweight,male_obese,female_overweight,female_obese\n10.0,abc,21.5,18.5,21.0\n";
        match CsvThresholdSource::parse(input.as_bytes(), b',') {
            Err(SourceError::Malformed(msg)) => {
                assert!(msg.contains("line 2"));
                assert!(msg.contains("male_overweight"));
            }
            other => panic!("Expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_alternate_delimiter() {
        let input = "age;male_overweight;male_obese;female_overweight;female_obese\n10.0;19.0;21.5;18.5;21.0\n";
        let rows = CsvThresholdSource::parse(input.as_bytes(), b';').expect("Should parse");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_read_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Temp file");
        file.write_all(TABLE.as_bytes()).expect("Write table");

        let source = CsvThresholdSource::new(file.path());
        assert_eq!(source.read_rows().expect("Should read").len(), 2);
        assert!(source.describe().starts_with("csv:"));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("Temp dir");
        let source = CsvThresholdSource::new(dir.path().join("table_weight.csv"));

        assert!(matches!(
            source.read_rows(),
            Err(SourceError::Unavailable { .. })
        ));
    }
}
