//! JSON adapter: Threshold tables stored as an array of row objects.
//!
//! ```json
//! [
//!   { "age": 10.0, "male_overweight": 19.0, "male_obese": 21.5,
//!     "female_overweight": 18.5, "female_obese": 21.0 }
//! ]
//! ```
//!
//! A key absent from one object is a missing field on that row. A key absent
//! from every object is treated as a missing column.

use std::path::{Path, PathBuf};

use crate::domain::RawRow;
use crate::ports::{SourceError, ThresholdSource};

/// Threshold source backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonThresholdSource {
    path: PathBuf,
}

impl JsonThresholdSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse threshold rows from JSON text.
    ///
    /// # Errors
    /// `Malformed` if the text is not an array of row objects, `Schema` if
    /// some field appears in none of the rows.
    pub fn parse(content: &str) -> Result<Vec<RawRow>, SourceError> {
        let rows: Vec<RawRow> =
            serde_json::from_str(content).map_err(|e| SourceError::Malformed(e.to_string()))?;

        if !rows.is_empty() {
            let mut absent: Option<Vec<&'static str>> = None;
            for row in &rows {
                let missing = row.missing_fields();
                absent = Some(match absent {
                    None => missing,
                    Some(prev) => prev.into_iter().filter(|f| missing.contains(f)).collect(),
                });
            }

            let missing: Vec<String> = absent
                .unwrap_or_default()
                .into_iter()
                .map(str::to_string)
                .collect();
            if !missing.is_empty() {
                return Err(SourceError::Schema { missing });
            }
        }

        Ok(rows)
    }
}

impl ThresholdSource for JsonThresholdSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| SourceError::Unavailable {
                path: self.path.clone(),
                source,
            })?;

        let rows = Self::parse(&content)?;
        tracing::debug!("Read {} threshold rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let content = r#"[
            {"age": 10.0, "male_overweight": 19.0, "male_obese": 21.5, "female_overweight": 18.5, "female_obese": 21.0},
            {"age": 11.0, "male_overweight": 19.6, "male_obese": 22.3}
        ]"#;
        let rows = JsonThresholdSource::parse(content).expect("Should parse");

        assert_eq!(rows[0], RawRow::new(10.0, 19.0, 21.5, 18.5, 21.0));
        assert_eq!(
            rows[1].missing_fields(),
            vec!["female_overweight", "female_obese"]
        );
    }

    #[test]
    fn test_field_absent_everywhere_is_schema_error() {
        let content = r#"[
            {"age": 10.0, "male_overweight": 19.0, "male_obese": 21.5, "female_overweight": 18.5},
            {"age": 11.0, "male_overweight": 19.6, "male_obese": 22.3, "female_overweight": 19.0}
        ]"#;
        match JsonThresholdSource::parse(content) {
            Err(SourceError::Schema { missing }) => assert_eq!(missing, vec!["female_obese"]),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            JsonThresholdSource::parse("{ not json"),
            Err(SourceError::Malformed(_))
        ));
        assert!(matches!(
            JsonThresholdSource::parse(r#"[{"age": "ten"}]"#),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("Temp dir");
        let source = JsonThresholdSource::new(dir.path().join("thresholds.json"));
        assert!(matches!(
            source.read_rows(),
            Err(SourceError::Unavailable { .. })
        ));
    }
}
