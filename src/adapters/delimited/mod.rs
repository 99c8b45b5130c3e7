//! Delimited-text adapter: CSV/TSV threshold tables and subject batches.
//!
//! Headers are matched after removing whitespace and lowercasing, so
//! `Male_Overweight` and `male_overweight ` resolve to the same column.
//! Threshold tables exported from the published workbook keep their Chinese
//! headers (`年龄 (岁)`, `男孩超重 (BMI)`, ...) and are accepted as-is.

mod subjects;
mod thresholds;

pub use subjects::{read_subjects, read_subjects_from_path, SubjectLine, SubjectParseError};
pub use thresholds::CsvThresholdSource;
pub(crate) use thresholds::THRESHOLD_COLUMNS;

use csv::StringRecord;

use crate::ports::SourceError;

/// Normalize a header or alias for comparison.
fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Find the index of each logical column in `headers`.
///
/// `wanted` pairs a logical name with its accepted aliases. Returns one
/// `Option<usize>` per entry, in order.
fn locate_columns(headers: &StringRecord, wanted: &[(&str, &[&str])]) -> Vec<Option<usize>> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    wanted
        .iter()
        .map(|(_, aliases)| {
            aliases.iter().find_map(|alias| {
                let alias = normalize_header(alias);
                normalized.iter().position(|h| *h == alias)
            })
        })
        .collect()
}

/// Resolve required columns, failing with every missing name at once.
pub(crate) fn require_columns(
    headers: &StringRecord,
    wanted: &[(&str, &[&str])],
) -> Result<Vec<usize>, SourceError> {
    let located = locate_columns(headers, wanted);

    let missing: Vec<String> = located
        .iter()
        .zip(wanted)
        .filter(|(idx, _)| idx.is_none())
        .map(|(_, (name, _))| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SourceError::Schema { missing });
    }

    Ok(located.into_iter().flatten().collect())
}

/// Line number of a record for error messages (1-based, header is line 1).
fn line_of(record: &StringRecord, fallback: u64) -> u64 {
    record.position().map_or(fallback, csv::Position::line)
}

/// A cell that is absent or blank.
fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Male_Overweight "), "male_overweight");
        assert_eq!(normalize_header("\u{feff}age"), "age");
        assert_eq!(normalize_header("年龄 (岁)"), "年龄(岁)");
    }

    #[test]
    fn test_require_columns_reports_all_missing() {
        let headers = StringRecord::from(vec!["age", "other"]);
        let wanted: [(&str, &[&str]); 3] = [
            ("age", &["age"]),
            ("height", &["height"]),
            ("weight", &["weight", "mass"]),
        ];

        match require_columns(&headers, &wanted) {
            Err(SourceError::Schema { missing }) => {
                assert_eq!(missing, vec!["height".to_string(), "weight".to_string()]);
            }
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_aliases_resolve_in_any_order() {
        let headers = StringRecord::from(vec!["mass", "AGE"]);
        let wanted: [(&str, &[&str]); 2] = [("age", &["age"]), ("weight", &["weight", "mass"])];

        assert_eq!(
            require_columns(&headers, &wanted).expect("Should resolve"),
            vec![1, 0]
        );
    }
}
