//! Subject batch reader for delimited text files.
//!
//! Expected header: `age,height,weight,sex` plus an optional `id` column.
//! Every data line becomes one [`SubjectLine`]; a line that fails to parse is
//! kept as an error so the rest of the batch still runs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{ParseSexError, Sex, Subject};
use crate::ports::SourceError;

use super::{cell, line_of, locate_columns, require_columns};

const SUBJECT_COLUMNS: [(&str, &[&str]); 4] = [
    ("age", &["age", "年龄 (岁)"]),
    ("height", &["height", "height_m", "身高 (米)"]),
    ("weight", &["weight", "weight_kg", "体重 (公斤)"]),
    ("sex", &["sex", "gender", "性别"]),
];

const ID_COLUMN: [(&str, &[&str]); 1] = [("id", &["id", "subject_id"])];

/// Why a single subject line could not be turned into a [`Subject`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubjectParseError {
    #[error("column '{0}' is empty")]
    Missing(&'static str),

    #[error("column '{column}': '{value}' is not a number")]
    InvalidNumber { column: &'static str, value: String },

    #[error(transparent)]
    Sex(#[from] ParseSexError),
}

/// One data line of a subject batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectLine {
    /// 1-based line number in the file (header is line 1)
    pub line: u64,

    pub id: Option<String>,

    pub subject: Result<Subject, SubjectParseError>,
}

/// Read a subject batch from any reader.
///
/// # Errors
/// `Schema` if a required column is absent, `Malformed` if the text cannot
/// be parsed as delimited records at all. Per-line problems are returned
/// inside each [`SubjectLine`].
pub fn read_subjects<R: Read>(reader: R, delimiter: u8) -> Result<Vec<SubjectLine>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| SourceError::Malformed(e.to_string()))?
        .clone();
    let indices = require_columns(&headers, &SUBJECT_COLUMNS)?;
    let id_idx = locate_columns(&headers, &ID_COLUMN)[0];

    let mut lines = Vec::new();
    for (n, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| SourceError::Malformed(e.to_string()))?;

        lines.push(SubjectLine {
            line: line_of(&record, n as u64 + 2),
            id: id_idx.and_then(|idx| cell(&record, idx)).map(str::to_string),
            subject: parse_subject(&record, &indices),
        });
    }

    tracing::debug!("Read {} subject lines", lines.len());
    Ok(lines)
}

/// Read a subject batch from a file.
///
/// # Errors
/// As [`read_subjects`], plus `Unavailable` if the file cannot be opened.
pub fn read_subjects_from_path<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
) -> Result<Vec<SubjectLine>, SourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SourceError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    read_subjects(file, delimiter)
}

fn parse_subject(record: &StringRecord, indices: &[usize]) -> Result<Subject, SubjectParseError> {
    let number = |i: usize| -> Result<f64, SubjectParseError> {
        let column = SUBJECT_COLUMNS[i].0;
        let text = cell(record, indices[i]).ok_or(SubjectParseError::Missing(column))?;
        text.parse().map_err(|_| SubjectParseError::InvalidNumber {
            column,
            value: text.to_string(),
        })
    };

    let age = number(0)?;
    let height_m = number(1)?;
    let weight_kg = number(2)?;
    let sex: Sex = cell(record, indices[3])
        .ok_or(SubjectParseError::Missing(SUBJECT_COLUMNS[3].0))?
        .parse()?;

    Ok(Subject::new(age, height_m, weight_kg, sex))
}
