//! Domain layer: Core screening types and rules.
//!
//! Pure Rust types with no I/O. Building the threshold table and classifying
//! a subject are the two core operations; everything else in the crate feeds
//! them or reports their results.

mod assessment;
mod classification;
mod subject;
mod thresholds;

pub use assessment::Assessment;
pub use classification::{
    classify, ClassificationResult, ClassifyError, WeightStatus, MAX_AGE_YEARS, MIN_AGE_YEARS,
};
pub use subject::{ParseSexError, Sex, Subject};
pub use thresholds::{
    columns, AgeKey, AgeThresholds, RawRow, TableError, ThresholdEntry, ThresholdTable,
};
