//! Age- and sex-specific BMI threshold table.
//!
//! The table maps an [`AgeKey`] (age formatted to one decimal place) and a
//! [`Sex`] to the overweight and obese BMI cut-offs for that age.
//!
//! # Exact-key lookup
//!
//! Lookup is an exact match on the formatted key, never an interval search or
//! interpolation. A source row for age `7.47` is stored under `"7.5"`; a
//! request for age `7.44` looks up `"7.4"` and finds nothing unless a row for
//! that key exists. This is a clinical product decision: the supplied tables
//! define which age granularities are supported, and ages between rows are
//! reported as missing rather than estimated.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::subject::Sex;

/// Logical field names of a threshold row.
pub mod columns {
    pub const AGE: &str = "age";
    pub const MALE_OVERWEIGHT: &str = "male_overweight";
    pub const MALE_OBESE: &str = "male_obese";
    pub const FEMALE_OVERWEIGHT: &str = "female_overweight";
    pub const FEMALE_OBESE: &str = "female_obese";

    /// All required fields, in source column order.
    pub const ALL: [&str; 5] = [
        AGE,
        MALE_OVERWEIGHT,
        MALE_OBESE,
        FEMALE_OVERWEIGHT,
        FEMALE_OBESE,
    ];
}

/// Errors raised while building a [`ThresholdTable`]. All of them are fatal
/// to startup: no partial table is ever returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("Row {row} is missing required fields: {}", .missing.join(", "))]
    Schema {
        row: usize,
        missing: Vec<&'static str>,
    },

    #[error("Row {row} has an invalid age: {age}")]
    InvalidAge { row: usize, age: f64 },

    #[error(
        "Inconsistent thresholds for age {age_key} ({sex}): overweight {overweight} must be a finite value below obese {obese}"
    )]
    DataIntegrity {
        age_key: AgeKey,
        sex: Sex,
        overweight: f64,
        obese: f64,
    },

    #[error("Threshold source contained no rows")]
    Empty,
}

/// Age formatted to one decimal place, e.g. `"7.5"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeKey(String);

impl AgeKey {
    /// Derive the key for an age. Used both when building the table and when
    /// looking a subject up, so the two always agree.
    #[must_use]
    pub fn from_age(age: f64) -> Self {
        Self(format!("{age:.1}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> f64 {
        self.0.parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for AgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Overweight and obese BMI cut-offs for one age and sex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEntry {
    /// Lowest BMI classified as overweight
    pub overweight_bmi: f64,

    /// Lowest BMI classified as obese
    pub obese_bmi: f64,
}

impl ThresholdEntry {
    #[must_use]
    pub fn new(overweight_bmi: f64, obese_bmi: f64) -> Self {
        Self {
            overweight_bmi,
            obese_bmi,
        }
    }

    /// Both cut-offs are finite and strictly ordered.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.overweight_bmi.is_finite()
            && self.obese_bmi.is_finite()
            && self.overweight_bmi < self.obese_bmi
    }
}

/// Cut-offs for both sexes at one age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeThresholds {
    pub male: ThresholdEntry,
    pub female: ThresholdEntry,
}

impl AgeThresholds {
    #[must_use]
    pub fn for_sex(&self, sex: Sex) -> &ThresholdEntry {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }
}

/// One row of the tabular source, as extracted by a source adapter.
///
/// Fields are optional so the builder can name exactly which ones a row is
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub age: Option<f64>,
    pub male_overweight: Option<f64>,
    pub male_obese: Option<f64>,
    pub female_overweight: Option<f64>,
    pub female_obese: Option<f64>,
}

impl RawRow {
    /// A fully populated row.
    #[must_use]
    pub fn new(
        age: f64,
        male_overweight: f64,
        male_obese: f64,
        female_overweight: f64,
        female_obese: f64,
    ) -> Self {
        Self {
            age: Some(age),
            male_overweight: Some(male_overweight),
            male_obese: Some(male_obese),
            female_overweight: Some(female_overweight),
            female_obese: Some(female_obese),
        }
    }

    /// Names of the fields this row does not supply.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            self.age,
            self.male_overweight,
            self.male_obese,
            self.female_overweight,
            self.female_obese,
        ]
        .iter()
        .zip(columns::ALL)
        .filter(|(value, _)| value.is_none())
        .map(|(_, name)| name)
        .collect()
    }
}

/// Immutable lookup table from `(AgeKey, Sex)` to [`ThresholdEntry`].
///
/// Read-only after [`ThresholdTable::build`], so a single instance can be
/// shared across threads (e.g. behind an `Arc`) without locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdTable {
    entries: HashMap<AgeKey, AgeThresholds>,
}

impl ThresholdTable {
    /// Build the table from already-parsed rows.
    ///
    /// When two rows format to the same age key the later row replaces the
    /// earlier one; each replacement is logged at `warn` level.
    ///
    /// # Errors
    /// - `Schema` if a row lacks any of the five fields
    /// - `InvalidAge` if a row's age is not finite
    /// - `DataIntegrity` if either sex's thresholds are non-finite or not
    ///   strictly increasing
    /// - `Empty` if there are no rows at all
    pub fn build<I>(rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut entries: HashMap<AgeKey, AgeThresholds> = HashMap::new();
        let mut row_count = 0usize;

        for (idx, row) in rows.into_iter().enumerate() {
            let row_no = idx + 1;
            row_count = row_no;

            let (age, male, female) = match (
                row.age,
                row.male_overweight,
                row.male_obese,
                row.female_overweight,
                row.female_obese,
            ) {
                (Some(age), Some(mo), Some(mob), Some(fo), Some(fob)) => (
                    age,
                    ThresholdEntry::new(mo, mob),
                    ThresholdEntry::new(fo, fob),
                ),
                _ => {
                    return Err(TableError::Schema {
                        row: row_no,
                        missing: row.missing_fields(),
                    })
                }
            };

            if !age.is_finite() {
                return Err(TableError::InvalidAge { row: row_no, age });
            }

            let age_key = AgeKey::from_age(age);
            for (sex, entry) in [(Sex::Male, male), (Sex::Female, female)] {
                if !entry.is_consistent() {
                    return Err(TableError::DataIntegrity {
                        age_key,
                        sex,
                        overweight: entry.overweight_bmi,
                        obese: entry.obese_bmi,
                    });
                }
            }

            tracing::debug!("Row {}: age {} -> key {}", row_no, age, age_key);
            if entries
                .insert(age_key.clone(), AgeThresholds { male, female })
                .is_some()
            {
                tracing::warn!(
                    "Duplicate age key {} at row {}; later row replaces earlier thresholds",
                    age_key,
                    row_no
                );
            }
        }

        if row_count == 0 {
            return Err(TableError::Empty);
        }

        tracing::debug!(
            "Built threshold table: {} rows, {} distinct age keys",
            row_count,
            entries.len()
        );

        Ok(Self { entries })
    }

    /// Exact-key lookup.
    #[must_use]
    pub fn get(&self, key: &AgeKey, sex: Sex) -> Option<&ThresholdEntry> {
        self.entries.get(key).map(|t| t.for_sex(sex))
    }

    #[must_use]
    pub fn contains(&self, key: &AgeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct age keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys with their thresholds, in ascending numeric age order.
    #[must_use]
    pub fn rows(&self) -> Vec<(&AgeKey, &AgeThresholds)> {
        let mut rows: Vec<_> = self.entries.iter().collect();
        rows.sort_by(|(a, _), (b, _)| a.numeric().total_cmp(&b.numeric()));
        rows
    }
}
