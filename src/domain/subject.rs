//! Subject measurements for weight-status screening.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::classification::{ClassifyError, MAX_AGE_YEARS, MIN_AGE_YEARS};

/// Biological sex, selecting which column of the threshold table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Both variants, in table column order.
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// Error returned when text does not name a sex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized sex '{0}' (expected male/m/boy or female/f/girl)")]
pub struct ParseSexError(pub String);

impl FromStr for Sex {
    type Err = ParseSexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "boy" | "男" => Ok(Self::Male),
            "female" | "f" | "girl" | "女" => Ok(Self::Female),
            _ => Err(ParseSexError(s.to_string())),
        }
    }
}

/// Measurements for a single screening request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Age in years (supported range 2.0-18.0)
    pub age: f64,

    /// Height in meters
    pub height_m: f64,

    /// Weight in kilograms
    pub weight_kg: f64,

    pub sex: Sex,
}

impl Subject {
    #[must_use]
    pub fn new(age: f64, height_m: f64, weight_kg: f64, sex: Sex) -> Self {
        Self {
            age,
            height_m,
            weight_kg,
            sex,
        }
    }

    /// Check the subject against the screening preconditions.
    ///
    /// The age range is checked before the measurements, so a subject that
    /// violates both is reported as out of range.
    ///
    /// # Errors
    /// `AgeOutOfRange` outside 2.0-18.0 years (NaN included), otherwise
    /// `InvalidMeasurement` when height or weight is not a finite positive number.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&self.age) {
            return Err(ClassifyError::AgeOutOfRange(self.age));
        }

        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.height_m) && positive(self.weight_kg)) {
            return Err(ClassifyError::InvalidMeasurement {
                height_m: self.height_m,
                weight_kg: self.weight_kg,
            });
        }

        Ok(())
    }

    /// Body Mass Index, `weight / height^2`, unrounded.
    #[must_use]
    pub fn bmi(&self) -> f64 {
        self.weight_kg / self.height_m.powi(2)
    }
}
