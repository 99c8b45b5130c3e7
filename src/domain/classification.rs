//! Weight-status classification.
//!
//! [`classify`] is the core screening rule: validate the subject, compute BMI,
//! look up the age/sex thresholds by exact key and place the BMI in one of
//! three half-open tiers.

use serde::{Deserialize, Serialize};

use super::subject::Subject;
use super::thresholds::{AgeKey, ThresholdEntry, ThresholdTable};

/// Youngest supported age, in years (inclusive).
pub const MIN_AGE_YEARS: f64 = 2.0;

/// Oldest supported age, in years (inclusive).
pub const MAX_AGE_YEARS: f64 = 18.0;

/// Per-request screening errors. None of them are fatal: the caller reports
/// the message and carries on with other requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("Age {0} is outside the supported range (2.0-18.0 years); no assessment possible")]
    AgeOutOfRange(f64),

    #[error("Height and weight must be positive numbers (got height {height_m} m, weight {weight_kg} kg)")]
    InvalidMeasurement { height_m: f64, weight_kg: f64 },

    #[error("No exact thresholds for age {0} in the threshold data")]
    ThresholdsNotFound(AgeKey),
}

/// Weight-status tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightStatus {
    Normal,
    Overweight,
    Obese,
}

impl WeightStatus {
    /// Place a BMI against one threshold entry.
    ///
    /// Each tier is closed on its lower bound: a BMI equal to the overweight
    /// cut-off is `Overweight`, one equal to the obese cut-off is `Obese`.
    #[must_use]
    pub fn from_bmi(bmi: f64, thresholds: &ThresholdEntry) -> Self {
        if bmi < thresholds.overweight_bmi {
            Self::Normal
        } else if bmi < thresholds.obese_bmi {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Normal => "Normal weight for age and sex",
            Self::Overweight => "Overweight for age and sex",
            Self::Obese => "Obese for age and sex",
        }
    }

    /// Display color (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Normal => (16, 185, 129),    // Emerald (#10B981)
            Self::Overweight => (251, 191, 36), // Amber (#FBBF24)
            Self::Obese => (244, 63, 94),      // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for WeightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Overweight => write!(f, "OVERWEIGHT"),
            Self::Obese => write!(f, "OBESE"),
        }
    }
}

/// Outcome of a successful classification with its numeric evidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub outcome: WeightStatus,

    /// Unrounded BMI
    pub bmi: f64,

    pub overweight_threshold: f64,
    pub obese_threshold: f64,
}

impl ClassificationResult {
    /// BMI rounded to two decimals, for display only.
    #[must_use]
    pub fn bmi_display(&self) -> String {
        format!("{:.2}", self.bmi)
    }
}

/// Classify one subject against the threshold table.
///
/// Deterministic and side-effect free.
///
/// # Errors
/// `AgeOutOfRange`, `InvalidMeasurement` (see [`Subject::validate`]) or
/// `ThresholdsNotFound` when the table has no row for the subject's exact
/// age key.
pub fn classify(
    subject: &Subject,
    table: &ThresholdTable,
) -> Result<ClassificationResult, ClassifyError> {
    subject.validate()?;

    let bmi = subject.bmi();

    let age_key = AgeKey::from_age(subject.age);
    let thresholds = table
        .get(&age_key, subject.sex)
        .ok_or(ClassifyError::ThresholdsNotFound(age_key))?;

    Ok(ClassificationResult {
        outcome: WeightStatus::from_bmi(bmi, thresholds),
        bmi,
        overweight_threshold: thresholds.overweight_bmi,
        obese_threshold: thresholds.obese_bmi,
    })
}
