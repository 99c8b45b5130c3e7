//! Assessment record: a classification together with the request it answers.

use serde::{Deserialize, Serialize};

use super::classification::ClassificationResult;
use super::subject::Subject;
use super::thresholds::AgeKey;

/// Complete screening record, as reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Caller-supplied identifier (e.g. from a batch file), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    pub subject: Subject,

    /// Table key the thresholds were taken from
    pub age_key: AgeKey,

    pub result: ClassificationResult,

    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Create an assessment timestamped now.
    #[must_use]
    pub fn new(subject: Subject, result: ClassificationResult) -> Self {
        Self {
            subject_id: None,
            age_key: AgeKey::from_age(subject.age),
            subject,
            result,
            assessed_at: chrono::Utc::now(),
        }
    }

    /// Attach a caller-supplied identifier.
    #[must_use]
    pub fn with_subject_id(mut self, id: impl Into<String>) -> Self {
        self.subject_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Sex, WeightStatus};

    fn result() -> ClassificationResult {
        ClassificationResult {
            outcome: WeightStatus::Normal,
            bmi: 17.5,
            overweight_threshold: 19.0,
            obese_threshold: 21.5,
        }
    }

    #[test]
    fn test_assessment_creation() {
        let subject = Subject::new(10.04, 1.4, 34.3, Sex::Male);
        let assessment = Assessment::new(subject, result());

        assert_eq!(assessment.age_key.as_str(), "10.0");
        assert!(assessment.subject_id.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let subject = Subject::new(10.0, 1.4, 34.3, Sex::Female);
        let assessment = Assessment::new(subject, result()).with_subject_id("row-7");

        let json = serde_json::to_value(&assessment).expect("Should serialize");
        assert_eq!(json["subject_id"], "row-7");
        assert_eq!(json["age_key"], "10.0");
        assert_eq!(json["subject"]["sex"], "female");
        assert_eq!(json["result"]["outcome"], "normal");
    }
}
