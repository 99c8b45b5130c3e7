//! Report rendering for the command-line front end.

use crossterm::style::{Color, Stylize};
use serde::Serialize;

use crate::domain::{Assessment, ThresholdTable, WeightStatus};

/// Outcome label, colored by [`WeightStatus::color`] when `color` is set.
#[must_use]
pub fn status_label(status: WeightStatus, color: bool) -> String {
    let label = format!("[{status}]");
    if !color {
        return label;
    }
    let (r, g, b) = status.color();
    label.with(Color::Rgb { r, g, b }).bold().to_string()
}

/// Human-readable report for one assessment.
#[must_use]
pub fn assessment_text(assessment: &Assessment, color: bool) -> String {
    let subject = &assessment.subject;
    let result = &assessment.result;

    let mut out = String::new();
    if let Some(id) = &assessment.subject_id {
        out.push_str(&format!("Subject {id}\n"));
    }
    out.push_str(&format!(
        "Weight status: {}  {}\n",
        status_label(result.outcome, color),
        result.outcome.description()
    ));
    out.push_str(&format!("BMI: {}\n", result.bmi_display()));
    out.push_str(&format!(
        "Age: {} years | Sex: {} | Height: {} m | Weight: {} kg\n",
        subject.age, subject.sex, subject.height_m, subject.weight_kg
    ));
    out.push_str(&format!(
        "Reference thresholds (age {}):\n  - Overweight BMI: {}\n  - Obese BMI: {}\n",
        assessment.age_key, result.overweight_threshold, result.obese_threshold
    ));
    out
}

/// The loaded threshold table as aligned text, in age order.
#[must_use]
pub fn table_text(table: &ThresholdTable) -> String {
    let header = format!(
        "{:>6}  {:>15}  {:>10}  {:>17}  {:>12}\n",
        "age", "male_overweight", "male_obese", "female_overweight", "female_obese"
    );

    table
        .rows()
        .into_iter()
        .fold(header, |mut out, (key, thresholds)| {
            out.push_str(&format!(
                "{:>6}  {:>15}  {:>10}  {:>17}  {:>12}\n",
                key.as_str(),
                thresholds.male.overweight_bmi,
                thresholds.male.obese_bmi,
                thresholds.female.overweight_bmi,
                thresholds.female.obese_bmi
            ));
            out
        })
}

/// One line of a batch report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchLine {
    pub line: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One batch line as text.
fn batch_line_text(line: &BatchLine, color: bool) -> String {
    let label = match &line.id {
        Some(id) => format!("Line {} ({id})", line.line),
        None => format!("Line {}", line.line),
    };

    match (&line.assessment, &line.error) {
        (Some(assessment), _) => {
            let result = &assessment.result;
            format!(
                "{label}: {} BMI {} (overweight {}, obese {})\n",
                status_label(result.outcome, color),
                result.bmi_display(),
                result.overweight_threshold,
                result.obese_threshold
            )
        }
        (None, Some(error)) => format!("{label}: error: {error}\n"),
        (None, None) => format!("{label}: no result\n"),
    }
}

/// Human-readable batch report.
#[must_use]
pub fn batch_text(lines: &[BatchLine], color: bool) -> String {
    let mut out: String = lines.iter().map(|line| batch_line_text(line, color)).collect();

    let failed = lines.iter().filter(|l| l.assessment.is_none()).count();
    out.push_str(&format!(
        "{} assessed, {} rejected\n",
        lines.len() - failed,
        failed
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{classify, RawRow, Sex, Subject};

    fn table() -> ThresholdTable {
        ThresholdTable::build(vec![
            RawRow::new(10.0, 19.0, 21.5, 18.5, 21.0),
            RawRow::new(2.0, 18.4, 20.1, 18.0, 19.9),
        ])
        .expect("Should build")
    }

    fn assessment() -> Assessment {
        let subject = Subject::new(10.0, 1.40, 37.24, Sex::Male);
        let result = classify(&subject, &table()).expect("Should classify");
        Assessment::new(subject, result)
    }

    #[test]
    fn test_assessment_text_plain() {
        let text = assessment_text(&assessment(), false);

        assert!(text.contains("[OVERWEIGHT]"));
        assert!(text.contains("BMI: 19.00"));
        assert!(text.contains("Overweight BMI: 19"));
        assert!(text.contains("Obese BMI: 21.5"));
        assert!(text.contains("Sex: male"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_assessment_text_layout() {
        let text = assessment_text(&assessment().with_subject_id("A"), false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Subject A");
        assert!(lines[1].starts_with("Weight status: [OVERWEIGHT]  "));
        assert_eq!(
            lines[2..],
            [
                "BMI: 19.00",
                "Age: 10 years | Sex: male | Height: 1.4 m | Weight: 37.24 kg",
                "Reference thresholds (age 10.0):",
                "  - Overweight BMI: 19",
                "  - Obese BMI: 21.5",
            ]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_colored_label_has_escape_codes() {
        let label = status_label(WeightStatus::Obese, true);
        assert!(label.contains('\u{1b}'));
        assert!(label.contains("[OBESE]"));
    }

    #[test]
    fn test_table_text_in_age_order() {
        let text = table_text(&table());
        let two = text.find("2.0").expect("Row for 2.0");
        let ten = text.find("10.0").expect("Row for 10.0");
        assert!(two < ten);
    }

    #[test]
    fn test_batch_text_and_json() {
        let lines = vec![
            BatchLine {
                line: 2,
                id: Some("A".into()),
                assessment: Some(assessment()),
                error: None,
            },
            BatchLine {
                line: 3,
                id: None,
                assessment: None,
                error: Some("Age 19 is outside the supported range".into()),
            },
        ];

        let text = batch_text(&lines, false);
        assert!(text.contains("Line 2 (A): [OVERWEIGHT] BMI 19.00"));
        assert!(text.contains("Line 3: error: Age 19"));
        assert!(text.contains("1 assessed, 1 rejected"));

        let json = serde_json::to_value(&lines).expect("Should serialize");
        assert_eq!(json[0]["assessment"]["result"]["outcome"], "overweight");
        assert!(json[0].get("error").is_none());
        assert!(json[1].get("assessment").is_none());
    }
}
