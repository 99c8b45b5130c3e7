//! CLI module: Command-line front end.
//!
//! A thin shell over [`ScreeningService`]: parse arguments, load the table,
//! print reports. All screening rules live in the domain layer.

mod args;
mod render;

pub use args::{Cli, Commands, OutputFormat, SourceFormatArg};
pub use render::{assessment_text, batch_text, status_label, table_text, BatchLine};

use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::{self, delimited};
use crate::application::ScreeningService;
use crate::domain::Subject;
use crate::ports::ThresholdSource;
use crate::GrowthscreenError;

/// Exit status when the threshold data cannot be loaded.
pub const EXIT_STARTUP_FAILURE: u8 = 1;

/// Exit status for a completed assessment.
pub const EXIT_ASSESSED: u8 = 0;

/// Exit status when a single assessment is rejected.
pub const EXIT_REJECTED: u8 = 2;

/// Run a parsed command line, writing reports to stdout.
///
/// # Errors
/// Returns an error for argument problems and output failures. Threshold
/// loading and assessment failures are reported and mapped to an exit code.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let delimiter = cli.delimiter_byte()?;
    let source = adapters::source_for_path(&cli.table, cli.source_format.map(Into::into), delimiter);
    let service = ScreeningService::new(Arc::new(source));

    let stdout = std::io::stdout();
    let color = cli.format == OutputFormat::Text && stdout.is_terminal();
    let mut out = stdout.lock();

    if let Err(e) = service.initialize() {
        eprintln!("Error: {e}");
        eprintln!(
            "Make sure the threshold table exists (--table or GROWTHSCREEN_TABLE_PATH) and has the columns: age, male_overweight, male_obese, female_overweight, female_obese."
        );
        return Ok(ExitCode::from(EXIT_STARTUP_FAILURE));
    }

    match cli.command {
        Commands::Assess {
            age,
            height,
            weight,
            sex,
        } => {
            let status = run_assess(
                &service,
                Subject::new(age, height, weight, sex),
                cli.format,
                color,
                &mut out,
            )?;
            Ok(ExitCode::from(status))
        }
        Commands::Batch { subjects } => {
            let lines = delimited::read_subjects_from_path(&subjects, delimiter)
                .with_context(|| format!("Failed to read subjects from {}", subjects.display()))?;
            let report: Vec<BatchLine> = lines
                .into_iter()
                .map(|line| batch_line(&service, line))
                .collect();

            match cli.format {
                OutputFormat::Text => write!(out, "{}", batch_text(&report, color))?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Table => {
            let table = service.initialize()?;
            match cli.format {
                OutputFormat::Text => write!(out, "{}", table_text(&table))?,
                OutputFormat::Json => {
                    let rows: Vec<serde_json::Value> = table
                        .rows()
                        .into_iter()
                        .map(|(key, thresholds)| {
                            serde_json::json!({
                                "age": key,
                                "male": thresholds.male,
                                "female": thresholds.female,
                            })
                        })
                        .collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_assess<S, W>(
    service: &ScreeningService<S>,
    subject: Subject,
    format: OutputFormat,
    color: bool,
    out: &mut W,
) -> Result<u8>
where
    S: ThresholdSource,
    W: Write,
{
    match service.assess(subject) {
        Ok(assessment) => {
            match format {
                OutputFormat::Text => write!(out, "{}", assessment_text(&assessment, color))?,
                OutputFormat::Json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&assessment)?)?;
                }
            }
            Ok(EXIT_ASSESSED)
        }
        Err(e) if !e.is_startup_fatal() => {
            match format {
                OutputFormat::Text => eprintln!("Assessment not possible: {e}"),
                OutputFormat::Json => {
                    writeln!(out, "{}", serde_json::json!({ "error": e.to_string() }))?;
                }
            }
            Ok(EXIT_REJECTED)
        }
        Err(e) => Err(e.into()),
    }
}

fn batch_line<S: ThresholdSource>(
    service: &ScreeningService<S>,
    line: delimited::SubjectLine,
) -> BatchLine {
    let outcome = line
        .subject
        .map_err(|e| e.to_string())
        .and_then(|subject| {
            service
                .assess(subject)
                .map_err(|e: GrowthscreenError| e.to_string())
        });

    let (assessment, error) = match outcome {
        Ok(assessment) => {
            let assessment = match &line.id {
                Some(id) => assessment.with_subject_id(id.clone()),
                None => assessment,
            };
            (Some(assessment), None)
        }
        Err(error) => (None, Some(error)),
    };

    BatchLine {
        line: line.line,
        id: line.id,
        assessment,
        error,
    }
}
