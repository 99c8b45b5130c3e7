//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::SourceFormat;
use crate::domain::Sex;

#[derive(Parser, Debug)]
#[command(name = "growthscreen")]
#[command(about = "Weight-status screening for children and adolescents (ages 2-18)", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Threshold table file (CSV/TSV, JSON or Excel workbook)
    #[arg(
        long,
        global = true,
        env = "GROWTHSCREEN_TABLE_PATH",
        default_value = "thresholds.csv"
    )]
    pub table: PathBuf,

    /// Table file format (detected from the extension when omitted)
    #[arg(long, global = true, value_enum)]
    pub source_format: Option<SourceFormatArg>,

    /// Field delimiter for delimited files
    #[arg(long, global = true, default_value_t = ',')]
    pub delimiter: char,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess one subject
    #[command(allow_negative_numbers = true)]
    Assess {
        /// Age in years (2.0-18.0)
        #[arg(long)]
        age: f64,

        /// Height in meters, e.g. 1.30
        #[arg(long)]
        height: f64,

        /// Weight in kilograms, e.g. 30.5
        #[arg(long)]
        weight: f64,

        /// male/m/boy or female/f/girl
        #[arg(long)]
        sex: Sex,
    },

    /// Assess every subject in a delimited file (columns: age,height,weight,sex[,id])
    Batch {
        /// Subject file
        subjects: PathBuf,
    },

    /// List the loaded threshold table
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceFormatArg {
    Csv,
    Json,
    Xlsx,
}

impl From<SourceFormatArg> for SourceFormat {
    fn from(arg: SourceFormatArg) -> Self {
        match arg {
            SourceFormatArg::Csv => Self::Delimited,
            SourceFormatArg::Json => Self::Json,
            SourceFormatArg::Xlsx => Self::Xlsx,
        }
    }
}

impl Cli {
    /// Delimiter as a single byte.
    ///
    /// # Errors
    /// Returns an error for non-ASCII delimiters.
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow::anyhow!("Delimiter must be a single ASCII character"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assess() {
        let cli = Cli::try_parse_from([
            "growthscreen",
            "--table",
            "t.csv",
            "assess",
            "--age",
            "10",
            "--height",
            "1.4",
            "--weight",
            "37.24",
            "--sex",
            "male",
        ])
        .expect("Should parse");

        assert_eq!(cli.table, PathBuf::from("t.csv"));
        assert_eq!(cli.format, OutputFormat::Text);
        match cli.command {
            Commands::Assess { age, sex, .. } => {
                assert_eq!(age, 10.0);
                assert_eq!(sex, Sex::Male);
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_negative_measurement_reaches_core() {
        let cli = Cli::try_parse_from([
            "growthscreen",
            "assess",
            "--age",
            "10",
            "--height",
            "-1.4",
            "--weight",
            "30",
            "--sex",
            "f",
        ])
        .expect("Should parse");

        assert!(matches!(cli.command, Commands::Assess { height, .. } if height < 0.0));
    }

    #[test]
    fn test_rejects_unknown_sex() {
        assert!(Cli::try_parse_from([
            "growthscreen",
            "assess",
            "--age",
            "10",
            "--height",
            "1.4",
            "--weight",
            "30",
            "--sex",
            "x",
        ])
        .is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["growthscreen", "table", "--format", "json", "--delimiter", ";"])
            .expect("Should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.delimiter_byte().expect("ASCII"), b';');
    }

    #[test]
    fn test_source_format_override() {
        let cli = Cli::try_parse_from([
            "growthscreen",
            "--table",
            "table_weight.dat",
            "--source-format",
            "xlsx",
            "table",
        ])
        .expect("Should parse");

        assert_eq!(cli.source_format, Some(SourceFormatArg::Xlsx));
        assert_eq!(
            cli.source_format.map(SourceFormat::from),
            Some(SourceFormat::Xlsx)
        );
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let cli = Cli::try_parse_from(["growthscreen", "table", "--delimiter", "é"])
            .expect("Should parse");
        assert!(cli.delimiter_byte().is_err());
    }
}
