//! # Growthscreen
//!
//! Weight-status screening for children and adolescents (ages 2-18).
//!
//! A subject's BMI is compared against age- and sex-specific overweight and
//! obese cut-offs taken from a pre-computed threshold table. This crate
//! provides:
//! - Building a validated threshold table from tabular rows
//! - Classifying a subject as normal, overweight or obese
//! - File adapters (CSV/TSV, JSON) and a command-line front end
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and rules (Subject, ThresholdTable, classify)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete threshold sources (delimited text, JSON, memory)
//! - `application`: Use cases orchestrating domain and ports
//! - `cli`: Command-line interface

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod ports;

pub use domain::{
    classify, Assessment, ClassificationResult, Sex, Subject, ThresholdTable, WeightStatus,
};

/// Result type for Growthscreen operations
pub type Result<T> = std::result::Result<T, GrowthscreenError>;

/// Main error type for Growthscreen
#[derive(Debug, thiserror::Error)]
pub enum GrowthscreenError {
    #[error("Threshold data could not be read: {0}")]
    Source(#[from] ports::SourceError),

    #[error("Threshold data is invalid: {0}")]
    Table(#[from] domain::TableError),

    #[error("{0}")]
    Classify(#[from] domain::ClassifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GrowthscreenError {
    /// Whether evaluation must halt until the threshold data is fixed.
    ///
    /// Per-request errors (`Classify`) only affect the request
    /// that raised them.
    #[must_use]
    pub fn is_startup_fatal(&self) -> bool {
        match self {
            Self::Source(_) | Self::Table(_) | Self::Io(_) => true,
            Self::Classify(_) | Self::Serialization(_) => false,
        }
    }
}
