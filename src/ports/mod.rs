//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary between
//! the screening core and wherever threshold data comes from.

mod threshold_source;

pub use threshold_source::{SourceError, ThresholdSource};
