//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the screening use cases of the application.

mod screening;

pub use screening::ScreeningService;
