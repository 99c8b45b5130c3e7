//! Screening service: Loads the threshold table once and assesses subjects.
//!
//! This service coordinates:
//! - Reading raw rows from a threshold source
//! - Building and caching the threshold table
//! - Classifying single subjects and batches

use std::sync::{Arc, OnceLock};

use crate::domain::{classify, Assessment, ClassifyError, Subject, ThresholdTable};
use crate::ports::ThresholdSource;
use crate::GrowthscreenError;

/// Service for weight-status screening.
///
/// # Table Lifecycle
///
/// The threshold table is built on the first call that needs it and then
/// reused for the life of the service. A failed load is not cached: the next
/// call reads the source again. There is no invalidation; the source is
/// assumed static for the process lifetime.
pub struct ScreeningService<S>
where
    S: ThresholdSource,
{
    source: Arc<S>,
    table: OnceLock<Arc<ThresholdTable>>,
}

impl<S> ScreeningService<S>
where
    S: ThresholdSource,
{
    /// Create a new screening service. Nothing is read until first use.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            table: OnceLock::new(),
        }
    }

    /// Create a service around a table that is already built.
    pub fn with_table(source: Arc<S>, table: ThresholdTable) -> Self {
        let service = Self::new(source);
        let _ = service.table.set(Arc::new(table));
        service
    }

    /// Load and build the threshold table if it is not cached yet.
    ///
    /// Failures are only logged at `debug`; reporting them is up to the caller.
    ///
    /// # Errors
    /// Returns `Source` or `Table` errors; both mean no table is available.
    pub fn initialize(&self) -> Result<Arc<ThresholdTable>, GrowthscreenError> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        tracing::info!("Loading threshold table from {}...", self.source.describe());

        let rows = self.source.read_rows().inspect_err(|e| {
            tracing::debug!("Threshold source unavailable: {}", e);
        })?;
        let table = ThresholdTable::build(rows).inspect_err(|e| {
            tracing::debug!("Threshold table rejected: {}", e);
        })?;

        tracing::info!("Threshold table ready: {} age keys", table.len());

        // Another thread may have finished first; keep whichever landed.
        Ok(Arc::clone(self.table.get_or_init(|| Arc::new(table))))
    }

    /// Check if the table has been built.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    /// Assess a single subject.
    ///
    /// # Errors
    /// Startup errors if the table cannot be loaded, otherwise a `Classify`
    /// error for this subject only.
    pub fn assess(&self, subject: Subject) -> Result<Assessment, GrowthscreenError> {
        let table = self.initialize()?;
        Ok(Self::assess_with(&table, subject)?)
    }

    /// Assess many subjects against one table.
    ///
    /// The outer error is a startup failure. Per-subject failures are
    /// returned in place and never stop the rest of the batch.
    ///
    /// # Errors
    /// Returns `Source` or `Table` errors if the table cannot be loaded.
    pub fn assess_batch<I>(
        &self,
        subjects: I,
    ) -> Result<Vec<Result<Assessment, ClassifyError>>, GrowthscreenError>
    where
        I: IntoIterator<Item = Subject>,
    {
        let table = self.initialize()?;

        let results: Vec<_> = subjects
            .into_iter()
            .map(|subject| Self::assess_with(&table, subject))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            "Batch complete: {} assessed, {} rejected",
            results.len() - failed,
            failed
        );

        Ok(results)
    }

    fn assess_with(table: &ThresholdTable, subject: Subject) -> Result<Assessment, ClassifyError> {
        tracing::debug!(
            "Assessing subject: age={}, height={}, weight={}, sex={}",
            subject.age,
            subject.height_m,
            subject.weight_kg,
            subject.sex
        );

        match classify(&subject, table) {
            Ok(result) => {
                tracing::info!(
                    "Assessment complete: outcome={}, bmi={}",
                    result.outcome,
                    result.bmi_display()
                );
                Ok(Assessment::new(subject, result))
            }
            Err(e) => {
                tracing::warn!("Assessment rejected: {}", e);
                Err(e)
            }
        }
    }
}
