//! Spreadsheet import pipeline
//!
//! parse -> normalize -> group -> reconcile catalogs -> create enrollments.
//! Only a parse failure (or a concurrent run) aborts the import; every
//! other failure is collected in the returned [`ImportResult`].

pub mod classify;
pub mod create;
pub mod error;
pub mod group;
pub mod normalize;
pub mod reconcile;
pub mod result;
pub mod sheet;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{SecondsFormat, Utc};
use tokio::sync::Semaphore;

pub use classify::{ModalityClassifier, ModalityFacets, SubstringClassifier};
pub use error::ImportError;
pub use group::{EnrollmentGroup, ParticipantDraft};
pub use normalize::SkippedRow;
pub use result::{CreationCounts, ErrorKind, ImportErrorRecord, ImportResult};

use crate::api::ImportStore;
use crate::config::ImportDefaults;

/// Cooperative cancellation flag shared with the caller
#[derive(Debug, Clone, Default)]
pub struct ImportCancel(Arc<AtomicBool>);

impl ImportCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Groups ready to be written, plus the rows that were set aside
#[derive(Debug, Default)]
pub struct PreparedImport {
    pub groups: Vec<EnrollmentGroup>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl PreparedImport {
    pub fn participant_count(&self) -> usize {
        self.groups.iter().map(EnrollmentGroup::headcount).sum()
    }
}

/// Parse, normalize and group a workbook without touching any collaborator.
///
/// `started_at` stands in for missing start dates.
pub fn prepare(
    bytes: &[u8],
    defaults: &ImportDefaults,
    started_at: &str,
) -> Result<PreparedImport, ImportError> {
    let raw = sheet::parse_workbook(bytes)?;
    let normalized = normalize::normalize_rows(&raw);
    let groups = group::group_rows(&normalized.rows, defaults, started_at);

    Ok(PreparedImport {
        groups,
        skipped_rows: normalized.skipped,
    })
}

/// Current instant in the same format as converted spreadsheet dates
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Runs imports against one store, one at a time
pub struct Importer<S: ImportStore> {
    store: S,
    defaults: ImportDefaults,
    classifier: Box<dyn ModalityClassifier>,
    in_flight: Arc<Semaphore>,
}

impl<S: ImportStore> Importer<S> {
    pub fn new(store: S, defaults: ImportDefaults) -> Self {
        Self {
            store,
            defaults,
            classifier: Box::new(SubstringClassifier),
            in_flight: Arc::new(Semaphore::new(1)),
        }
    }

    /// Replace the modality classifier
    pub fn with_classifier(mut self, classifier: impl ModalityClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Import a workbook.
    ///
    /// Fails with `AlreadyRunning` when another run holds this importer, and
    /// with `Parse` when the bytes are not a workbook; neither writes
    /// anything. Otherwise the result carries counts and per-item errors.
    pub async fn run(
        &self,
        bytes: &[u8],
        cancel: &ImportCancel,
    ) -> Result<ImportResult, ImportError> {
        let _permit = self
            .in_flight
            .clone()
            .try_acquire_owned()
            .map_err(|_| ImportError::AlreadyRunning)?;

        let prepared = prepare(bytes, &self.defaults, &now_rfc3339())?;
        log::info!(
            "Importing {} enrollments with {} participants ({} rows skipped)",
            prepared.groups.len(),
            prepared.participant_count(),
            prepared.skipped_rows.len()
        );

        let mut report = ImportResult {
            skipped_rows: prepared.skipped_rows,
            ..Default::default()
        };

        if cancel.is_cancelled() {
            report.cancelled = true;
            return Ok(report);
        }

        let lookups = reconcile::reconcile_all(
            &self.store,
            &prepared.groups,
            &self.defaults,
            self.classifier.as_ref(),
            cancel,
            &mut report,
        )
        .await;

        if cancel.is_cancelled() {
            log::warn!("Import cancelled after catalog reconciliation");
            report.cancelled = true;
            return Ok(report);
        }

        create::create_enrollments(&self.store, &prepared.groups, &lookups, cancel, &mut report)
            .await;

        log::info!(
            "Import finished: {} created, {} errors, {} warnings",
            report.total_created(),
            report.errors.len(),
            report.warnings.len()
        );

        Ok(report)
    }
}
