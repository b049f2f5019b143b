//! Import report

use serde::Serialize;

use super::normalize::SkippedRow;
use crate::api::CatalogKind;

/// Ficha recorded for errors not tied to an enrollment
pub const NO_FICHA: &str = "N/A";

/// Which step of the import produced an error entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A catalog could not be listed
    CatalogUnavailable,
    /// A missing catalog entry could not be created
    ReferenceCreation,
    /// An enrollment was rejected; its participants were not attempted
    EnrollmentCreation,
    /// A single participant was rejected
    ParticipantCreation,
}

/// One failure recorded during the run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorRecord {
    pub kind: ErrorKind,
    pub inscripcion_id: Option<i64>,
    pub ficha: String,
    pub participant_label: String,
    pub message: String,
}

/// Entities created on the remote service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreationCounts {
    pub empresas: usize,
    pub ejecutivos: usize,
    pub modalidades: usize,
    pub inscripciones: usize,
    pub participantes: usize,
}

impl CreationCounts {
    pub fn bump_catalog(&mut self, kind: CatalogKind) {
        match kind {
            CatalogKind::Empresa => self.empresas += 1,
            CatalogKind::Ejecutivo => self.ejecutivos += 1,
            CatalogKind::Modalidad => self.modalidades += 1,
        }
    }
}

/// Outcome of one import run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    #[serde(flatten)]
    pub counts: CreationCounts,
    pub errors: Vec<ImportErrorRecord>,
    pub warnings: Vec<String>,
    pub skipped_rows: Vec<SkippedRow>,
    /// Set when the run stopped early on request
    pub cancelled: bool,
}

impl ImportResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Total entities created across all kinds
    pub fn total_created(&self) -> usize {
        let c = &self.counts;
        c.empresas + c.ejecutivos + c.modalidades + c.inscripciones + c.participantes
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn record_catalog_unavailable(&mut self, kind: CatalogKind, message: impl Into<String>) {
        let message = message.into();
        log::error!("Could not list {}: {}", kind.resource(), message);
        self.errors.push(ImportErrorRecord {
            kind: ErrorKind::CatalogUnavailable,
            inscripcion_id: None,
            ficha: NO_FICHA.to_string(),
            participant_label: format!("Catálogo de {}", kind.resource()),
            message,
        });
    }

    pub fn record_reference_failure(
        &mut self,
        kind: CatalogKind,
        name: &str,
        message: impl Into<String>,
    ) {
        let message = message.into();
        log::error!("Could not create {} '{}': {}", kind, name, message);
        self.errors.push(ImportErrorRecord {
            kind: ErrorKind::ReferenceCreation,
            inscripcion_id: None,
            ficha: NO_FICHA.to_string(),
            participant_label: format!("{} \"{}\"", kind.label(), name),
            message,
        });
    }

    pub fn record_enrollment_failure(
        &mut self,
        ficha: &str,
        headcount: usize,
        message: impl Into<String>,
    ) {
        let message = message.into();
        log::error!("Enrollment for ficha {} failed: {}", ficha, message);
        self.errors.push(ImportErrorRecord {
            kind: ErrorKind::EnrollmentCreation,
            inscripcion_id: None,
            ficha: ficha.to_string(),
            participant_label: format!("Inscripción completa ({} participantes)", headcount),
            message,
        });
    }

    pub fn record_participant_failure(
        &mut self,
        ficha: &str,
        inscripcion_id: i64,
        participant_label: String,
        message: impl Into<String>,
    ) {
        let message = message.into();
        log::error!(
            "Participant {} in ficha {} failed: {}",
            participant_label,
            ficha,
            message
        );
        self.errors.push(ImportErrorRecord {
            kind: ErrorKind::ParticipantCreation,
            inscripcion_id: Some(inscripcion_id),
            ficha: ficha.to_string(),
            participant_label,
            message,
        });
    }

    /// Summary lines: catalog counts only when non-zero, enrollments and
    /// participants always
    pub fn summary_lines(&self) -> Vec<String> {
        let c = &self.counts;
        let catalogs = [
            (c.empresas, "empresas creadas"),
            (c.ejecutivos, "ejecutivos creados"),
            (c.modalidades, "modalidades creadas"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0);
        let enrollments = [
            (c.inscripciones, "inscripciones creadas"),
            (c.participantes, "participantes creados"),
        ];

        catalogs
            .chain(enrollments)
            .map(|(n, label)| format!("✓ {} {}", n, label))
            .collect()
    }
}
