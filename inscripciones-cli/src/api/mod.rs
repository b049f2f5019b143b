//! Back-office REST API access
//!
//! Resource models, the collaborator traits the importer is written against,
//! and the reqwest-based client that implements them.

pub mod catalog;
pub mod client;
pub mod models;

#[cfg(test)]
pub mod memory;

pub use catalog::{Catalog, CatalogEntry, CatalogKind, EnrollmentStore, ImportStore};
pub use client::{ApiClient, ApiResponse};
pub use models::{
    Ejecutivo, Empresa, Inscripcion, Modalidad, NewEjecutivo, NewEmpresa, NewInscripcion,
    NewModalidad, NewParticipante, Participante,
};
