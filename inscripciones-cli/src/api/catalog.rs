//! Collaborator contract for the import pipeline
//!
//! Reference catalogs expose `list()` / `create()`; enrollments and
//! participants only need `create()`. The HTTP client and the in-memory
//! test store both implement these traits.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::{
    Ejecutivo, Empresa, Inscripcion, Modalidad, NewEjecutivo, NewEmpresa, NewInscripcion,
    NewModalidad, NewParticipante, Participante,
};

/// The three reference catalogs resolved during an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Empresa,
    Ejecutivo,
    Modalidad,
}

impl CatalogKind {
    /// Singular display label
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Empresa => "Empresa",
            CatalogKind::Ejecutivo => "Ejecutivo",
            CatalogKind::Modalidad => "Modalidad",
        }
    }

    /// REST collection name under the API base URL
    pub fn resource(&self) -> &'static str {
        match self {
            CatalogKind::Empresa => "empresas",
            CatalogKind::Ejecutivo => "ejecutivos",
            CatalogKind::Modalidad => "modalidades",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A catalog record that can be matched by display name
pub trait CatalogEntry: DeserializeOwned + Send + Sync + 'static {
    /// Minimal payload used to create a missing entry
    type Draft: Serialize + std::fmt::Debug + Send + Sync;

    const KIND: CatalogKind;

    /// Server-assigned code
    fn code(&self) -> i64;

    /// Canonical display name used for matching (None when the record has none)
    fn display_name(&self) -> Option<String>;
}

impl CatalogEntry for Empresa {
    type Draft = NewEmpresa;
    const KIND: CatalogKind = CatalogKind::Empresa;

    fn code(&self) -> i64 {
        self.code
    }

    fn display_name(&self) -> Option<String> {
        Some(self.nombre.clone())
    }
}

impl CatalogEntry for Ejecutivo {
    type Draft = NewEjecutivo;
    const KIND: CatalogKind = CatalogKind::Ejecutivo;

    fn code(&self) -> i64 {
        self.code
    }

    fn display_name(&self) -> Option<String> {
        Some(self.full_name())
    }
}

impl CatalogEntry for Modalidad {
    type Draft = NewModalidad;
    const KIND: CatalogKind = CatalogKind::Modalidad;

    fn code(&self) -> i64 {
        self.code
    }

    fn display_name(&self) -> Option<String> {
        self.nombre.clone()
    }
}

/// List/create access to one reference catalog
#[async_trait]
pub trait Catalog<E: CatalogEntry>: Send + Sync {
    /// All current entries with their server-assigned codes
    async fn list(&self) -> Result<Vec<E>>;

    /// Create an entry; the echo is informational only
    async fn create(&self, draft: &E::Draft) -> Result<E>;
}

/// Create access to enrollments and their participants
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn create_inscripcion(&self, inscripcion: &NewInscripcion) -> Result<Inscripcion>;

    async fn create_participante(&self, participante: &NewParticipante) -> Result<Participante>;
}

/// Everything the import pipeline writes to
pub trait ImportStore:
    Catalog<Empresa> + Catalog<Ejecutivo> + Catalog<Modalidad> + EnrollmentStore
{
}

impl<T> ImportStore for T where
    T: Catalog<Empresa> + Catalog<Ejecutivo> + Catalog<Modalidad> + EnrollmentStore
{
}
