//! Resource models exchanged with the back-office REST API
//!
//! Persisted records carry the server-assigned `code` (catalogs) or
//! `numeroInscripcion` (enrollments). The `New*` payloads never carry them.

use serde::{Deserialize, Serialize};

/// Company catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Empresa {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: i64,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rut: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// Payload for creating a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmpresa {
    pub nombre: String,
    pub status: String,
}

/// Account executive catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ejecutivo {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: i64,
    #[serde(default)]
    pub nombres: String,
    #[serde(default)]
    pub apellidos: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl Ejecutivo {
    /// Full name as it appears in the spreadsheet's `Ejecutivo` column
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos).trim().to_string()
    }
}

/// Payload for creating an account executive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEjecutivo {
    pub nombres: String,
    pub apellidos: String,
    pub status: String,
}

impl NewEjecutivo {
    /// Split a free-text full name: the first token becomes `nombres`,
    /// everything after the first space becomes `apellidos`.
    pub fn from_full_name(full_name: &str, status: &str) -> Self {
        let (nombres, apellidos) = match full_name.split_once(' ') {
            Some((first, rest)) => (first, rest),
            None => (full_name, ""),
        };
        Self {
            nombres: nombres.to_string(),
            apellidos: apellidos.to_string(),
            status: status.to_string(),
        }
    }
}

/// Delivery modality catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modalidad {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sincronico: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asincronico: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sincronico_online: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sincronico_presencial_moodle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sincronico_presencial_no_moodle: Option<bool>,
}

/// Payload for creating a modality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewModalidad {
    pub nombre: String,
    pub sincronico: bool,
    pub asincronico: bool,
}

/// Persisted enrollment as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inscripcion {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub numero_inscripcion: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ficha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_alumnos_inscritos: Option<i64>,
}

/// Payload for creating an enrollment.
///
/// Reference fields (`empresa`, `ejecutivo`, `modalidad`) hold catalog codes
/// rendered as strings, or the display name itself when it could not be
/// resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInscripcion {
    pub ficha: String,
    pub correlativo: i64,
    pub codigo_curso: String,
    pub empresa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo_sence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orden_compra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_sence: Option<String>,
    pub id_moodle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_curso: Option<String>,
    pub modalidad: String,
    pub inicio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termino: Option<String>,
    pub ejecutivo: String,
    pub num_alumnos_inscritos: usize,
    pub status_alumnos: String,
}

/// Persisted participant as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participante {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub numero_inscripcion: i64,
    #[serde(default)]
    pub nombres: String,
    #[serde(default)]
    pub apellidos: String,
    #[serde(default)]
    pub rut: String,
}

/// Payload for creating a participant under an existing enrollment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParticipante {
    pub numero_inscripcion: i64,
    pub nombres: String,
    pub apellidos: String,
    pub rut: String,
    pub mail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_cobrado: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub franquicia_porcentaje: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_inscripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacion: Option<String>,
}
