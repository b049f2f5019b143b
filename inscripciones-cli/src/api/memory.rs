//! In-memory collaborator used by the pipeline tests
//!
//! Assigns sequential codes, records every call in order and can be told to
//! fail specific creates or listings.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::catalog::{Catalog, CatalogKind, EnrollmentStore};
use super::models::{
    Ejecutivo, Empresa, Inscripcion, Modalidad, NewEjecutivo, NewEmpresa, NewInscripcion,
    NewModalidad, NewParticipante, Participante,
};

#[derive(Debug, Default)]
struct State {
    next_code: i64,
    empresas: Vec<Empresa>,
    ejecutivos: Vec<Ejecutivo>,
    modalidades: Vec<Modalidad>,
    inscripciones: Vec<NewInscripcion>,
    participantes: Vec<NewParticipante>,
    calls: Vec<String>,
    failing_names: HashSet<String>,
    failing_lists: HashSet<CatalogKind>,
    failing_fichas: HashSet<String>,
    failing_ruts: HashSet<String>,
}

impl State {
    fn next_code(&mut self) -> i64 {
        self.next_code += 1;
        self.next_code
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn with_empresa(self, nombre: &str) -> Self {
        self.with_state(|s| {
            let code = s.next_code();
            s.empresas.push(Empresa {
                id: None,
                code,
                nombre: nombre.to_string(),
                holding: None,
                rut: None,
                status: "Activo".to_string(),
            });
        });
        self
    }

    pub fn with_ejecutivo(self, nombres: &str, apellidos: &str) -> Self {
        self.with_state(|s| {
            let code = s.next_code();
            s.ejecutivos.push(Ejecutivo {
                id: None,
                code,
                nombres: nombres.to_string(),
                apellidos: apellidos.to_string(),
                email: None,
                status: "Activo".to_string(),
            });
        });
        self
    }

    pub fn with_modalidad(self, nombre: &str) -> Self {
        self.with_state(|s| {
            let code = s.next_code();
            s.modalidades.push(Modalidad {
                id: None,
                code,
                nombre: Some(nombre.to_string()),
                sincronico: None,
                asincronico: None,
                sincronico_online: None,
                sincronico_presencial_moodle: None,
                sincronico_presencial_no_moodle: None,
            });
        });
        self
    }

    /// Fail any catalog create whose display name equals `name`
    pub fn fail_create(self, name: &str) -> Self {
        self.with_state(|s| s.failing_names.insert(name.to_string()));
        self
    }

    pub fn fail_list(self, kind: CatalogKind) -> Self {
        self.with_state(|s| s.failing_lists.insert(kind));
        self
    }

    pub fn fail_inscripcion(self, ficha: &str) -> Self {
        self.with_state(|s| s.failing_fichas.insert(ficha.to_string()));
        self
    }

    pub fn fail_participante(self, rut: &str) -> Self {
        self.with_state(|s| s.failing_ruts.insert(rut.to_string()));
        self
    }

    pub fn empresas(&self) -> Vec<Empresa> {
        self.with_state(|s| s.empresas.clone())
    }

    pub fn ejecutivos(&self) -> Vec<Ejecutivo> {
        self.with_state(|s| s.ejecutivos.clone())
    }

    pub fn modalidades(&self) -> Vec<Modalidad> {
        self.with_state(|s| s.modalidades.clone())
    }

    /// Enrollment payloads that were accepted
    pub fn inscripciones(&self) -> Vec<NewInscripcion> {
        self.with_state(|s| s.inscripciones.clone())
    }

    /// Participant payloads that were accepted
    pub fn participantes(&self) -> Vec<NewParticipante> {
        self.with_state(|s| s.participantes.clone())
    }

    /// Every collaborator call in order, e.g. `create:inscripcion:2506-001`
    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }

    /// Calls that wrote something (attempted creates)
    pub fn write_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("create:"))
            .collect()
    }
}

fn check_list(state: &mut State, kind: CatalogKind) -> Result<()> {
    state.calls.push(format!("list:{}", kind.resource()));
    if state.failing_lists.contains(&kind) {
        bail!("{} listing unavailable", kind.resource());
    }
    Ok(())
}

fn check_create(state: &mut State, kind: CatalogKind, name: &str) -> Result<()> {
    state.calls.push(format!("create:{}:{}", kind.resource(), name));
    if state.failing_names.contains(name) {
        bail!("Error creating {}", kind.label().to_lowercase());
    }
    Ok(())
}

#[async_trait]
impl Catalog<Empresa> for MemoryStore {
    async fn list(&self) -> Result<Vec<Empresa>> {
        self.with_state(|s| {
            check_list(s, CatalogKind::Empresa)?;
            Ok(s.empresas.clone())
        })
    }

    async fn create(&self, draft: &NewEmpresa) -> Result<Empresa> {
        self.with_state(|s| {
            check_create(s, CatalogKind::Empresa, &draft.nombre)?;
            let empresa = Empresa {
                id: None,
                code: s.next_code(),
                nombre: draft.nombre.clone(),
                holding: None,
                rut: None,
                status: draft.status.clone(),
            };
            s.empresas.push(empresa.clone());
            Ok(empresa)
        })
    }
}

#[async_trait]
impl Catalog<Ejecutivo> for MemoryStore {
    async fn list(&self) -> Result<Vec<Ejecutivo>> {
        self.with_state(|s| {
            check_list(s, CatalogKind::Ejecutivo)?;
            Ok(s.ejecutivos.clone())
        })
    }

    async fn create(&self, draft: &NewEjecutivo) -> Result<Ejecutivo> {
        self.with_state(|s| {
            let full_name = format!("{} {}", draft.nombres, draft.apellidos)
                .trim()
                .to_string();
            check_create(s, CatalogKind::Ejecutivo, &full_name)?;
            let ejecutivo = Ejecutivo {
                id: None,
                code: s.next_code(),
                nombres: draft.nombres.clone(),
                apellidos: draft.apellidos.clone(),
                email: None,
                status: draft.status.clone(),
            };
            s.ejecutivos.push(ejecutivo.clone());
            Ok(ejecutivo)
        })
    }
}

#[async_trait]
impl Catalog<Modalidad> for MemoryStore {
    async fn list(&self) -> Result<Vec<Modalidad>> {
        self.with_state(|s| {
            check_list(s, CatalogKind::Modalidad)?;
            Ok(s.modalidades.clone())
        })
    }

    async fn create(&self, draft: &NewModalidad) -> Result<Modalidad> {
        self.with_state(|s| {
            check_create(s, CatalogKind::Modalidad, &draft.nombre)?;
            let modalidad = Modalidad {
                id: None,
                code: s.next_code(),
                nombre: Some(draft.nombre.clone()),
                sincronico: Some(draft.sincronico),
                asincronico: Some(draft.asincronico),
                sincronico_online: None,
                sincronico_presencial_moodle: None,
                sincronico_presencial_no_moodle: None,
            };
            s.modalidades.push(modalidad.clone());
            Ok(modalidad)
        })
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn create_inscripcion(&self, inscripcion: &NewInscripcion) -> Result<Inscripcion> {
        self.with_state(|s| {
            s.calls.push(format!("create:inscripcion:{}", inscripcion.ficha));
            if s.failing_fichas.contains(&inscripcion.ficha) {
                bail!("Error creating inscripción (500)");
            }
            let numero = s.next_code();
            s.inscripciones.push(inscripcion.clone());
            Ok(Inscripcion {
                id: None,
                numero_inscripcion: numero,
                ficha: Some(inscripcion.ficha.clone()),
                num_alumnos_inscritos: Some(inscripcion.num_alumnos_inscritos as i64),
            })
        })
    }

    async fn create_participante(&self, participante: &NewParticipante) -> Result<Participante> {
        self.with_state(|s| {
            s.calls.push(format!(
                "create:participante:{}:{}",
                participante.numero_inscripcion, participante.rut
            ));
            if s.failing_ruts.contains(&participante.rut) {
                bail!("Error creating participante");
            }
            s.participantes.push(participante.clone());
            Ok(Participante {
                id: None,
                numero_inscripcion: participante.numero_inscripcion,
                nombres: participante.nombres.clone(),
                apellidos: participante.apellidos.clone(),
                rut: participante.rut.clone(),
            })
        })
    }
}
