//! Enrollment and participant creation
//!
//! Groups are processed one at a time in file order. A group's enrollment
//! is always created before any of its participants, and participants are
//! created one by one so each outcome is reported on its own.

use super::ImportCancel;
use super::group::{EnrollmentGroup, ParticipantDraft};
use super::reconcile::ReferenceLookups;
use super::result::ImportResult;
use crate::api::{CatalogKind, EnrollmentStore, NewInscripcion, NewParticipante};

/// Replace a reference name by its code, keeping the name when unresolved
fn substitute(
    lookups: &ReferenceLookups,
    kind: CatalogKind,
    name: &str,
    ficha: &str,
    report: &mut ImportResult,
) -> String {
    match lookups.get(kind).get(name) {
        Some(code) => code.to_string(),
        None => {
            report.warn(format!(
                "Ficha {}: {} \"{}\" no tiene código; se envía el nombre",
                ficha,
                kind.label(),
                name
            ));
            name.to_string()
        }
    }
}

fn new_inscripcion(
    group: &EnrollmentGroup,
    lookups: &ReferenceLookups,
    report: &mut ImportResult,
) -> NewInscripcion {
    let t = &group.template;
    let ficha = group.ficha.as_str();

    NewInscripcion {
        ficha: group.ficha.clone(),
        correlativo: t.correlativo,
        codigo_curso: t.codigo_curso.clone(),
        empresa: substitute(lookups, CatalogKind::Empresa, &t.empresa, ficha, report),
        codigo_sence: t.codigo_sence.clone(),
        orden_compra: t.orden_compra.clone(),
        id_sence: t.id_sence.clone(),
        id_moodle: t.id_moodle.clone(),
        nombre_curso: t.nombre_curso.clone(),
        modalidad: substitute(lookups, CatalogKind::Modalidad, &t.modalidad, ficha, report),
        inicio: t.inicio.clone(),
        termino: t.termino.clone(),
        ejecutivo: substitute(lookups, CatalogKind::Ejecutivo, &t.ejecutivo, ficha, report),
        num_alumnos_inscritos: group.headcount(),
        status_alumnos: t.status_alumnos.clone(),
    }
}

fn new_participante(draft: &ParticipantDraft, numero_inscripcion: i64) -> NewParticipante {
    NewParticipante {
        numero_inscripcion,
        nombres: draft.nombres.clone(),
        apellidos: draft.apellidos.clone(),
        rut: draft.rut.clone(),
        mail: draft.mail.clone(),
        telefono: draft.telefono.clone(),
        valor_cobrado: draft.valor_cobrado,
        franquicia_porcentaje: draft.franquicia_porcentaje,
        estado_inscripcion: draft.estado_inscripcion.clone(),
        observacion: draft.observacion.clone(),
    }
}

async fn create_group<S>(
    store: &S,
    group: &EnrollmentGroup,
    lookups: &ReferenceLookups,
    report: &mut ImportResult,
) where
    S: EnrollmentStore + ?Sized,
{
    let payload = new_inscripcion(group, lookups, report);

    let inscripcion = match store.create_inscripcion(&payload).await {
        Ok(inscripcion) => inscripcion,
        Err(e) => {
            report.record_enrollment_failure(&group.ficha, group.headcount(), format!("{:#}", e));
            return;
        }
    };
    report.counts.inscripciones += 1;

    let numero = inscripcion.numero_inscripcion;
    log::info!(
        "Ficha {} created as enrollment {} ({} participants)",
        group.ficha,
        numero,
        group.headcount()
    );

    for draft in &group.participants {
        match store.create_participante(&new_participante(draft, numero)).await {
            Ok(_) => report.counts.participantes += 1,
            Err(e) => report.record_participant_failure(
                &group.ficha,
                numero,
                draft.label(),
                format!("{:#}", e),
            ),
        }
    }
}

/// Create every group's enrollment and participants.
///
/// Stops before the next group once `cancel` is tripped and flags the
/// report as cancelled; a group already started is finished.
pub async fn create_enrollments<S>(
    store: &S,
    groups: &[EnrollmentGroup],
    lookups: &ReferenceLookups,
    cancel: &ImportCancel,
    report: &mut ImportResult,
) where
    S: EnrollmentStore + ?Sized,
{
    for (idx, group) in groups.iter().enumerate() {
        if cancel.is_cancelled() {
            log::warn!(
                "Import cancelled, {} of {} enrollments not attempted",
                groups.len() - idx,
                groups.len()
            );
            report.cancelled = true;
            return;
        }
        create_group(store, group, lookups, report).await;
    }
}
