//! Reference catalog reconciliation
//!
//! Every company, executive and modality named by the spreadsheet is looked
//! up in its catalog and created when missing. The listing taken after the
//! creations is the only source of codes; the create echo is never trusted.

use std::collections::HashMap;

use super::ImportCancel;
use super::classify::ModalityClassifier;
use super::group::{EnrollmentGroup, EnrollmentTemplate};
use super::result::ImportResult;
use crate::api::{
    Catalog, CatalogEntry, CatalogKind, Ejecutivo, Empresa, ImportStore, Modalidad, NewEjecutivo,
    NewEmpresa,
};
use crate::config::ImportDefaults;

/// Display name to server code for one catalog
pub type CodeLookup = HashMap<String, i64>;

/// Lookups built for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceLookups {
    pub empresas: CodeLookup,
    pub ejecutivos: CodeLookup,
    pub modalidades: CodeLookup,
}

/// Distinct non-empty values of one template field, in first-seen order
pub fn referenced_names<F>(groups: &[EnrollmentGroup], field: F) -> Vec<String>
where
    F: Fn(&EnrollmentTemplate) -> &str,
{
    let mut names: Vec<String> = Vec::new();
    for group in groups {
        let name = field(&group.template);
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn build_lookup<E: CatalogEntry>(entries: &[E], report: &mut ImportResult) -> CodeLookup {
    let mut lookup = CodeLookup::with_capacity(entries.len());
    for entry in entries {
        let Some(name) = entry.display_name() else {
            continue;
        };
        match lookup.get(&name) {
            Some(&kept) => report.warn(format!(
                "{} \"{}\" aparece más de una vez en el catálogo; se usa el código {} e ignora {}",
                E::KIND.label(),
                name,
                kept,
                entry.code()
            )),
            None => {
                lookup.insert(name, entry.code());
            }
        }
    }
    lookup
}

/// Make sure every name exists in the catalog and return its codes.
///
/// Failures never abort the run: a failed listing yields an empty lookup
/// and one `CatalogUnavailable` entry, a failed create leaves that name
/// unresolved and records a `ReferenceCreation` entry.
pub async fn resolve_or_create<E, C>(
    catalog: &C,
    names: &[String],
    make_draft: impl Fn(&str) -> E::Draft,
    report: &mut ImportResult,
) -> CodeLookup
where
    E: CatalogEntry,
    C: Catalog<E> + ?Sized,
{
    let kind = E::KIND;
    if names.is_empty() {
        log::debug!("No {} referenced, skipping catalog", kind.resource());
        return CodeLookup::new();
    }

    let existing = match Catalog::<E>::list(catalog).await {
        Ok(entries) => entries,
        Err(e) => {
            report.record_catalog_unavailable(kind, format!("{:#}", e));
            return CodeLookup::new();
        }
    };

    let known: Vec<String> = existing.iter().filter_map(E::display_name).collect();
    let missing: Vec<&String> = names.iter().filter(|n| !known.contains(n)).collect();

    log::info!(
        "{}: {} referenced, {} missing from catalog",
        kind.resource(),
        names.len(),
        missing.len()
    );

    if missing.is_empty() {
        return build_lookup(&existing, report);
    }

    for name in missing {
        let draft = make_draft(name);
        log::debug!("Creating {} {:?}", kind, draft);
        match Catalog::<E>::create(catalog, &draft).await {
            Ok(_) => report.counts.bump_catalog(kind),
            Err(e) => report.record_reference_failure(kind, name, format!("{:#}", e)),
        }
    }

    match Catalog::<E>::list(catalog).await {
        Ok(entries) => build_lookup(&entries, report),
        Err(e) => {
            report.record_catalog_unavailable(kind, format!("{:#}", e));
            CodeLookup::new()
        }
    }
}

/// Reconcile the three catalogs in order: companies, executives, modalities
pub async fn reconcile_all<S>(
    store: &S,
    groups: &[EnrollmentGroup],
    defaults: &ImportDefaults,
    classifier: &dyn ModalityClassifier,
    cancel: &ImportCancel,
    report: &mut ImportResult,
) -> ReferenceLookups
where
    S: ImportStore + ?Sized,
{
    let mut lookups = ReferenceLookups::default();

    let status = defaults.catalog_status.as_str();

    let names = referenced_names(groups, |t| t.empresa.as_str());
    lookups.empresas = resolve_or_create::<Empresa, _>(
        store,
        &names,
        |nombre| NewEmpresa {
            nombre: nombre.to_string(),
            status: status.to_string(),
        },
        report,
    )
    .await;

    if cancel.is_cancelled() {
        return lookups;
    }

    let names = referenced_names(groups, |t| t.ejecutivo.as_str());
    lookups.ejecutivos = resolve_or_create::<Ejecutivo, _>(
        store,
        &names,
        |full_name| NewEjecutivo::from_full_name(full_name, status),
        report,
    )
    .await;

    if cancel.is_cancelled() {
        return lookups;
    }

    let names = referenced_names(groups, |t| t.modalidad.as_str());
    lookups.modalidades = resolve_or_create::<Modalidad, _>(
        store,
        &names,
        |nombre| classifier.draft(nombre),
        report,
    )
    .await;

    lookups
}

impl ReferenceLookups {
    pub fn get(&self, kind: CatalogKind) -> &CodeLookup {
        match kind {
            CatalogKind::Empresa => &self.empresas,
            CatalogKind::Ejecutivo => &self.ejecutivos,
            CatalogKind::Modalidad => &self.modalidades,
        }
    }
}
