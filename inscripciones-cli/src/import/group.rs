//! Group normalized rows into enrollment groups keyed by `Ficha`

use std::collections::HashMap;

use serde::Serialize;

use super::normalize::{NormalizedRow, columns, parse_amount};
use crate::config::ImportDefaults;

/// Enrollment fields taken from the first row of a ficha
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentTemplate {
    pub correlativo: i64,
    pub codigo_curso: String,
    pub empresa: String,
    pub codigo_sence: Option<String>,
    pub orden_compra: Option<String>,
    pub id_sence: Option<String>,
    pub id_moodle: String,
    pub nombre_curso: Option<String>,
    pub modalidad: String,
    pub inicio: String,
    pub termino: Option<String>,
    pub ejecutivo: String,
    pub status_alumnos: String,
}

/// A student row waiting for its enrollment number
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDraft {
    pub row_number: usize,
    pub nombres: String,
    pub apellidos: String,
    pub rut: String,
    pub mail: String,
    pub telefono: Option<String>,
    pub valor_cobrado: Option<f64>,
    pub franquicia_porcentaje: Option<f64>,
    pub estado_inscripcion: Option<String>,
    pub observacion: Option<String>,
}

impl ParticipantDraft {
    /// `"Nombres Apellidos (RUT: x)"`, used in error reports
    pub fn label(&self) -> String {
        format!("{} {} (RUT: {})", self.nombres, self.apellidos, self.rut)
    }
}

/// All rows sharing one `Ficha`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentGroup {
    pub ficha: String,
    pub template: EnrollmentTemplate,
    pub participants: Vec<ParticipantDraft>,
}

impl EnrollmentGroup {
    /// Declared headcount; always the number of participant rows
    pub fn headcount(&self) -> usize {
        self.participants.len()
    }
}

fn template_from_row(
    row: &NormalizedRow,
    defaults: &ImportDefaults,
    fallback_inicio: &str,
) -> EnrollmentTemplate {
    let or_default = |column: &str, default: &str| {
        row.optional(column).unwrap_or_else(|| default.to_string())
    };

    let id_moodle = or_default(columns::ID_MOODLE, defaults.codigo_curso.as_str());
    let correlativo = row
        .get(columns::CORRELATIVO)
        .parse::<f64>()
        .map(|n| n as i64)
        .unwrap_or(0);

    // a numeric 0 is an explicit "no date"; only non-numeric cells fall back
    let inicio = if row.has_serial(columns::F_INICIO) {
        row.get(columns::F_INICIO).to_string()
    } else {
        fallback_inicio.to_string()
    };

    EnrollmentTemplate {
        correlativo,
        codigo_curso: id_moodle.clone(),
        empresa: or_default(columns::EMPRESA, defaults.fallback_empresa.as_str()),
        codigo_sence: row.optional(columns::CODIGO_SENCE),
        orden_compra: row.optional(columns::ORDEN_COMPRA),
        id_sence: row.optional(columns::ID_SENCE),
        id_moodle,
        nombre_curso: row.optional(columns::CURSO),
        modalidad: or_default(columns::MODALIDAD, defaults.modalidad.as_str()),
        inicio,
        termino: row.optional(columns::F_TERMINO),
        ejecutivo: or_default(columns::EJECUTIVO, defaults.ejecutivo.as_str()),
        status_alumnos: defaults.status_alumnos.clone(),
    }
}

fn participant_from_row(row: &NormalizedRow) -> ParticipantDraft {
    let observaciones = row.optional(columns::OBSERVACIONES);

    ParticipantDraft {
        row_number: row.row_number,
        nombres: row.get(columns::NOMBRES).to_string(),
        apellidos: row.get(columns::APELLIDOS).to_string(),
        rut: row.get(columns::RUT).to_string(),
        mail: row.get(columns::CORREO).to_string(),
        telefono: row.optional(columns::TELEFONO),
        valor_cobrado: parse_amount(row.get(columns::VALOR_COBRADO)),
        franquicia_porcentaje: parse_amount(row.get(columns::FRANQUICIA)).map(|f| f * 100.0),
        estado_inscripcion: observaciones.clone(),
        observacion: observaciones,
    }
}

/// Group rows by ficha in first-seen order.
///
/// The first row of each ficha seeds the enrollment template; every row,
/// the first included, adds one participant. `fallback_inicio` is used for
/// enrollments whose `F. Inicio` is missing.
pub fn group_rows(
    rows: &[NormalizedRow],
    defaults: &ImportDefaults,
    fallback_inicio: &str,
) -> Vec<EnrollmentGroup> {
    let mut groups: Vec<EnrollmentGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        if row.ficha.is_empty() {
            continue;
        }

        let idx = match index.get(&row.ficha) {
            Some(&idx) => idx,
            None => {
                groups.push(EnrollmentGroup {
                    ficha: row.ficha.clone(),
                    template: template_from_row(row, defaults, fallback_inicio),
                    participants: Vec::new(),
                });
                index.insert(row.ficha.clone(), groups.len() - 1);
                groups.len() - 1
            }
        };

        groups[idx].participants.push(participant_from_row(row));
    }

    log::info!(
        "Grouped {} rows into {} enrollments",
        rows.len(),
        groups.len()
    );

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::normalize::normalize_row;
    use crate::import::sheet::{Cell, RawRow};

    const NOW: &str = "2025-06-01T12:00:00Z";

    fn row(row_number: usize, cells: &[(&str, Cell)]) -> NormalizedRow {
        normalize_row(&RawRow {
            row_number,
            cells: cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        })
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_rows_sharing_ficha_form_one_group() {
        let rows = vec![
            row(2, &[(columns::FICHA, text("2506-001")), (columns::RUT, text("1-9"))]),
            row(3, &[(columns::FICHA, text("2506-001")), (columns::RUT, text("2-7"))]),
        ];

        let groups = group_rows(&rows, &ImportDefaults::default(), NOW);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].ficha, "2506-001");
        assert_eq!(groups[0].headcount(), 2);
        assert_eq!(groups[0].participants[0].rut, "1-9");
        assert_eq!(groups[0].participants[1].rut, "2-7");
    }

    #[test]
    fn test_every_row_lands_in_exactly_one_group() {
        let fichas = ["A", "B", "A", "C", "B", "A"];
        let rows: Vec<_> = fichas
            .iter()
            .enumerate()
            .map(|(i, f)| {
                row(
                    i + 2,
                    &[(columns::FICHA, text(f)), (columns::RUT, text(&format!("{}-k", i)))],
                )
            })
            .collect();

        let groups = group_rows(&rows, &ImportDefaults::default(), NOW);
        let order: Vec<_> = groups.iter().map(|g| g.ficha.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);

        let total: usize = groups.iter().map(EnrollmentGroup::headcount).sum();
        assert_eq!(total, rows.len());

        for (i, ficha) in fichas.iter().enumerate() {
            let rut = format!("{}-k", i);
            let owners: Vec<_> = groups
                .iter()
                .filter(|g| g.participants.iter().any(|p| p.rut == rut))
                .collect();
            assert_eq!(owners.len(), 1);
            assert_eq!(owners[0].ficha, *ficha);
        }
    }

    #[test]
    fn test_template_comes_from_first_row_with_defaults() {
        let rows = vec![
            row(2, &[(columns::FICHA, text("F1"))]),
            row(
                3,
                &[
                    (columns::FICHA, text("F1")),
                    (columns::EMPRESA, text("Acme")),
                    (columns::MODALIDAD, text("Sincrónico")),
                ],
            ),
        ];

        let groups = group_rows(&rows, &ImportDefaults::default(), NOW);
        let template = &groups[0].template;
        assert_eq!(template.empresa, "Mutual");
        assert_eq!(template.modalidad, "e-learning");
        assert_eq!(template.ejecutivo, "N/A");
        assert_eq!(template.codigo_curso, "0");
        assert_eq!(template.id_moodle, "0");
        assert_eq!(template.correlativo, 0);
        assert_eq!(template.inicio, NOW);
        assert_eq!(template.termino, None);
        assert_eq!(template.status_alumnos, "Pendiente");
    }

    #[test]
    fn test_template_fields_from_spreadsheet() {
        let rows = vec![row(
            2,
            &[
                (columns::FICHA, text("F1")),
                (columns::ID_MOODLE, Cell::Number(345.0)),
                (columns::CORRELATIVO, Cell::Number(17.0)),
                (columns::CODIGO_SENCE, Cell::Number(1237984512.0)),
                (columns::ORDEN_COMPRA, text("OC-88")),
                (columns::CURSO, text("Excel Intermedio")),
                (columns::F_INICIO, Cell::Number(45810.0)),
                (columns::F_TERMINO, Cell::Number(45838.0)),
                (columns::EJECUTIVO, text("Ana Pérez")),
            ],
        )];

        let template = &group_rows(&rows, &ImportDefaults::default(), NOW)[0].template;
        assert_eq!(template.codigo_curso, "345");
        assert_eq!(template.id_moodle, "345");
        assert_eq!(template.correlativo, 17);
        assert_eq!(template.codigo_sence.as_deref(), Some("1237984512"));
        assert_eq!(template.orden_compra.as_deref(), Some("OC-88"));
        assert_eq!(template.nombre_curso.as_deref(), Some("Excel Intermedio"));
        assert_eq!(template.inicio, "2025-06-02T00:00:00Z");
        assert_eq!(template.termino.as_deref(), Some("2025-06-30T00:00:00Z"));
        assert_eq!(template.ejecutivo, "Ana Pérez");
    }

    #[test]
    fn test_zero_start_serial_is_sent_empty() {
        let rows = vec![
            row(2, &[(columns::FICHA, text("F1")), (columns::F_INICIO, Cell::Number(0.0))]),
            row(3, &[(columns::FICHA, text("F2")), (columns::F_INICIO, text("2 de junio"))]),
        ];

        let groups = group_rows(&rows, &ImportDefaults::default(), NOW);
        assert_eq!(groups[0].template.inicio, "");
        assert_eq!(groups[1].template.inicio, NOW);
    }

    #[test]
    fn test_declared_headcount_column_is_ignored() {
        let rows = vec![row(
            2,
            &[
                (columns::FICHA, text("F1")),
                ("N° Alumnos", Cell::Number(25.0)),
            ],
        )];

        let groups = group_rows(&rows, &ImportDefaults::default(), NOW);
        assert_eq!(groups[0].headcount(), 1);
    }

    #[test]
    fn test_participant_fields() {
        let rows = vec![row(
            2,
            &[
                (columns::FICHA, text("F1")),
                (columns::NOMBRES, text(" Juan ")),
                (columns::APELLIDOS, text("Soto")),
                (columns::RUT, text("12.345.678-5")),
                (columns::CORREO, text("juan@example.cl")),
                (columns::TELEFONO, Cell::Number(56912345678.0)),
                (columns::VALOR_COBRADO, Cell::Number(150000.0)),
                (columns::FRANQUICIA, Cell::Number(0.5)),
                (columns::OBSERVACIONES, text("Retirado")),
            ],
        )];

        let draft = &group_rows(&rows, &ImportDefaults::default(), NOW)[0].participants[0];
        assert_eq!(draft.nombres, "Juan");
        assert_eq!(draft.telefono.as_deref(), Some("56912345678"));
        assert_eq!(draft.valor_cobrado, Some(150000.0));
        assert_eq!(draft.franquicia_porcentaje, Some(50.0));
        assert_eq!(draft.estado_inscripcion.as_deref(), Some("Retirado"));
        assert_eq!(draft.observacion.as_deref(), Some("Retirado"));
        assert_eq!(draft.label(), "Juan Soto (RUT: 12.345.678-5)");
    }

    #[test]
    fn test_zero_amounts_are_absent() {
        let rows = vec![row(
            2,
            &[
                (columns::FICHA, text("F1")),
                (columns::VALOR_COBRADO, Cell::Number(0.0)),
                (columns::FRANQUICIA, text("0")),
            ],
        )];

        let draft = &group_rows(&rows, &ImportDefaults::default(), NOW)[0].participants[0];
        assert_eq!(draft.valor_cobrado, None);
        assert_eq!(draft.franquicia_porcentaje, None);
    }
}
