//! Row normalization
//!
//! Every cell becomes a trimmed string. Empty, `0` and `"0"` all collapse to
//! `""`, which means "not provided" for the rest of the pipeline. Date
//! columns are converted from serials to RFC 3339 instants here.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::sheet::{Cell, RawRow, serial_to_iso};

/// Spreadsheet column headers, matched literally
pub mod columns {
    pub const FICHA: &str = "Ficha";
    pub const RUT: &str = "RUT";
    pub const NOMBRES: &str = "Nombres";
    pub const APELLIDOS: &str = "Apellidos";
    pub const CORREO: &str = "Correo electrónico";
    /// Misspelled in the source template; must stay as is
    pub const TELEFONO: &str = "Télefono";
    pub const VALOR_COBRADO: &str = "Valor Cobrado";
    pub const FRANQUICIA: &str = "%Franquicia";
    pub const OBSERVACIONES: &str = "Observaciones";
    pub const EMPRESA: &str = "Empresa";
    pub const CURSO: &str = "Curso";
    /// Two spaces
    pub const ID_MOODLE: &str = "ID  Moodle";
    pub const CORRELATIVO: &str = "Correlativo";
    pub const ORDEN_COMPRA: &str = "Orden de Compra";
    pub const CODIGO_SENCE: &str = "Código Sence";
    pub const ID_SENCE: &str = "ID Sence";
    pub const MODALIDAD: &str = "Modalidad";
    pub const F_INICIO: &str = "F. Inicio";
    pub const F_TERMINO: &str = "F. Termino";
    pub const EJECUTIVO: &str = "Ejecutivo";

    /// Columns holding date serials
    pub const DATE_COLUMNS: &[&str] = &[F_INICIO, F_TERMINO];
}

/// A row with every field as a cleaned string
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub row_number: usize,
    pub ficha: String,
    values: HashMap<String, String>,
    /// Date columns whose cell held a serial number, even `0`
    serials: HashSet<String>,
}

impl NormalizedRow {
    /// Normalized value of `column`, `""` when absent
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// Value of `column`, or `None` when it was not provided
    pub fn optional(&self, column: &str) -> Option<String> {
        let value = self.get(column);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Whether date `column` held a number rather than text or nothing
    pub fn has_serial(&self, column: &str) -> bool {
        self.serials.contains(column)
    }
}

/// A row left out of grouping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}

/// Output of the normalization stage
#[derive(Debug, Default)]
pub struct NormalizedRows {
    pub rows: Vec<NormalizedRow>,
    pub skipped: Vec<SkippedRow>,
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// Collapse a cell to its string form, `""` for the empty sentinels
pub fn normalize_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Number(n) if *n == 0.0 || !n.is_finite() => String::new(),
        Cell::Number(n) => format_number(*n),
        Cell::Bool(b) => b.to_string(),
        Cell::Text(s) => {
            let trimmed = s.trim();
            if trimmed == "0" {
                String::new()
            } else {
                trimmed.to_string()
            }
        }
    }
}

/// Date columns only accept serial numbers; anything else is "no date"
fn normalize_date(cell: &Cell) -> String {
    match cell {
        Cell::Number(serial) => serial_to_iso(*serial),
        _ => String::new(),
    }
}

/// Normalize one raw row
pub fn normalize_row(raw: &RawRow) -> NormalizedRow {
    let values: HashMap<String, String> = raw
        .cells
        .iter()
        .map(|(column, cell)| {
            let value = if columns::DATE_COLUMNS.contains(&column.as_str()) {
                normalize_date(cell)
            } else {
                normalize_cell(cell)
            };
            (column.clone(), value)
        })
        .collect();

    let serials = raw
        .cells
        .iter()
        .filter(|(column, cell)| {
            columns::DATE_COLUMNS.contains(&column.as_str()) && matches!(cell, Cell::Number(_))
        })
        .map(|(column, _)| column.clone())
        .collect();

    let ficha = values.get(columns::FICHA).cloned().unwrap_or_default();

    NormalizedRow {
        row_number: raw.row_number,
        ficha,
        values,
        serials,
    }
}

/// Normalize all rows, setting aside those without a `Ficha`
pub fn normalize_rows(raw_rows: &[RawRow]) -> NormalizedRows {
    let mut out = NormalizedRows::default();

    for raw in raw_rows {
        let row = normalize_row(raw);
        if row.ficha.is_empty() {
            log::warn!("Row {}: empty Ficha, skipping", row.row_number);
            out.skipped.push(SkippedRow {
                row_number: row.row_number,
                reason: "Ficha vacía".to_string(),
            });
            continue;
        }
        out.rows.push(row);
    }

    out
}

/// Parse a normalized numeric field; `None` when absent or not a number
pub fn parse_amount(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    match value.replace(',', ".").parse::<f64>() {
        Ok(n) if n != 0.0 && n.is_finite() => Some(n),
        Ok(_) => None,
        Err(_) => {
            log::warn!("'{}' is not a number, ignoring", value);
            None
        }
    }
}
