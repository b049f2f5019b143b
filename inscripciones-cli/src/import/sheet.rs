//! Decode the uploaded workbook into raw rows
//!
//! Only the first sheet is read and its first row is the header. Date cells
//! are kept as their serial number so the normalizer can convert them.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{DateTime, SecondsFormat, Utc};

use super::error::ImportError;

/// Days between the spreadsheet serial epoch (1899-12-30) and 1970-01-01
pub const SERIAL_EPOCH_OFFSET_DAYS: f64 = 25569.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    /// Numbers and date serials
    Number(f64),
    Bool(bool),
}

static EMPTY_CELL: Cell = Cell::Empty;

/// One data row keyed by header name
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row number in the sheet (the header is row 1)
    pub row_number: usize,
    pub cells: HashMap<String, Cell>,
}

impl RawRow {
    /// Cell under `column`, `Cell::Empty` when the column is missing
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    fn is_blank(&self) -> bool {
        self.cells.values().all(|c| match c {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        })
    }
}

/// Convert a spreadsheet date serial to an RFC 3339 instant at UTC midnight.
///
/// Serial `0` (and anything non-finite) means "no date" and yields `""`.
pub fn serial_to_iso(serial: f64) -> String {
    if serial == 0.0 || !serial.is_finite() {
        return String::new();
    }

    let unix_days = (serial - SERIAL_EPOCH_OFFSET_DAYS).floor() as i64;
    match DateTime::<Utc>::from_timestamp(unix_days * SECONDS_PER_DAY, 0) {
        Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => {
            log::warn!("Date serial {} is out of range, treating as empty", serial);
            String::new()
        }
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("Cell error {:?} read as empty", e);
            Cell::Empty
        }
    }
}

fn header_name(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Parse the first sheet of a workbook held in memory.
///
/// Any decoding failure is fatal and reported as `ImportError::Parse`.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Parse(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Parse("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Parse(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        log::warn!("Sheet '{}' is empty", sheet_name);
        return Ok(Vec::new());
    };

    // A repeated header keeps its first column; later ones are ignored
    let mut seen = HashSet::new();
    let headers: Vec<String> = header
        .iter()
        .map(header_name)
        .map(|name| {
            if !name.is_empty() && !seen.insert(name.clone()) {
                log::warn!(
                    "Duplicate column '{}' in sheet '{}', keeping the first",
                    name,
                    sheet_name
                );
                String::new()
            } else {
                name
            }
        })
        .collect();

    // Row numbers are absolute so messages match what the user sees
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0) + 1;

    let mut parsed = Vec::new();
    for (offset, row) in rows.enumerate() {
        let mut cells = HashMap::with_capacity(headers.len());
        for (col, name) in headers.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let cell = row.get(col).map(to_cell).unwrap_or_default();
            cells.insert(name.clone(), cell);
        }

        let raw = RawRow {
            row_number: first_row + offset + 1,
            cells,
        };
        if raw.is_blank() {
            continue;
        }
        parsed.push(raw);
    }

    log::info!(
        "Read {} data rows from sheet '{}' ({} columns)",
        parsed.len(),
        sheet_name,
        headers.iter().filter(|h| !h.is_empty()).count()
    );

    Ok(parsed)
}
