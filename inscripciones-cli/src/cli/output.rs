//! Terminal rendering of import results and previews

use colored::*;

use crate::import::{EnrollmentGroup, ImportResult, PreparedImport};

const MAX_COLUMN_WIDTH: usize = 40;

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{}{}", value, " ".repeat(width.saturating_sub(len)))
}

/// Plain-text table with a header row and a separator
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate(c, MAX_COLUMN_WIDTH)).collect())
        .collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| pad(c, widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.iter().map(|h| h.to_string()).collect()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(line(row));
    }
    out.join("\n")
}

pub fn print_import_result(result: &ImportResult) {
    if result.cancelled {
        println!("{}", "Importación cancelada; resultado parcial:".yellow().bold());
    }

    for line in result.summary_lines() {
        println!("{}", line.green());
    }

    if !result.skipped_rows.is_empty() {
        println!();
        println!(
            "{}",
            format!("{} filas omitidas", result.skipped_rows.len()).yellow()
        );
        for skipped in &result.skipped_rows {
            println!("  fila {}: {}", skipped.row_number, skipped.reason);
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("{}", format!("{} advertencias", result.warnings.len()).yellow());
        for warning in &result.warnings {
            println!("  {}", warning.yellow());
        }
    }

    if result.has_errors() {
        println!();
        println!(
            "{}",
            format!("✗ {} errores", result.errors.len()).red().bold()
        );
        let rows: Vec<Vec<String>> = result
            .errors
            .iter()
            .map(|e| {
                vec![
                    e.inscripcion_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                    e.ficha.clone(),
                    e.participant_label.clone(),
                    e.message.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            render_table(&["Inscripción", "Ficha", "Participante", "Error"], &rows)
        );
    }
}

fn group_row(group: &EnrollmentGroup) -> Vec<String> {
    let t = &group.template;
    vec![
        group.ficha.clone(),
        group.headcount().to_string(),
        t.empresa.clone(),
        t.modalidad.clone(),
        t.ejecutivo.clone(),
        t.inicio.clone(),
    ]
}

pub fn print_preview(file: &str, prepared: &PreparedImport) {
    println!(
        "{} {} inscripciones, {} participantes",
        file.cyan(),
        prepared.groups.len().to_string().bold(),
        prepared.participant_count().to_string().bold()
    );
    println!();

    let rows: Vec<Vec<String>> = prepared.groups.iter().map(group_row).collect();
    println!(
        "{}",
        render_table(
            &["Ficha", "Alumnos", "Empresa", "Modalidad", "Ejecutivo", "Inicio"],
            &rows
        )
    );

    if !prepared.skipped_rows.is_empty() {
        println!();
        for skipped in &prepared.skipped_rows {
            println!(
                "{}",
                format!("fila {} omitida: {}", skipped.row_number, skipped.reason).yellow()
            );
        }
    }
}
