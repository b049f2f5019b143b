//! Test fixtures: in-memory workbooks

use rust_xlsxwriter::Workbook;

use super::sheet::Cell;

/// Build an `.xlsx` file with a header row and the given data rows
pub fn workbook(headers: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut book = Workbook::new();
    {
        let sheet = book.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (idx, row) in rows.iter().enumerate() {
            let row_num = idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        sheet.write_string(row_num, col, s.as_str()).unwrap();
                    }
                    Cell::Number(n) => {
                        sheet.write_number(row_num, col, *n).unwrap();
                    }
                    Cell::Bool(b) => {
                        sheet.write_boolean(row_num, col, *b).unwrap();
                    }
                }
            }
        }
    }
    book.save_to_buffer().unwrap()
}

/// Column order used by [`enrollment_row`]
pub const ENROLLMENT_HEADERS: &[&str] = &[
    "Ficha",
    "RUT",
    "Nombres",
    "Apellidos",
    "Correo electrónico",
    "Empresa",
    "Modalidad",
    "Ejecutivo",
    "F. Inicio",
];

/// A typical enrollment row matching [`ENROLLMENT_HEADERS`]
pub fn enrollment_row(
    ficha: &str,
    rut: &str,
    nombres: &str,
    empresa: &str,
    modalidad: &str,
    ejecutivo: &str,
) -> Vec<Cell> {
    let text = |s: &str| {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    };
    vec![
        text(ficha),
        text(rut),
        text(nombres),
        Cell::Text("Soto".to_string()),
        Cell::Text(format!("{}@example.cl", nombres.to_lowercase())),
        text(empresa),
        text(modalidad),
        text(ejecutivo),
        Cell::Number(45810.0),
    ]
}
