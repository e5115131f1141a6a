#![cfg(feature = "excel")]

use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use calamine::{Data, ExcelDateTime, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CellValue, Row, Table, shared_headers};

/// Ingest an Excel document (`.xlsx`, `.xls`) from disk into an in-memory [`Table`].
pub fn ingest_excel_from_path(path: impl AsRef<Path>) -> IngestionResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    table_from_workbook(&mut workbook)
}

/// Ingest an uploaded Excel document held in memory.
///
/// Behavior:
/// - Uses the first sheet by position; other sheets are ignored
/// - The first row of the sheet's used range is the header row, taken literally
/// - Remaining rows become [`Row`]s, pairing the cell at column `i` with header `i`
/// - Numeric cells become numbers, everything else its display text; empty cells are absent
/// - Date cells render as `YYYY-MM-DD` (plus ` HH:MM:SS` when they carry a time), durations as
///   `H:MM:SS`
/// - Rows without any non-empty cell are skipped
pub fn ingest_excel_from_bytes(bytes: &[u8]) -> IngestionResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    table_from_workbook(&mut workbook)
}

fn table_from_workbook<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> IngestionResult<Table> {
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestionError::Parse {
            message: "workbook has no sheets".to_string(),
        })?;

    let range = workbook.worksheet_range(&first)?;
    Ok(table_from_range(&range))
}

fn table_from_range(range: &calamine::Range<Data>) -> Table {
    let mut sheet_rows = range.rows();

    let headers: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(cell_to_header_string).collect(),
        None => return Table::default(),
    };

    let names = shared_headers(&headers);
    let mut rows: Vec<Row> = Vec::new();
    for cells in sheet_rows {
        let row = convert_row(&names, cells);
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Table::new(headers, rows)
}

fn convert_row(names: &[Arc<str>], cells: &[Data]) -> Row {
    let mut row = Row::with_capacity(names.len());
    for (name, cell) in names.iter().zip(cells.iter()) {
        if let Some(value) = convert_cell(cell) {
            row.push(name.clone(), value);
        }
    }
    row
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => convert_cell(other).map(|v| v.to_string()).unwrap_or_default(),
    }
}

fn convert_cell(c: &Data) -> Option<CellValue> {
    match c {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) if f.is_finite() => Some(CellValue::Number(*f)),
        Data::Bool(true) => Some(CellValue::text("TRUE")),
        Data::Bool(false) => Some(CellValue::text("FALSE")),
        Data::DateTime(dt) => Some(CellValue::Text(format_excel_datetime(dt))),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        other => Some(CellValue::Text(other.to_string())),
    }
}

fn format_excel_datetime(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        let total = (dt.as_f64() * 86_400.0).round() as i64;
        let sign = if total < 0 { "-" } else { "" };
        let total = total.abs();
        return format!("{sign}{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60);
    }

    let (year, month, day, hour, min, sec, _milli) = dt.to_ymd_hms_milli();
    if (hour, min, sec) == (0, 0, 0) {
        format!("{year:04}-{month:02}-{day:02}")
    } else {
        format!("{year:04}-{month:02}-{day:02} {hour:02}:{min:02}:{sec:02}")
    }
}
