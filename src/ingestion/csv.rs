//! Delimited-text (CSV) ingestion implementation.

use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{Row, Table, coerce, shared_headers};

/// Field delimiter used when none is configured.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Ingest a delimited-text file into an in-memory [`Table`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, delimiter: u8) -> IngestionResult<Table> {
    let bytes = std::fs::read(path)?;
    ingest_csv_from_bytes(&bytes, delimiter)
}

/// Ingest delimited text held in memory.
///
/// Rules:
///
/// - Lines are records and fields are split on `delimiter`; quotes are ordinary characters.
/// - The first non-blank line is the header row. Headers are trimmed.
/// - A line whose fields are all empty after trimming is skipped.
/// - Short lines are padded with empty text; fields past the last header are ignored.
/// - Every field is trimmed and then coerced with [`coerce`].
pub fn ingest_csv_from_bytes(bytes: &[u8], delimiter: u8) -> IngestionResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .from_reader(bytes);
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest delimited text from an existing CSV reader.
///
/// The reader should be built with `has_headers(false)` and `flexible(true)`; the header row is
/// detected here.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Table> {
    let mut records = rdr.records();

    let mut headers: Vec<String> = Vec::new();
    for result in records.by_ref() {
        let record = result?;
        if is_blank_record(&record) {
            continue;
        }
        headers = record.iter().map(|h| h.trim().to_owned()).collect();
        break;
    }

    let names = shared_headers(&headers);
    let mut rows: Vec<Row> = Vec::new();
    for result in records {
        let record = result?;
        if is_blank_record(&record) {
            continue;
        }

        let mut row = Row::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let raw = record.get(idx).unwrap_or("");
            row.push(name.clone(), coerce(raw));
        }
        rows.push(row);
    }

    Ok(Table::new(headers, rows))
}

fn is_blank_record(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn header_count_matches_first_line_fields() {
        let table = ingest_csv_from_bytes(b" id , name ,score\n1,Ada,98.5\n", DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.headers, vec!["id", "name", "score"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].get("score"), Some(&CellValue::Number(98.5)));
    }

    #[test]
    fn whitespace_only_lines_are_blank() {
        let table = ingest_csv_from_bytes(b"a,b\n  ,  \n1,2\n , \n", DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn crlf_line_endings() {
        let table = ingest_csv_from_bytes(b"a,b\r\nx,y\r\n", DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0].get("b"), Some(&CellValue::text("y")));
    }

    #[test]
    fn custom_delimiter() {
        let table = ingest_csv_from_bytes(b"a;b\n1;x\n", b';').unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0].get("a"), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn quotes_are_not_special() {
        let table = ingest_csv_from_bytes(b"a,b\n\"x,y\"\n", DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.rows[0].get("a"), Some(&CellValue::text("\"x")));
        assert_eq!(table.rows[0].get("b"), Some(&CellValue::text("y\"")));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = ingest_csv_from_bytes(b"", DEFAULT_DELIMITER).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }
}
