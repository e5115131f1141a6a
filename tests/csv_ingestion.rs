use dashboard_data::ingestion::csv::{DEFAULT_DELIMITER, ingest_csv_from_bytes, ingest_csv_from_path, ingest_csv_from_reader};
use dashboard_data::types::CellValue;
use dashboard_data::IngestionError;

#[test]
fn ingest_csv_from_path_happy_path() {
    let table = ingest_csv_from_path("tests/fixtures/employees.csv", DEFAULT_DELIMITER).unwrap();

    assert_eq!(
        table.headers,
        vec!["Employee ID", "Name", "Department", "Country", "Job Family", "Salary"]
    );
    // Two blank lines in the fixture are dropped.
    assert_eq!(table.row_count(), 5);
    assert_eq!(table.rows[0].get("Employee ID"), Some(&CellValue::Number(1001.0)));
    assert_eq!(table.rows[0].get("Name"), Some(&CellValue::text("Ada Lovelace")));
    assert_eq!(table.rows[0].get("Salary"), Some(&CellValue::Number(120000.0)));
    assert_eq!(table.rows[2].get("Salary"), Some(&CellValue::text("")));
    assert_eq!(table.rows[4].get("Country"), Some(&CellValue::text("")));
    assert_eq!(table.rows[4].get("Salary"), Some(&CellValue::text("N/A")));
}

#[test]
fn ingest_csv_drops_blank_lines_and_keeps_partial_rows() {
    let table = ingest_csv_from_bytes(b"Name,Country\nAlice,US\nBob,\n\nCara,UK\n", DEFAULT_DELIMITER).unwrap();

    assert_eq!(table.headers, vec!["Name", "Country"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[1].get("Name"), Some(&CellValue::text("Bob")));
    assert_eq!(table.rows[1].get("Country"), Some(&CellValue::text("")));
    assert_eq!(table.rows[2].get("Country"), Some(&CellValue::text("UK")));
}

#[test]
fn ingest_csv_pads_short_lines_and_ignores_extra_fields() {
    let table = ingest_csv_from_bytes(b"a,b,c\n1\n2,x,y,z\n", DEFAULT_DELIMITER).unwrap();

    assert_eq!(table.row_count(), 2);
    let first: Vec<(&str, &CellValue)> = table.rows[0].cells().collect();
    assert_eq!(
        first,
        vec![
            ("a", &CellValue::Number(1.0)),
            ("b", &CellValue::text("")),
            ("c", &CellValue::text("")),
        ]
    );
    assert_eq!(table.rows[1].len(), 3);
    assert_eq!(table.rows[1].get("c"), Some(&CellValue::text("y")));
}

#[test]
fn ingest_csv_header_only_gives_no_rows() {
    let table = ingest_csv_from_bytes(b"Name,Country\n", DEFAULT_DELIMITER).unwrap();
    assert_eq!(table.headers, vec!["Name", "Country"]);
    assert!(table.is_empty());
}

#[test]
fn ingest_csv_duplicate_headers_keep_both_cells() {
    let table = ingest_csv_from_bytes(b"Dept,Dept\nSales,Ops\n", DEFAULT_DELIMITER).unwrap();
    assert_eq!(table.headers, vec!["Dept", "Dept"]);
    assert_eq!(table.rows[0].len(), 2);
    assert_eq!(table.rows[0].get("Dept"), Some(&CellValue::text("Ops")));
}

#[test]
fn ingest_csv_from_reader_uses_given_delimiter() {
    let input = "Name\tScore\nAda\t98.5\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b'\t')
        .from_reader(input.as_bytes());

    let table = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(table.rows[0].get("Score"), Some(&CellValue::Number(98.5)));
}

#[test]
fn ingest_csv_errors_on_invalid_utf8() {
    let err = ingest_csv_from_bytes(b"Name\n\xff\xfe\n", DEFAULT_DELIMITER).unwrap_err();
    assert!(matches!(err, IngestionError::Csv(_)));
    assert!(err.to_string().contains("csv error"));
}

#[test]
fn ingest_csv_missing_file_is_io_error() {
    let err = ingest_csv_from_path("tests/fixtures/does_not_exist.csv", DEFAULT_DELIMITER).unwrap_err();
    assert!(matches!(err, IngestionError::Io(_)));
}
