//! Reading CSV documents into grids

use gridmark_core::{CellValue, Grid};
use gridmark_csv::{CsvReadOptions, CsvReader};
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn test_fields_stay_text_by_default() {
    let grid = CsvReader::read_bytes(b"10,20\n30,40\n", &CsvReadOptions::default()).unwrap();
    assert_eq!(
        grid,
        Grid::from_rows(vec![vec!["10", "20"], vec!["30", "40"]])
    );
}

#[test]
fn test_trailing_blanks_are_trimmed() {
    let data = b"a,,c,,\n,,\n\"\",x\n,,,\n,\n";
    let grid = CsvReader::read_bytes(data, &CsvReadOptions::default()).unwrap();

    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.get(0, 1), &CellValue::string(""));
    assert_eq!(grid.row_len(0), 3);
    assert_eq!(grid.row_len(1), 0);
    assert_eq!(grid.get(2, 1), &CellValue::string("x"));
}

#[test]
fn test_empty_document_is_empty_grid() {
    let grid = CsvReader::read_bytes(b"", &CsvReadOptions::default()).unwrap();
    assert!(grid.is_empty());

    let grid = CsvReader::read_bytes(b",,\n,\n", &CsvReadOptions::default()).unwrap();
    assert!(grid.is_empty());
}

#[test]
fn test_header_and_delimiter_options() {
    let options = CsvReadOptions {
        has_header: true,
        auto_detect_types: true,
        ..CsvReadOptions::default()
    }
    .with_delimiter(b';');

    let grid = CsvReader::read_bytes(b"name;total\nParis;12.5\n", &options).unwrap();
    assert_eq!(grid.row_count(), 1);
    assert_eq!(grid.get(0, 0), &CellValue::string("Paris"));
    assert_eq!(grid.get(0, 1), &CellValue::Number(12.5));
}

#[test]
fn test_read_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "fortune_ranking,total").unwrap();
    writeln!(file, "1,0.72").unwrap();

    let grid = CsvReader::read_file(file.path(), &CsvReadOptions::default()).unwrap();
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.get(1, 1), &CellValue::string("0.72"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = CsvReader::read_file("/definitely/not/here.csv", &CsvReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, gridmark_csv::CsvError::Io(_)));
}
