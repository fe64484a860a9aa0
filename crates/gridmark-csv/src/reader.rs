//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use gridmark_core::{CellValue, Grid};

/// CSV grid reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a grid
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Grid> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV text already held in memory
    pub fn read_bytes(data: &[u8], options: &CsvReadOptions) -> CsvResult<Grid> {
        Self::read(data, options)
    }

    /// Read CSV from a reader into a grid
    ///
    /// Trailing empty fields and trailing empty records are dropped; an empty
    /// field between two populated ones becomes an empty string.
    ///
    /// Blank lines are skipped by the parser, so a blank row in the middle of
    /// a range has to be written as a lone delimiter or `""`.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Grid> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            if idx == 0 && options.has_header {
                continue;
            }

            let used = (0..record.len())
                .rev()
                .find(|&i| !record[i].is_empty())
                .map_or(0, |last| last + 1);

            let row = record
                .iter()
                .take(used)
                .map(|field| {
                    if options.auto_detect_types {
                        Self::detect_type(field)
                    } else {
                        CellValue::string(field)
                    }
                })
                .collect();

            rows.push(row);
        }

        Ok(Grid::from(rows).trimmed())
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::string(field);
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            return CellValue::Number(n);
        }

        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_type() {
        assert_eq!(CsvReader::detect_type("42"), CellValue::Number(42.0));
        assert_eq!(CsvReader::detect_type(" 3.5 "), CellValue::Number(3.5));
        assert_eq!(CsvReader::detect_type("TRUE"), CellValue::Boolean(true));
        assert_eq!(CsvReader::detect_type("no"), CellValue::string("no"));
        assert_eq!(CsvReader::detect_type("   "), CellValue::string("   "));
    }
}
