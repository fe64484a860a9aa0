//! Spreadsheets exported as CSV files in a directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gridmark_core::{Grid, SheetRange};
use gridmark_csv::{CsvReadOptions, CsvReader};
use tracing::debug;

use super::SpreadsheetReader;
use crate::error::FetchError;

/// Reads sheets from `<dir>/<sheet_id>.csv`
///
/// A range naming a sheet (`Answers!B2:D9`, or just `Answers`) reads
/// `<dir>/<sheet_id>/<sheet>.csv` instead, so a multi-tab spreadsheet is a
/// directory holding one CSV per tab.
#[derive(Debug, Clone)]
pub struct CsvSheetReader {
    dir: PathBuf,
    options: CsvReadOptions,
}

impl CsvSheetReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            options: CsvReadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CsvReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, sheet_id: &str, sheet: Option<&str>) -> Result<PathBuf, FetchError> {
        if !is_plain_name(sheet_id) {
            return Err(FetchError::NotFound(sheet_id.to_string()));
        }

        match sheet {
            None => Ok(self.dir.join(format!("{}.csv", sheet_id))),
            Some(name) if is_plain_name(name) => {
                Ok(self.dir.join(sheet_id).join(format!("{}.csv", name)))
            }
            Some(_) => Err(FetchError::Unauthorized(sheet_id.to_string())),
        }
    }
}

/// A single path component that cannot climb out of the directory
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[async_trait]
impl SpreadsheetReader for CsvSheetReader {
    async fn read_range(&self, sheet_id: &str, range: &str) -> Result<Grid, FetchError> {
        let parsed = SheetRange::parse(range).map_err(|source| FetchError::InvalidRange {
            range: range.to_string(),
            source,
        })?;
        let path = self.path_for(sheet_id, parsed.sheet.as_deref())?;
        debug!("Reading {} from {}", parsed, path.display());

        let bytes = tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(sheet_id.to_string())
            } else {
                FetchError::Io {
                    sheet_id: sheet_id.to_string(),
                    source,
                }
            }
        })?;

        let grid = CsvReader::read_bytes(&bytes, &self.options).map_err(|source| {
            FetchError::Csv {
                sheet_id: sheet_id.to_string(),
                source,
            }
        })?;

        Ok(grid.window(&parsed.cells()))
    }
}
