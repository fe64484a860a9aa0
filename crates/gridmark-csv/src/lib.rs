//! # gridmark-csv
//!
//! Reads CSV documents into [`Grid`](gridmark_core::Grid)s, shaped the way a
//! spreadsheet values API would return the same cells.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
