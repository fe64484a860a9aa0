//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value read from a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`SheetRange`] - A range with an optional sheet name (e.g., "Sheet1!A1:B10")

mod address;
mod value;

pub use address::{CellAddress, CellRange, SheetRange};
pub use value::{CellValue, SharedString};
