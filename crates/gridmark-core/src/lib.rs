//! # gridmark-core
//!
//! Core data structures for the gridmark grading workspace.
//!
//! This crate provides the fundamental types shared by the other crates:
//! - [`CellValue`] - A single value read from a spreadsheet range
//! - [`CellAddress`] and [`CellRange`] - A1-style cell addressing and ranges
//! - [`SheetRange`] - A range descriptor with an optional sheet qualifier
//! - [`Grid`] - A row-major matrix of cell values, rows need not be equal length
//!
//! ## Example
//!
//! ```rust
//! use gridmark_core::{CellAddress, CellRange, Grid};
//!
//! let range = CellRange::parse("B2:C3").unwrap();
//! assert_eq!(range.start, CellAddress::new(1, 1));
//!
//! let grid = Grid::from_rows(vec![vec!["10", "20"], vec!["30"]]);
//! assert_eq!(grid.row_count(), 2);
//! assert!(grid.get(1, 1).is_empty());
//! ```

pub mod cell;
pub mod error;
pub mod grid;

pub use cell::{CellAddress, CellRange, CellValue, SharedString, SheetRange};
pub use error::{Error, Result};
pub use grid::Grid;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
