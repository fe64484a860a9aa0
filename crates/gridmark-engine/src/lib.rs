//! # gridmark-engine
//!
//! The grading core: compares a learner's grid against a solution grid and
//! turns the result into progression state.
//!
//! Everything here is pure. Fetching grids, reading the clock and persisting
//! records are the caller's job.
//!
//! ## Example
//!
//! ```rust
//! use gridmark_core::Grid;
//! use gridmark_engine::compare;
//!
//! let student = Grid::from_rows(vec![vec!["10", "20"], vec!["30", "41"]]);
//! let solution = Grid::from_rows(vec![vec!["10", "20"], vec!["30", "40"]]);
//!
//! let result = compare(&student, &solution, 0.01, Some("A1:B2"));
//! assert_eq!(result.score(), 75);
//! assert_eq!(result.mismatches[0].cell, "B2");
//! ```

pub mod compare;
pub mod equality;
pub mod message;
pub mod progression;

pub use compare::{compare, compare_from, ComparisonResult, Mismatch, RangeOrigin};
pub use equality::{parse_number, values_equal, DEFAULT_TOLERANCE};
pub use message::summary_message;
pub use progression::{
    apply_result, hint_penalised_xp, Attempt, ProgressKey, ProgressState, ProgressionRecord,
    SourceType, TransactionType, Transition, XpLedgerEntry,
};
