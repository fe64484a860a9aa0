//! # gridmark
//!
//! Grades a learner's spreadsheet exercise against an instructor's solution
//! and records the learner's progression.
//!
//! A grading request names the learner's sheet, the exercise (section) and
//! the learner. [`GradingService`] looks up the exercise rule, reads the
//! configured range from both sheets, compares them cell by cell and awards
//! XP the first time an exercise is completed.
//!
//! Storage and spreadsheet access sit behind the traits in [`store`]:
//!
//! - [`SpreadsheetReader`] - reads a range of cell values
//! - [`RuleSource`] - per-exercise rules
//! - [`ProgressionStore`] - per learner and exercise progression records
//! - [`XpLedgerStore`] - the XP ledger and learner totals
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gridmark::prelude::*;
//! use gridmark::store::{csv_dir::CsvSheetReader, json_file::*};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(JsonFileStore::open("data/progress.json").await?);
//! let service = GradingService::new(
//!     GraderConfig::default(),
//!     Arc::new(CsvSheetReader::new("data/sheets")),
//!     Arc::new(JsonRuleSource::open("data/rules.json").await?),
//!     store.clone(),
//!     store,
//! );
//!
//! let outcome = service
//!     .grade(&GradeRequest::new("learner-copy", "annual-dividends", "ada"))
//!     .await?;
//! println!("{}", outcome.response.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod prelude;
pub mod rules;
pub mod schema;
pub mod service;
pub mod store;

pub use config::GraderConfig;
pub use error::{
    FetchError, GradeError, PersistenceFailure, PersistenceStage, Result, StoreError,
};
pub use rules::{ExerciseRule, ResolvedRule};
pub use schema::{CellErrorReport, ErrorBody, GradeCommand, GradeRequest, GradeResponse};
pub use service::{GradeOutcome, GradingService};
pub use store::{ProgressionStore, RuleSource, SpreadsheetReader, XpLedgerStore};

// Re-export the types callers see in records and outcomes
pub use gridmark_engine::{ProgressKey, ProgressionRecord, Transition, XpLedgerEntry};
