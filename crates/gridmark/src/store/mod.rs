//! Collaborators the grading service reads from and writes to
//!
//! The service only sees these traits. Implementations:
//! - [`memory`] - in-process maps, for tests and embedding
//! - [`json_file`] - progression, ledger and rules kept in JSON files
//! - [`csv_dir`] - spreadsheets exported as CSV files in a directory

use async_trait::async_trait;
use gridmark_core::Grid;
use gridmark_engine::{Attempt, ProgressKey, ProgressionRecord, Transition, XpLedgerEntry};

use crate::error::{FetchError, StoreError};
use crate::rules::ExerciseRule;

pub mod csv_dir;
pub mod json_file;
pub mod memory;

/// Source of spreadsheet cell values
#[async_trait]
pub trait SpreadsheetReader: Send + Sync {
    /// Read the values in `range` of sheet `sheet_id`
    ///
    /// A valid range with nothing in it yields an empty grid, not an error.
    async fn read_range(&self, sheet_id: &str, range: &str) -> Result<Grid, FetchError>;
}

/// Per (learner, exercise) progression records
#[async_trait]
pub trait ProgressionStore: Send + Sync {
    /// Current record, if the pair was ever graded
    async fn get_record(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<ProgressionRecord>, StoreError>;

    /// Apply `attempt` to the stored record of `key` and persist the result
    ///
    /// Implementations must read, transition and write as one atomic step
    /// with respect to other calls for the same key, so that two concurrent
    /// successful attempts cannot both observe an uncompleted record.
    async fn record_attempt(
        &self,
        key: &ProgressKey,
        attempt: &Attempt,
    ) -> Result<Transition, StoreError>;

    /// All records of one learner, ordered by exercise id
    async fn records_for(&self, learner_id: &str) -> Result<Vec<ProgressionRecord>, StoreError>;
}

/// Append-only XP ledger plus each learner's running total
#[async_trait]
pub trait XpLedgerStore: Send + Sync {
    async fn append_entry(&self, entry: &XpLedgerEntry) -> Result<(), StoreError>;

    /// Add `amount` to the learner's running total
    async fn credit_learner(&self, learner_id: &str, amount: u32) -> Result<(), StoreError>;

    async fn learner_total(&self, learner_id: &str) -> Result<u64, StoreError>;

    async fn entries_for(&self, learner_id: &str) -> Result<Vec<XpLedgerEntry>, StoreError>;
}

/// Where exercise rules come from
#[async_trait]
pub trait RuleSource: Send + Sync {
    async fn rule_for(&self, exercise_id: &str) -> Result<Option<ExerciseRule>, StoreError>;
}
