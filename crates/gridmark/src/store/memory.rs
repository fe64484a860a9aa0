//! In-process collaborators

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use gridmark_core::{Grid, SheetRange};
use gridmark_engine::{
    apply_result, Attempt, ProgressKey, ProgressionRecord, Transition, XpLedgerEntry,
};
use tokio::sync::Mutex;

use super::{ProgressionStore, RuleSource, SpreadsheetReader, XpLedgerStore};
use crate::error::{FetchError, StoreError};
use crate::rules::ExerciseRule;

/// Sheets held in memory, each anchored at A1
#[derive(Debug, Default)]
pub struct MemorySheetReader {
    sheets: HashMap<String, Grid>,
}

impl MemorySheetReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet_id: impl Into<String>, grid: Grid) -> Self {
        self.sheets.insert(sheet_id.into(), grid);
        self
    }
}

#[async_trait]
impl SpreadsheetReader for MemorySheetReader {
    async fn read_range(&self, sheet_id: &str, range: &str) -> Result<Grid, FetchError> {
        let parsed = SheetRange::parse(range).map_err(|source| FetchError::InvalidRange {
            range: range.to_string(),
            source,
        })?;
        let sheet = self
            .sheets
            .get(sheet_id)
            .ok_or_else(|| FetchError::NotFound(sheet_id.to_string()))?;
        Ok(sheet.window(&parsed.cells()))
    }
}

/// Progression records in a map; the mutex makes `record_attempt` atomic
#[derive(Debug, Default)]
pub struct MemoryProgressionStore {
    records: Mutex<BTreeMap<ProgressKey, ProgressionRecord>>,
}

impl MemoryProgressionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressionStore for MemoryProgressionStore {
    async fn get_record(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<ProgressionRecord>, StoreError> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn record_attempt(
        &self,
        key: &ProgressKey,
        attempt: &Attempt,
    ) -> Result<Transition, StoreError> {
        let mut records = self.records.lock().await;
        let transition = apply_result(records.get(key), key, attempt);
        records.insert(key.clone(), transition.next.clone());
        Ok(transition)
    }

    async fn records_for(&self, learner_id: &str) -> Result<Vec<ProgressionRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .await
            .values()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    entries: Vec<XpLedgerEntry>,
    totals: HashMap<String, u64>,
}

/// XP ledger and learner totals in memory
#[derive(Debug, Default)]
pub struct MemoryXpLedger {
    state: Mutex<LedgerState>,
}

impl MemoryXpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry appended so far, oldest first
    pub async fn entries(&self) -> Vec<XpLedgerEntry> {
        self.state.lock().await.entries.clone()
    }
}

#[async_trait]
impl XpLedgerStore for MemoryXpLedger {
    async fn append_entry(&self, entry: &XpLedgerEntry) -> Result<(), StoreError> {
        self.state.lock().await.entries.push(entry.clone());
        Ok(())
    }

    async fn credit_learner(&self, learner_id: &str, amount: u32) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        *state.totals.entry(learner_id.to_string()).or_default() += amount as u64;
        Ok(())
    }

    async fn learner_total(&self, learner_id: &str) -> Result<u64, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .totals
            .get(learner_id)
            .copied()
            .unwrap_or(0))
    }

    async fn entries_for(&self, learner_id: &str) -> Result<Vec<XpLedgerEntry>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .entries
            .iter()
            .filter(|e| e.learner_id == learner_id)
            .cloned()
            .collect())
    }
}

/// Exercise rules in memory
#[derive(Debug, Default)]
pub struct MemoryRuleSource {
    rules: HashMap<String, ExerciseRule>,
}

impl MemoryRuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, exercise_id: impl Into<String>, rule: ExerciseRule) -> Self {
        self.rules.insert(exercise_id.into(), rule);
        self
    }
}

#[async_trait]
impl RuleSource for MemoryRuleSource {
    async fn rule_for(&self, exercise_id: &str) -> Result<Option<ExerciseRule>, StoreError> {
        Ok(self.rules.get(exercise_id).cloned())
    }
}
