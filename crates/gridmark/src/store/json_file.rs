//! Progression, ledger and rules kept in JSON files
//!
//! Suited to a single process: the whole document is held in memory behind
//! a mutex and rewritten on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gridmark_engine::{
    apply_result, Attempt, ProgressKey, ProgressionRecord, Transition, XpLedgerEntry,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{ProgressionStore, RuleSource, XpLedgerStore};
use crate::error::StoreError;
use crate::rules::ExerciseRule;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    records: Vec<ProgressionRecord>,
    #[serde(default)]
    ledger: Vec<XpLedgerEntry>,
    #[serde(default)]
    totals: BTreeMap<String, u64>,
}

impl Document {
    fn find(&self, key: &ProgressKey) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.learner_id == key.learner_id && r.exercise_id == key.exercise_id)
    }
}

/// Progression store and XP ledger backed by one JSON document
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<Document>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Opened progression store at {}", path.display());

        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `next` to disk and make it the current document
    ///
    /// The in-memory document only changes once the write succeeded.
    async fn commit(&self, current: &mut Document, next: Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&next)?;
        write_atomically(&self.path, &bytes).await?;
        *current = next;
        Ok(())
    }
}

async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = match tokio::fs::write(&tmp, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    written
}

#[async_trait]
impl ProgressionStore for JsonFileStore {
    async fn get_record(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<ProgressionRecord>, StoreError> {
        let doc = self.doc.lock().await;
        Ok(doc.find(key).map(|i| doc.records[i].clone()))
    }

    async fn record_attempt(
        &self,
        key: &ProgressKey,
        attempt: &Attempt,
    ) -> Result<Transition, StoreError> {
        let mut doc = self.doc.lock().await;
        let index = doc.find(key);
        let transition = apply_result(index.map(|i| &doc.records[i]), key, attempt);

        let mut next = doc.clone();
        match index {
            Some(i) => next.records[i] = transition.next.clone(),
            None => next.records.push(transition.next.clone()),
        }
        self.commit(&mut doc, next).await?;

        Ok(transition)
    }

    async fn records_for(&self, learner_id: &str) -> Result<Vec<ProgressionRecord>, StoreError> {
        let doc = self.doc.lock().await;
        let mut records: Vec<_> = doc
            .records
            .iter()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.exercise_id.cmp(&b.exercise_id));
        Ok(records)
    }
}

#[async_trait]
impl XpLedgerStore for JsonFileStore {
    async fn append_entry(&self, entry: &XpLedgerEntry) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().await;
        let mut next = doc.clone();
        next.ledger.push(entry.clone());
        self.commit(&mut doc, next).await
    }

    async fn credit_learner(&self, learner_id: &str, amount: u32) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().await;
        let mut next = doc.clone();
        *next.totals.entry(learner_id.to_string()).or_default() += amount as u64;
        self.commit(&mut doc, next).await
    }

    async fn learner_total(&self, learner_id: &str) -> Result<u64, StoreError> {
        Ok(self
            .doc
            .lock()
            .await
            .totals
            .get(learner_id)
            .copied()
            .unwrap_or(0))
    }

    async fn entries_for(&self, learner_id: &str) -> Result<Vec<XpLedgerEntry>, StoreError> {
        Ok(self
            .doc
            .lock()
            .await
            .ledger
            .iter()
            .filter(|e| e.learner_id == learner_id)
            .cloned()
            .collect())
    }
}

/// Exercise rules loaded from a JSON object keyed by exercise id
///
/// ```json
/// {
///   "annual-dividends": {
///     "title": "Annual dividends",
///     "solution_spreadsheet_id": "solution-dividends",
///     "range": "O3:O102",
///     "tolerance": 0.01,
///     "xp_reward": 20
///   }
/// }
/// ```
#[derive(Debug, Default)]
pub struct JsonRuleSource {
    rules: BTreeMap<String, ExerciseRule>,
}

impl JsonRuleSource {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(Self {
            rules: serde_json::from_slice(bytes)?,
        })
    }

    /// Exercise ids with a rule, in order
    pub fn exercise_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.keys().map(String::as_str)
    }
}

#[async_trait]
impl RuleSource for JsonRuleSource {
    async fn rule_for(&self, exercise_id: &str) -> Result<Option<ExerciseRule>, StoreError> {
        Ok(self.rules.get(exercise_id).cloned())
    }
}
