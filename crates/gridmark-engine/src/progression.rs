//! Progression state machine
//!
//! Each (learner, exercise) pair moves through three states:
//!
//! ```text
//! New ──fail──▶ InProgress ──fail──▶ InProgress
//!  │                │
//!  └────success─────┴──success──▶ Completed ──any──▶ Completed
//! ```
//!
//! XP is awarded only on the transition into `Completed`, so grading the
//! same exercise any number of times yields at most one award.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one learner's progress on one exercise
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressKey {
    pub learner_id: String,
    pub exercise_id: String,
}

impl ProgressKey {
    pub fn new(learner_id: impl Into<String>, exercise_id: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            exercise_id: exercise_id.into(),
        }
    }
}

/// Persisted progress of one learner on one exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    pub learner_id: String,
    pub exercise_id: String,
    /// Incremented on every graded attempt
    pub attempt_count: u32,
    /// Set once, never cleared
    pub is_completed: bool,
    /// XP awarded at completion
    pub xp_earned: u32,
    /// Whether a hint had been used when the exercise was completed
    pub hint_used: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressionRecord {
    /// A record with no attempts yet
    pub fn new(key: &ProgressKey) -> Self {
        Self {
            learner_id: key.learner_id.clone(),
            exercise_id: key.exercise_id.clone(),
            attempt_count: 0,
            is_completed: false,
            xp_earned: 0,
            hint_used: false,
            completed_at: None,
        }
    }

    pub fn key(&self) -> ProgressKey {
        ProgressKey::new(&self.learner_id, &self.exercise_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Earned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    SectionCompletion,
}

/// One XP award; append-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpLedgerEntry {
    pub learner_id: String,
    pub amount: u32,
    pub transaction_type: TransactionType,
    pub source_type: SourceType,
    /// Exercise that was completed
    pub source_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A graded attempt to apply against progression state
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    /// Whether the comparison scored exactly 100
    pub success: bool,
    pub hint_used: bool,
    /// XP for completing the exercise without a hint
    pub base_xp: u32,
    /// Human-readable exercise name, used in the ledger description
    pub exercise_title: String,
    pub at: DateTime<Utc>,
}

/// Where a pair stands before an attempt is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// No record yet
    New,
    /// Attempted but not completed
    InProgress,
    /// Completed; terminal
    Completed,
}

impl ProgressState {
    pub fn of(record: Option<&ProgressionRecord>) -> Self {
        match record {
            None => ProgressState::New,
            Some(r) if r.is_completed => ProgressState::Completed,
            Some(_) => ProgressState::InProgress,
        }
    }
}

/// Result of applying one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State before the attempt
    pub previous: ProgressState,
    /// Record to persist
    pub next: ProgressionRecord,
    /// Present only on the awarding transition
    pub ledger_entry: Option<XpLedgerEntry>,
    /// XP to add to the learner's running total
    pub xp_delta: u32,
}

impl Transition {
    /// Whether this attempt completed the exercise for the first time
    pub fn awarded(&self) -> bool {
        self.ledger_entry.is_some()
    }

    /// Whether the exercise was already completed before this attempt
    pub fn already_completed(&self) -> bool {
        self.previous == ProgressState::Completed
    }
}

/// XP after the 30% hint penalty, rounded down
///
/// ```
/// use gridmark_engine::hint_penalised_xp;
///
/// assert_eq!(hint_penalised_xp(10), 7);
/// assert_eq!(hint_penalised_xp(70), 49);
/// assert_eq!(hint_penalised_xp(3), 2);
/// ```
pub fn hint_penalised_xp(base_xp: u32) -> u32 {
    (base_xp as u64 * 7 / 10) as u32
}

/// Apply a graded attempt to the current record of `key`
///
/// `current` is `None` when the pair has never been graded.
pub fn apply_result(
    current: Option<&ProgressionRecord>,
    key: &ProgressKey,
    attempt: &Attempt,
) -> Transition {
    let previous = ProgressState::of(current);
    let mut next = current
        .cloned()
        .unwrap_or_else(|| ProgressionRecord::new(key));
    next.attempt_count = next.attempt_count.saturating_add(1);

    if previous == ProgressState::Completed || !attempt.success {
        return Transition {
            previous,
            next,
            ledger_entry: None,
            xp_delta: 0,
        };
    }

    let xp = if attempt.hint_used {
        hint_penalised_xp(attempt.base_xp)
    } else {
        attempt.base_xp
    };

    next.is_completed = true;
    next.xp_earned = xp;
    next.hint_used = attempt.hint_used;
    next.completed_at = Some(attempt.at);

    let ledger_entry = XpLedgerEntry {
        learner_id: key.learner_id.clone(),
        amount: xp,
        transaction_type: TransactionType::Earned,
        source_type: SourceType::SectionCompletion,
        source_id: key.exercise_id.clone(),
        description: format!("Completed section: {}", attempt.exercise_title),
        created_at: attempt.at,
    };

    Transition {
        previous,
        next,
        ledger_entry: Some(ledger_entry),
        xp_delta: xp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn key() -> ProgressKey {
        ProgressKey::new("learner-1", "dividends-1")
    }

    fn attempt(success: bool, hint_used: bool) -> Attempt {
        Attempt {
            success,
            hint_used,
            base_xp: 10,
            exercise_title: "Annual dividends".into(),
            at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_new_failure_starts_progress() {
        let t = apply_result(None, &key(), &attempt(false, false));

        assert_eq!(t.previous, ProgressState::New);
        assert_eq!(t.next.attempt_count, 1);
        assert!(!t.next.is_completed);
        assert_eq!(t.next.xp_earned, 0);
        assert_eq!(t.xp_delta, 0);
        assert!(t.ledger_entry.is_none());
    }

    #[test]
    fn test_repeated_failures_count_attempts() {
        let first = apply_result(None, &key(), &attempt(false, true));
        let second = apply_result(Some(&first.next), &key(), &attempt(false, false));

        assert_eq!(second.previous, ProgressState::InProgress);
        assert_eq!(second.next.attempt_count, 2);
        assert!(!second.next.is_completed);
        assert_eq!(second.xp_delta, 0);
    }

    #[test]
    fn test_first_success_awards_xp() {
        let failed = apply_result(None, &key(), &attempt(false, false));
        let t = apply_result(Some(&failed.next), &key(), &attempt(true, false));

        assert!(t.awarded());
        assert!(!t.already_completed());
        assert_eq!(t.xp_delta, 10);
        assert_eq!(t.next.attempt_count, 2);
        assert!(t.next.is_completed);
        assert_eq!(t.next.xp_earned, 10);
        assert!(!t.next.hint_used);
        assert!(t.next.completed_at.is_some());

        let entry = t.ledger_entry.unwrap();
        assert_eq!(entry.amount, 10);
        assert_eq!(entry.source_id, "dividends-1");
        assert_eq!(entry.description, "Completed section: Annual dividends");
        assert_eq!(entry.transaction_type, TransactionType::Earned);
    }

    #[test]
    fn test_hint_penalty_applies_at_award() {
        let t = apply_result(None, &key(), &attempt(true, true));

        assert_eq!(t.xp_delta, 7);
        assert_eq!(t.next.xp_earned, 7);
        assert!(t.next.hint_used);
        assert_eq!(t.ledger_entry.unwrap().amount, 7);
    }

    #[test]
    fn test_completed_is_terminal() {
        let done = apply_result(None, &key(), &attempt(true, false));

        for again in [attempt(true, true), attempt(false, false), attempt(true, false)] {
            let t = apply_result(Some(&done.next), &key(), &again);
            assert!(t.already_completed());
            assert!(!t.awarded());
            assert_eq!(t.xp_delta, 0);
            assert_eq!(t.next.attempt_count, 2);
            assert_eq!(t.next.xp_earned, 10);
            assert!(!t.next.hint_used);
            assert_eq!(t.next.completed_at, done.next.completed_at);
        }
    }

    #[test]
    fn test_penalty_uses_integer_floor() {
        assert_eq!(hint_penalised_xp(0), 0);
        assert_eq!(hint_penalised_xp(1), 0);
        assert_eq!(hint_penalised_xp(15), 10);
        assert_eq!(hint_penalised_xp(u32::MAX), (u32::MAX as u64 * 7 / 10) as u32);
    }
}
