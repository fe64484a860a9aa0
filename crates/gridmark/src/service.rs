//! The grading pipeline

use std::sync::Arc;

use chrono::Utc;
use gridmark_engine::{
    apply_result, compare_from, summary_message, Attempt, ProgressKey, RangeOrigin, Transition,
};
use tracing::{debug, error, info, warn};

use crate::config::GraderConfig;
use crate::error::{GradeError, PersistenceFailure, PersistenceStage, Result};
use crate::schema::{GradeCommand, GradeRequest, GradeResponse};
use crate::store::{ProgressionStore, RuleSource, SpreadsheetReader, XpLedgerStore};

/// Everything produced by grading one attempt
#[derive(Debug)]
pub struct GradeOutcome {
    /// What the learner is shown
    pub response: GradeResponse,
    /// The progression change the response is based on
    pub transition: Transition,
    /// Set when a progression write failed; the response is still valid
    pub persistence_failure: Option<PersistenceFailure>,
}

impl GradeOutcome {
    /// Whether every progression write went through
    pub fn is_persisted(&self) -> bool {
        self.persistence_failure.is_none()
    }
}

/// Grades learner sheets and records progression
///
/// ```rust
/// use std::sync::Arc;
///
/// use gridmark::store::memory::*;
/// use gridmark::{ExerciseRule, GraderConfig, GradeRequest, GradingService};
/// use gridmark_core::Grid;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let sheets = MemorySheetReader::new()
///     .with_sheet("learner-copy", Grid::from_rows(vec![vec!["10", "20"]]))
///     .with_sheet("solution", Grid::from_rows(vec![vec!["10", "20"]]));
/// let rules = MemoryRuleSource::new().with_rule(
///     "sec-1",
///     ExerciseRule {
///         solution_spreadsheet_id: "solution".into(),
///         range: "A1:B1".into(),
///         ..Default::default()
///     },
/// );
///
/// let service = GradingService::new(
///     GraderConfig::default(),
///     Arc::new(sheets),
///     Arc::new(rules),
///     Arc::new(MemoryProgressionStore::new()),
///     Arc::new(MemoryXpLedger::new()),
/// );
///
/// let outcome = service
///     .grade(&GradeRequest::new("learner-copy", "sec-1", "ada"))
///     .await
///     .unwrap();
/// assert!(outcome.response.is_valid);
/// assert_eq!(outcome.response.xp_earned, 10);
/// # });
/// ```
pub struct GradingService {
    config: GraderConfig,
    sheets: Arc<dyn SpreadsheetReader>,
    rules: Arc<dyn RuleSource>,
    progression: Arc<dyn ProgressionStore>,
    ledger: Arc<dyn XpLedgerStore>,
}

impl GradingService {
    pub fn new(
        config: GraderConfig,
        sheets: Arc<dyn SpreadsheetReader>,
        rules: Arc<dyn RuleSource>,
        progression: Arc<dyn ProgressionStore>,
        ledger: Arc<dyn XpLedgerStore>,
    ) -> Self {
        Self {
            config,
            sheets,
            rules,
            progression,
            ledger,
        }
    }

    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Validate and grade a request
    pub async fn grade(&self, request: &GradeRequest) -> Result<GradeOutcome> {
        let command = request.validate()?;
        self.grade_command(&command).await
    }

    /// Grade an already validated request
    ///
    /// Only request, rule and fetch problems are errors. Once the sheets are
    /// compared the learner always gets a response; failed progression writes
    /// are reported in [`GradeOutcome::persistence_failure`].
    pub async fn grade_command(&self, command: &GradeCommand) -> Result<GradeOutcome> {
        let rule = self
            .rules
            .rule_for(&command.exercise_id)
            .await
            .map_err(GradeError::RuleLookup)?
            .ok_or_else(|| GradeError::UnknownExercise(command.exercise_id.clone()))?
            .resolve(&command.exercise_id, &self.config)?;

        let origin = RangeOrigin::from_descriptor(Some(&rule.range));
        if origin.is_fallback() {
            warn!(
                "Range '{}' of section '{}' has no start cell, labelling cells from A1",
                rule.range, command.exercise_id
            );
        }

        debug!(
            "Fetching {} from {} and {}",
            rule.range, command.student_sheet_id, rule.solution_sheet_id
        );
        let (student, solution) = tokio::try_join!(
            self.sheets.read_range(&command.student_sheet_id, &rule.range),
            self.sheets.read_range(&rule.solution_sheet_id, &rule.range),
        )?;

        let result = compare_from(&student, &solution, rule.tolerance, &origin);

        let key = ProgressKey::new(command.learner_id.as_str(), command.exercise_id.as_str());
        let attempt = Attempt {
            success: result.is_success(),
            hint_used: command.hint_used,
            base_xp: rule.base_xp,
            exercise_title: rule.title,
            at: Utc::now(),
        };
        let (transition, persistence_failure) = self.record(&key, &attempt).await;

        let message = summary_message(&result, &transition, command.hint_used);
        info!(
            learner = %key.learner_id,
            section = %key.exercise_id,
            score = result.score(),
            xp = transition.xp_delta,
            "Graded {}/{} cells",
            result.correct_cells,
            result.total_cells
        );

        Ok(GradeOutcome {
            response: GradeResponse::new(
                &result,
                self.config.max_reported_errors,
                transition.xp_delta,
                message,
            ),
            transition,
            persistence_failure,
        })
    }

    /// Persist an attempt and any XP it awards
    ///
    /// If the record cannot be written, the transition predicted from the
    /// last known record is returned with the failure.
    async fn record(
        &self,
        key: &ProgressKey,
        attempt: &Attempt,
    ) -> (Transition, Option<PersistenceFailure>) {
        let snapshot = match self.progression.get_record(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Could not read progression of {:?}: {}", key, e);
                None
            }
        };
        let predicted = apply_result(snapshot.as_ref(), key, attempt);

        let committed = match self.progression.record_attempt(key, attempt).await {
            Ok(transition) => transition,
            Err(source) => {
                return (
                    predicted,
                    Some(Self::failed(PersistenceStage::Record, source)),
                )
            }
        };

        let Some(entry) = committed.ledger_entry.as_ref() else {
            return (committed, None);
        };

        if let Err(source) = self.ledger.append_entry(entry).await {
            return (
                committed,
                Some(Self::failed(PersistenceStage::Ledger, source)),
            );
        }
        if let Err(source) = self
            .ledger
            .credit_learner(&key.learner_id, committed.xp_delta)
            .await
        {
            return (
                committed,
                Some(Self::failed(PersistenceStage::LearnerTotal, source)),
            );
        }

        (committed, None)
    }

    fn failed(stage: PersistenceStage, source: crate::error::StoreError) -> PersistenceFailure {
        let failure = PersistenceFailure { stage, source };
        error!("{}", failure);
        failure
    }
}
