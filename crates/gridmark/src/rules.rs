//! Per-exercise validation rules

use serde::{Deserialize, Serialize};

use crate::config::GraderConfig;
use crate::error::GradeError;

/// How an exercise is graded, as configured by the instructor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRule {
    /// Exercise name shown in the XP ledger
    #[serde(default)]
    pub title: String,
    /// Sheet holding the reference answers
    #[serde(default)]
    pub solution_spreadsheet_id: String,
    /// Range graded on both sheets, e.g. `"O3:O102"`
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub tolerance: Option<f64>,
    /// XP for completing without a hint
    #[serde(default)]
    pub xp_reward: Option<u32>,
}

/// A rule with defaults applied and checked
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRule {
    pub title: String,
    pub solution_sheet_id: String,
    pub range: String,
    pub tolerance: f64,
    pub base_xp: u32,
}

impl ExerciseRule {
    /// Apply configuration defaults and reject unusable rules
    pub fn resolve(
        &self,
        exercise_id: &str,
        config: &GraderConfig,
    ) -> Result<ResolvedRule, GradeError> {
        if self.solution_spreadsheet_id.trim().is_empty() || self.range.trim().is_empty() {
            return Err(GradeError::IncompleteRule(exercise_id.to_string()));
        }

        let tolerance = self.tolerance.unwrap_or(config.default_tolerance);
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(GradeError::InvalidTolerance {
                exercise_id: exercise_id.to_string(),
                tolerance,
            });
        }

        let title = if self.title.trim().is_empty() {
            exercise_id.to_string()
        } else {
            self.title.clone()
        };

        Ok(ResolvedRule {
            title,
            solution_sheet_id: self.solution_spreadsheet_id.clone(),
            range: self.range.trim().to_string(),
            tolerance,
            base_xp: self.xp_reward.unwrap_or(config.default_base_xp),
        })
    }
}
