//! Request and response records exchanged with callers
//!
//! Field names match the JSON a web client sends and expects.

use gridmark_engine::{ComparisonResult, Mismatch};
use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// Incoming grading request, as received
///
/// Every field is optional on the wire; [`GradeRequest::validate`] turns it
/// into a [`GradeCommand`] or rejects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeRequest {
    pub user_spreadsheet_id: Option<String>,
    pub section_id: Option<String>,
    pub user_id: Option<String>,
    pub hint_used: Option<bool>,
}

impl GradeRequest {
    pub fn new(
        user_spreadsheet_id: impl Into<String>,
        section_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            user_spreadsheet_id: Some(user_spreadsheet_id.into()),
            section_id: Some(section_id.into()),
            user_id: Some(user_id.into()),
            hint_used: None,
        }
    }

    pub fn with_hint(mut self, hint_used: bool) -> Self {
        self.hint_used = Some(hint_used);
        self
    }

    /// Check required fields
    pub fn validate(&self) -> Result<GradeCommand, GradeError> {
        fn required(field: &Option<String>) -> Option<String> {
            field
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        }

        match (
            required(&self.user_spreadsheet_id),
            required(&self.section_id),
            required(&self.user_id),
        ) {
            (Some(student_sheet_id), Some(exercise_id), Some(learner_id)) => Ok(GradeCommand {
                student_sheet_id,
                exercise_id,
                learner_id,
                hint_used: self.hint_used.unwrap_or(false),
            }),
            _ => Err(GradeError::MissingFields),
        }
    }
}

/// A validated grading request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeCommand {
    pub student_sheet_id: String,
    pub exercise_id: String,
    pub learner_id: String,
    pub hint_used: bool,
}

/// One reported cell mismatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellErrorReport {
    pub cell: String,
    pub expected: String,
    pub actual: String,
}

impl From<&Mismatch> for CellErrorReport {
    fn from(m: &Mismatch) -> Self {
        Self {
            cell: m.cell.clone(),
            expected: m.expected.clone(),
            actual: m.actual.clone(),
        }
    }
}

/// Grading result sent back to the learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResponse {
    pub is_valid: bool,
    pub score: u32,
    pub total_cells: usize,
    pub correct_cells: usize,
    /// First mismatches in row-major order
    pub errors: Vec<CellErrorReport>,
    pub xp_earned: u32,
    pub message: String,
}

impl GradeResponse {
    pub(crate) fn new(
        result: &ComparisonResult,
        max_errors: usize,
        xp_earned: u32,
        message: String,
    ) -> Self {
        Self {
            is_valid: result.is_success(),
            score: result.score(),
            total_cells: result.total_cells,
            correct_cells: result.correct_cells,
            errors: result
                .mismatches
                .iter()
                .take(max_errors)
                .map(CellErrorReport::from)
                .collect(),
            xp_earned,
            message,
        }
    }
}

/// Body of an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
