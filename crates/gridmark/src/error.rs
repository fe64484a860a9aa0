//! Error types for the grading service

use std::fmt;

use thiserror::Error;

use crate::schema::ErrorBody;

/// Result type for grading operations
pub type Result<T> = std::result::Result<T, GradeError>;

/// Failure reading a range from a spreadsheet source
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Spreadsheet not found: {0}")]
    NotFound(String),

    #[error("Access to spreadsheet {0} denied")]
    Unauthorized(String),

    #[error("Invalid range '{range}': {source}")]
    InvalidRange {
        range: String,
        #[source]
        source: gridmark_core::Error,
    },

    #[error("Failed to read spreadsheet {sheet_id}: {source}")]
    Io {
        sheet_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse spreadsheet {sheet_id}: {source}")]
    Csv {
        sheet_id: String,
        #[source]
        source: gridmark_csv::CsvError,
    },
}

/// Failure in a progression, ledger or rule store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that abort a grading request
///
/// Request and configuration problems are reported as client errors;
/// everything else is a server error.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("Missing required fields: user_spreadsheet_id, section_id, user_id")]
    MissingFields,

    #[error("No validation rules configured for section '{0}'")]
    UnknownExercise(String),

    #[error("Validation rule for section '{0}' is missing solution_spreadsheet_id or range")]
    IncompleteRule(String),

    #[error("Validation rule for section '{exercise_id}' has invalid tolerance {tolerance}")]
    InvalidTolerance { exercise_id: String, tolerance: f64 },

    #[error("Failed to load validation rules: {0}")]
    RuleLookup(#[source] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl GradeError {
    /// Whether the caller sent something unusable, as opposed to a failure
    /// on our side
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GradeError::MissingFields
                | GradeError::UnknownExercise(_)
                | GradeError::IncompleteRule(_)
                | GradeError::InvalidTolerance { .. }
        )
    }

    /// HTTP status a gateway should answer with
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// JSON body for the caller
    pub fn to_body(&self) -> ErrorBody {
        let error = if self.is_client_error() {
            self.to_string()
        } else {
            format!("Internal error: {}", self)
        };
        ErrorBody { error }
    }
}

/// Which progression write was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceStage {
    /// The progression record upsert
    Record,
    /// The XP ledger append
    Ledger,
    /// The learner's running XP total
    LearnerTotal,
}

impl fmt::Display for PersistenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PersistenceStage::Record => "progression record",
            PersistenceStage::Ledger => "XP ledger entry",
            PersistenceStage::LearnerTotal => "learner XP total",
        })
    }
}

/// A progression write that failed after grading succeeded
///
/// The grading result is still returned; only the side effect is lost.
#[derive(Debug, Error)]
#[error("Failed to save {stage}: {source}")]
pub struct PersistenceFailure {
    pub stage: PersistenceStage,
    #[source]
    pub source: StoreError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GradeError::MissingFields.status_code(), 400);
        assert_eq!(GradeError::UnknownExercise("s1".into()).status_code(), 400);

        let fetch = GradeError::from(FetchError::NotFound("abc".into()));
        assert_eq!(fetch.status_code(), 500);
        assert_eq!(
            fetch.to_body().error,
            "Internal error: Spreadsheet not found: abc"
        );
    }

    #[test]
    fn test_client_error_body_is_plain() {
        assert_eq!(
            GradeError::MissingFields.to_body().error,
            "Missing required fields: user_spreadsheet_id, section_id, user_id"
        );
    }
}
