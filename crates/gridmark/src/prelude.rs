//! Common imports for gridmark users
//!
//! ```rust
//! use gridmark::prelude::*;
//! ```

pub use crate::{
    ExerciseRule,
    GradeError,
    GradeOutcome,
    GradeRequest,
    GradeResponse,
    GraderConfig,
    GradingService,
    ProgressKey,
    ProgressionRecord,
    ProgressionStore,
    RuleSource,
    SpreadsheetReader,
    XpLedgerStore,
};
