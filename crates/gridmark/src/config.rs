//! Service configuration

use gridmark_engine::DEFAULT_TOLERANCE;

/// Settings for [`GradingService`](crate::GradingService)
///
/// Built once at startup and passed in explicitly; the library never reads
/// the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct GraderConfig {
    /// Tolerance for exercises whose rule does not set one. Default: 0.01.
    pub default_tolerance: f64,
    /// XP for exercises whose rule does not set a reward. Default: 10.
    pub default_base_xp: u32,
    /// Mismatches included in a response. Default: 10.
    pub max_reported_errors: usize,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            default_tolerance: DEFAULT_TOLERANCE,
            default_base_xp: 10,
            max_reported_errors: 10,
        }
    }
}

impl GraderConfig {
    pub fn with_default_tolerance(mut self, tolerance: f64) -> Self {
        self.default_tolerance = tolerance;
        self
    }

    pub fn with_default_base_xp(mut self, xp: u32) -> Self {
        self.default_base_xp = xp;
        self
    }

    pub fn with_max_reported_errors(mut self, limit: usize) -> Self {
        self.max_reported_errors = limit;
        self
    }
}
