//! Learner-facing summary of a graded attempt

use crate::compare::ComparisonResult;
use crate::progression::Transition;

/// Summarize an attempt for the learner
///
/// `hint_used` is the flag sent with this attempt; the penalty note is shown
/// only when XP is actually awarded.
pub fn summary_message(
    result: &ComparisonResult,
    transition: &Transition,
    hint_used: bool,
) -> String {
    if !result.is_success() {
        return format!(
            "{}/{} correct ({}%). Please review your answers.",
            result.correct_cells,
            result.total_cells,
            result.score()
        );
    }

    if transition.already_completed() {
        "All answers correct! (Already completed)".to_string()
    } else if hint_used {
        format!(
            "Congratulations! All answers correct! +{} XP (hint penalty applied)",
            transition.xp_delta
        )
    } else {
        format!(
            "Congratulations! All answers correct! +{} XP",
            transition.xp_delta
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{apply_result, Attempt, ProgressKey};
    use chrono::Utc;

    fn result(correct: usize, total: usize) -> ComparisonResult {
        ComparisonResult {
            total_cells: total,
            correct_cells: correct,
            mismatches: Vec::new(),
        }
    }

    fn attempt(success: bool, hint_used: bool) -> Attempt {
        Attempt {
            success,
            hint_used,
            base_xp: 10,
            exercise_title: "Totals".into(),
            at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_score() {
        let key = ProgressKey::new("l", "e");
        let t = apply_result(None, &key, &attempt(false, false));
        assert_eq!(
            summary_message(&result(3, 4), &t, false),
            "3/4 correct (75%). Please review your answers."
        );
    }

    #[test]
    fn test_success_variants() {
        let key = ProgressKey::new("l", "e");

        let plain = apply_result(None, &key, &attempt(true, false));
        assert_eq!(
            summary_message(&result(4, 4), &plain, false),
            "Congratulations! All answers correct! +10 XP"
        );

        let hinted = apply_result(None, &key, &attempt(true, true));
        assert_eq!(
            summary_message(&result(4, 4), &hinted, true),
            "Congratulations! All answers correct! +7 XP (hint penalty applied)"
        );

        let again = apply_result(Some(&plain.next), &key, &attempt(true, true));
        assert_eq!(
            summary_message(&result(4, 4), &again, true),
            "All answers correct! (Already completed)"
        );
    }
}
