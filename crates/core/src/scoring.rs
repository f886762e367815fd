//! Time-banded scoring for a single answered question.
//!
//! Bands are fractions of the difficulty's time budget. Comparisons use
//! integer arithmetic (`10 * t <= 3 * budget`) so the band edges are exact.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Points for a correct answer within 30% of the budget.
pub const FAST_SCORE: i32 = 10;
/// Points for a correct answer within 60% of the budget.
pub const MEDIUM_SCORE: i32 = 7;
/// Points for any slower correct answer. There is no lateness floor.
pub const SLOW_SCORE: i32 = 5;

/// Score a single answer.
///
/// Negative `time_taken_secs` (answer timestamped before the serve time) is
/// not rejected here and lands in the fastest band.
pub fn score(correct: bool, time_taken_secs: i64, time_budget_secs: i64) -> i32 {
    if !correct {
        return 0;
    }
    let scaled = time_taken_secs.saturating_mul(10);
    if scaled <= time_budget_secs * 3 {
        FAST_SCORE
    } else if scaled <= time_budget_secs * 6 {
        MEDIUM_SCORE
    } else {
        SLOW_SCORE
    }
}

/// Whole seconds elapsed between serving and answering, truncated toward zero.
pub fn time_taken_secs(served_at: Timestamp, answered_at: Timestamp) -> i64 {
    (answered_at - served_at).num_seconds()
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of checking a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub correct: bool,
    pub correct_answer_label: String,
    pub time_taken_seconds: i64,
    pub score_earned: i32,
}

/// Aggregated score for a submitted quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub total_score: i32,
}

/// One answer inside a batch submission.
///
/// `served_at` is client-supplied. Generated questions ignore it in favour
/// of the serve time recorded at generation.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: DbId,
    pub selected_option: Option<String>,
    pub served_at: Option<Timestamp>,
    pub answered_at: Timestamp,
}
