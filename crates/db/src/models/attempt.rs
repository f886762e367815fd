//! Quiz attempt and per-question attempt entities and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tunequiz_core::types::{DbId, Timestamp};

/// A row from the `quiz_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizAttempt {
    pub id: DbId,
    pub quiz_id: DbId,
    pub difficulty: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub total_score: i32,
    pub created_at: Timestamp,
}

/// A row from the `question_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionAttempt {
    pub id: DbId,
    pub quiz_attempt_id: DbId,
    pub question_id: DbId,
    pub selected_option: Option<String>,
    pub correct: bool,
    pub time_taken_seconds: i64,
    pub score_earned: i32,
    pub served_at: Timestamp,
    pub answered_at: Timestamp,
}

/// Insert payload for a quiz attempt.
#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub quiz_id: DbId,
    pub difficulty: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub total_score: i32,
}

/// Insert payload for one scored answer within an attempt.
#[derive(Debug, Clone)]
pub struct NewQuestionAttempt {
    pub question_id: DbId,
    pub selected_option: Option<String>,
    pub correct: bool,
    pub time_taken_seconds: i64,
    pub score_earned: i32,
    pub served_at: Timestamp,
    pub answered_at: Timestamp,
}
