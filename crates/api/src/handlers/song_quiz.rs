//! Handlers for the ephemeral song quiz.
//!
//! Questions are generated on demand from the song bank and live only in
//! the in-memory session store. Checking a single answer to an unknown
//! question fails with 404, while a batch submit skips unknown questions.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tunequiz_core::difficulty::Difficulty;
use tunequiz_core::scoring::AnswerSubmission;
use tunequiz_core::song_quiz::DEFAULT_QUESTION_COUNT;
use tunequiz_core::types::{DbId, Timestamp};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /song-quiz/generate-questions`.
#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub count: Option<usize>,
}

/// Request body for `POST /song-quiz/check-answer`.
#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    pub question_id: DbId,
    pub difficulty: String,
    pub selected_option: Option<String>,
    /// Defaults to the time the request is handled.
    pub answered_at: Option<Timestamp>,
}

/// Request body for `POST /song-quiz/submit-quiz`.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<AnswerSubmission>,
    pub difficulty: String,
}

/// POST /api/v1/song-quiz/generate-questions
///
/// Generate `count` (default 10) image questions and register them for
/// later checking.
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(input): Json<GenerateQuestionsRequest>,
) -> AppResult<impl IntoResponse> {
    let count = input.count.unwrap_or(DEFAULT_QUESTION_COUNT);
    let questions = state.song_quiz.generate_questions(count)?;

    tracing::info!(count = questions.len(), "Generated song quiz questions");

    Ok(Json(DataResponse { data: questions }))
}

/// POST /api/v1/song-quiz/check-answer
///
/// Check one answer and score it against the question's serve time.
pub async fn check_answer(
    State(state): State<AppState>,
    Json(input): Json<CheckAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let difficulty: Difficulty = input.difficulty.parse()?;

    let result = state.song_quiz.check_answer(
        input.question_id,
        difficulty,
        input.selected_option.as_deref(),
        input.answered_at,
    )?;

    tracing::debug!(
        question_id = input.question_id,
        %difficulty,
        correct = result.correct,
        score = result.score_earned,
        "Checked song quiz answer",
    );

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/song-quiz/submit-quiz
///
/// Score a batch of answers. Answers to unknown or expired questions
/// contribute zero.
pub async fn submit_quiz(
    State(state): State<AppState>,
    Json(input): Json<SubmitQuizRequest>,
) -> AppResult<impl IntoResponse> {
    let difficulty: Difficulty = input.difficulty.parse()?;

    let result = state.song_quiz.submit_quiz(&input.answers, difficulty);

    tracing::info!(
        answers = input.answers.len(),
        %difficulty,
        total_score = result.total_score,
        "Song quiz submitted",
    );

    Ok(Json(DataResponse { data: result }))
}
