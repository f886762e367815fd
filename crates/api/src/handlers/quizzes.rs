//! Handlers for stored quizzes.
//!
//! Provides quiz and question management, shuffled serving, single-answer
//! checks and timed submissions that are recorded as attempts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tunequiz_core::difficulty::Difficulty;
use tunequiz_core::error::CoreError;
use tunequiz_core::evaluation::{correct_answer_label, is_correct, AnswerOption};
use tunequiz_core::scoring::{score, time_taken_secs, AnswerSubmission, ScoreResult};
use tunequiz_core::types::{DbId, Timestamp};
use tunequiz_db::models::attempt::{
    NewQuestionAttempt, NewQuizAttempt, QuestionAttempt, QuizAttempt,
};
use tunequiz_db::models::question::{CreateQuestion, QuestionWithOptions};
use tunequiz_db::models::quiz::{CreateQuiz, Quiz};
use tunequiz_db::repositories::{QuestionRepo, QuizAttemptRepo, QuizRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of a quiz title.
const MAX_TITLE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `?difficulty=` query parameter shared by check and submit.
#[derive(Debug, Deserialize)]
pub struct DifficultyParams {
    pub difficulty: String,
}

/// Request body for checking an answer to a stored question.
#[derive(Debug, Deserialize)]
pub struct CheckStoredAnswerRequest {
    pub selected_option: Option<String>,
    pub served_at: Timestamp,
    /// Defaults to the time the request is handled.
    pub answered_at: Option<Timestamp>,
}

/// A stored question as served to players: no answer key.
#[derive(Debug, Serialize)]
pub struct ServedQuestion {
    pub id: DbId,
    pub text: String,
    pub option_type: String,
    pub options: Vec<AnswerOption>,
    pub served_at: Timestamp,
    pub audio_url: Option<String>,
}

/// Result of a recorded timed submission.
#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub attempt_id: DbId,
    pub total_score: i32,
}

/// A recorded attempt with its per-question results.
#[derive(Debug, Serialize)]
pub struct AttemptDetail {
    #[serde(flatten)]
    pub attempt: QuizAttempt,
    pub answers: Vec<QuestionAttempt>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_quiz_exists(state: &AppState, quiz_id: DbId) -> AppResult<Quiz> {
    QuizRepo::find_by_id(&state.pool, quiz_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Quiz",
            id: quiz_id,
        }))
}

async fn load_question(
    state: &AppState,
    quiz_id: DbId,
    question_id: DbId,
) -> AppResult<QuestionWithOptions> {
    let question = QuestionRepo::find_with_options(&state.pool, question_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id: question_id,
        }))?;

    if question.question.quiz_id != quiz_id {
        return Err(AppError::BadRequest(format!(
            "Question {question_id} does not belong to quiz {quiz_id}"
        )));
    }
    Ok(question)
}

// ---------------------------------------------------------------------------
// Quiz CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/quizzes
pub async fn list_quizzes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let quizzes = QuizRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: quizzes }))
}

/// POST /api/v1/quizzes
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(input): Json<CreateQuiz>,
) -> AppResult<impl IntoResponse> {
    let title = input.title.trim();
    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "title must be between 1 and {MAX_TITLE_LEN} characters"
        ))));
    }

    let quiz = QuizRepo::create(&state.pool, &input).await?;

    tracing::info!(quiz_id = quiz.id, title = %quiz.title, "Quiz created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: quiz })))
}

/// DELETE /api/v1/quizzes/{quiz_id}
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !QuizRepo::delete(&state.pool, quiz_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Quiz",
            id: quiz_id,
        }));
    }

    tracing::info!(quiz_id, "Quiz deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// POST /api/v1/quizzes/{quiz_id}/questions
pub async fn add_question(
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
    Json(input): Json<CreateQuestion>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_quiz_exists(&state, quiz_id).await?;

    let question = QuestionRepo::create(&state.pool, quiz_id, &input).await?;

    tracing::info!(
        quiz_id,
        question_id = question.question.id,
        options = question.options.len(),
        "Question added",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// GET /api/v1/quizzes/{quiz_id}/questions
///
/// Serve every question of the quiz in random order with shuffled options
/// and a shared serve timestamp. Answer keys are never included.
pub async fn list_questions(
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_quiz_exists(&state, quiz_id).await?;

    let questions = QuestionRepo::list_by_quiz(&state.pool, quiz_id).await?;
    let served_at = chrono::Utc::now();

    let mut rng = rand::rng();
    let mut served: Vec<ServedQuestion> = questions
        .iter()
        .map(|q| {
            let mut options = q.served_options();
            options.shuffle(&mut rng);
            ServedQuestion {
                id: q.question.id,
                text: q.question.text.clone(),
                option_type: q.question.option_type.clone(),
                options,
                served_at,
                audio_url: q.question.audio_url.clone(),
            }
        })
        .collect();
    served.shuffle(&mut rng);

    Ok(Json(DataResponse { data: served }))
}

// ---------------------------------------------------------------------------
// Answering
// ---------------------------------------------------------------------------

/// POST /api/v1/quizzes/{quiz_id}/questions/{question_id}/check?difficulty=
pub async fn check_answer(
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(DbId, DbId)>,
    Query(params): Query<DifficultyParams>,
    Json(input): Json<CheckStoredAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let difficulty: Difficulty = params.difficulty.parse()?;
    let question = load_question(&state, quiz_id, question_id).await?;
    let key = question.answer_key()?;

    let answered_at = input.answered_at.unwrap_or_else(chrono::Utc::now);
    let taken = time_taken_secs(input.served_at, answered_at);
    let correct = is_correct(&key, input.selected_option.as_deref());

    let result = ScoreResult {
        correct,
        correct_answer_label: correct_answer_label(&key),
        time_taken_seconds: taken,
        score_earned: score(correct, taken, difficulty.time_budget_secs()),
    };

    tracing::debug!(
        quiz_id,
        question_id,
        %difficulty,
        correct,
        score = result.score_earned,
        "Checked stored answer",
    );

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/quizzes/{quiz_id}/submit?difficulty=
///
/// Score every answer and record the attempt. Unlike the song quiz, an
/// answer to an unknown question fails the whole submission.
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
    Query(params): Query<DifficultyParams>,
    Json(answers): Json<Vec<AnswerSubmission>>,
) -> AppResult<impl IntoResponse> {
    let difficulty: Difficulty = params.difficulty.parse()?;
    if answers.is_empty() {
        return Err(AppError::BadRequest("answers must not be empty".into()));
    }
    ensure_quiz_exists(&state, quiz_id).await?;

    let budget = difficulty.time_budget_secs();
    let mut total_score = 0;
    let mut scored = Vec::with_capacity(answers.len());

    for answer in &answers {
        let served_at = answer.served_at.ok_or_else(|| {
            AppError::BadRequest(format!(
                "served_at is required for question {}",
                answer.question_id
            ))
        })?;
        let question = load_question(&state, quiz_id, answer.question_id).await?;
        let key = question.answer_key()?;

        let taken = time_taken_secs(served_at, answer.answered_at);
        let correct = is_correct(&key, answer.selected_option.as_deref());
        let score_earned = score(correct, taken, budget);
        total_score += score_earned;

        scored.push(NewQuestionAttempt {
            question_id: answer.question_id,
            selected_option: answer.selected_option.clone(),
            correct,
            time_taken_seconds: taken,
            score_earned,
            served_at,
            answered_at: answer.answered_at,
        });
    }

    let start_time = scored.iter().map(|a| a.served_at).min();
    let end_time = scored.iter().map(|a| a.answered_at).max();
    let (Some(start_time), Some(end_time)) = (start_time, end_time) else {
        return Err(AppError::InternalError("no scored answers".into()));
    };

    let attempt = QuizAttemptRepo::create(
        &state.pool,
        &NewQuizAttempt {
            quiz_id,
            difficulty: difficulty.to_string(),
            start_time,
            end_time,
            total_score,
        },
        &scored,
    )
    .await?;

    tracing::info!(
        quiz_id,
        attempt_id = attempt.id,
        %difficulty,
        total_score,
        "Timed quiz submitted",
    );

    Ok(Json(DataResponse {
        data: SubmitQuizResponse {
            attempt_id: attempt.id,
            total_score,
        },
    }))
}

/// GET /api/v1/quizzes/{quiz_id}/attempts
pub async fn list_attempts(
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_quiz_exists(&state, quiz_id).await?;
    let attempts = QuizAttemptRepo::list_by_quiz(&state.pool, quiz_id).await?;
    Ok(Json(DataResponse { data: attempts }))
}

/// GET /api/v1/quizzes/{quiz_id}/attempts/{attempt_id}
pub async fn get_attempt(
    State(state): State<AppState>,
    Path((quiz_id, attempt_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let attempt = QuizAttemptRepo::find_by_id(&state.pool, attempt_id)
        .await?
        .filter(|a| a.quiz_id == quiz_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QuizAttempt",
            id: attempt_id,
        }))?;
    let answers = QuizAttemptRepo::list_question_attempts(&state.pool, attempt.id).await?;

    Ok(Json(DataResponse {
        data: AttemptDetail { attempt, answers },
    }))
}
