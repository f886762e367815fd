//! Route definitions for stored quizzes.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::quizzes;
use crate::state::AppState;

/// Stored quiz routes mounted at `/quizzes`.
///
/// ```text
/// GET    /                                    -> list_quizzes
/// POST   /                                    -> create_quiz
/// DELETE /{quiz_id}                           -> delete_quiz
/// GET    /{quiz_id}/questions                 -> list_questions
/// POST   /{quiz_id}/questions                 -> add_question
/// POST   /{quiz_id}/questions/{question_id}/check -> check_answer
/// POST   /{quiz_id}/submit                    -> submit_quiz
/// GET    /{quiz_id}/attempts                  -> list_attempts
/// GET    /{quiz_id}/attempts/{attempt_id}     -> get_attempt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quizzes::list_quizzes).post(quizzes::create_quiz))
        .route("/{quiz_id}", delete(quizzes::delete_quiz))
        .route(
            "/{quiz_id}/questions",
            get(quizzes::list_questions).post(quizzes::add_question),
        )
        .route(
            "/{quiz_id}/questions/{question_id}/check",
            post(quizzes::check_answer),
        )
        .route("/{quiz_id}/submit", post(quizzes::submit_quiz))
        .route("/{quiz_id}/attempts", get(quizzes::list_attempts))
        .route(
            "/{quiz_id}/attempts/{attempt_id}",
            get(quizzes::get_attempt),
        )
}
