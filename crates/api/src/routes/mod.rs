pub mod health;
pub mod quizzes;
pub mod song_quiz;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /song-quiz/generate-questions                    generate ephemeral questions (POST)
/// /song-quiz/check-answer                          check one answer (POST)
/// /song-quiz/submit-quiz                           score a batch (POST)
///
/// /quizzes                                         list, create
/// /quizzes/{quiz_id}                               delete
/// /quizzes/{quiz_id}/questions                     list (shuffled), add
/// /quizzes/{quiz_id}/questions/{question_id}/check check one answer (POST)
/// /quizzes/{quiz_id}/submit                        score and record a timed attempt (POST)
/// /quizzes/{quiz_id}/attempts                      list recorded attempts
/// /quizzes/{quiz_id}/attempts/{attempt_id}         attempt with per-question results
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/song-quiz", song_quiz::router())
        .nest("/quizzes", quizzes::router())
}
