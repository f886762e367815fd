//! Route definitions for the ephemeral song quiz.

use axum::routing::post;
use axum::Router;

use crate::handlers::song_quiz;
use crate::state::AppState;

/// Song quiz routes mounted at `/song-quiz`.
///
/// ```text
/// POST   /generate-questions  -> generate_questions
/// POST   /check-answer        -> check_answer
/// POST   /submit-quiz         -> submit_quiz
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-questions", post(song_quiz::generate_questions))
        .route("/check-answer", post(song_quiz::check_answer))
        .route("/submit-quiz", post(song_quiz::submit_quiz))
}
