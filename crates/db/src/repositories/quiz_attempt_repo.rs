//! Repository for the `quiz_attempts` and `question_attempts` tables.

use sqlx::PgPool;
use tunequiz_core::types::DbId;

use crate::models::attempt::{NewQuestionAttempt, NewQuizAttempt, QuestionAttempt, QuizAttempt};

/// Column list for `quiz_attempts` queries.
const ATTEMPT_COLUMNS: &str = "\
    id, quiz_id, difficulty, start_time, end_time, total_score, created_at";

/// Column list for `question_attempts` queries.
const QUESTION_ATTEMPT_COLUMNS: &str = "\
    id, quiz_attempt_id, question_id, selected_option, correct, \
    time_taken_seconds, score_earned, served_at, answered_at";

/// Records scored quiz submissions.
pub struct QuizAttemptRepo;

impl QuizAttemptRepo {
    /// Insert an attempt and all of its question results in one transaction.
    pub async fn create(
        pool: &PgPool,
        attempt: &NewQuizAttempt,
        answers: &[NewQuestionAttempt],
    ) -> Result<QuizAttempt, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_attempt = format!(
            "INSERT INTO quiz_attempts (quiz_id, difficulty, start_time, end_time, total_score) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ATTEMPT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, QuizAttempt>(&insert_attempt)
            .bind(attempt.quiz_id)
            .bind(&attempt.difficulty)
            .bind(attempt.start_time)
            .bind(attempt.end_time)
            .bind(attempt.total_score)
            .fetch_one(&mut *tx)
            .await?;

        for answer in answers {
            sqlx::query(
                "INSERT INTO question_attempts \
                    (quiz_attempt_id, question_id, selected_option, correct, \
                     time_taken_seconds, score_earned, served_at, answered_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(created.id)
            .bind(answer.question_id)
            .bind(answer.selected_option.as_deref())
            .bind(answer.correct)
            .bind(answer.time_taken_seconds)
            .bind(answer.score_earned)
            .bind(answer.served_at)
            .bind(answer.answered_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            attempt_id = created.id,
            quiz_id = created.quiz_id,
            answers = answers.len(),
            "Recorded quiz attempt"
        );
        Ok(created)
    }

    /// Find an attempt by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QuizAttempt>, sqlx::Error> {
        let query = format!("SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE id = $1");
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List attempts for a quiz, newest first.
    pub async fn list_by_quiz(
        pool: &PgPool,
        quiz_id: DbId,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts \
             WHERE quiz_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await
    }

    /// List the per-question results of an attempt.
    pub async fn list_question_attempts(
        pool: &PgPool,
        quiz_attempt_id: DbId,
    ) -> Result<Vec<QuestionAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_ATTEMPT_COLUMNS} FROM question_attempts \
             WHERE quiz_attempt_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, QuestionAttempt>(&query)
            .bind(quiz_attempt_id)
            .fetch_all(pool)
            .await
    }
}
