//! Repository for the `quizzes` table.

use sqlx::PgPool;
use tunequiz_core::types::DbId;

use crate::models::quiz::{CreateQuiz, Quiz};

/// Column list for `quizzes` queries.
const COLUMNS: &str = "id, title, created_at, updated_at";

/// Provides CRUD operations for quizzes.
pub struct QuizRepo;

impl QuizRepo {
    /// Insert a new quiz, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQuiz) -> Result<Quiz, sqlx::Error> {
        let query = format!("INSERT INTO quizzes (title) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(input.title.trim())
            .fetch_one(pool)
            .await
    }

    /// Find a quiz by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all quizzes, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Quiz>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quizzes ORDER BY id");
        sqlx::query_as::<_, Quiz>(&query).fetch_all(pool).await
    }

    /// Delete a quiz and, by cascade, its questions and attempts.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
