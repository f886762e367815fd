//! Quiz entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tunequiz_core::types::{DbId, Timestamp};

/// A row from the `quizzes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: DbId,
    pub title: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new quiz.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuiz {
    pub title: String,
}
