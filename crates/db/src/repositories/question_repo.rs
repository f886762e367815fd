//! Repository for the `questions` and `question_options` tables.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use tunequiz_core::types::DbId;

use crate::models::question::{CreateQuestion, Question, QuestionOption, QuestionWithOptions};

/// Column list for `questions` queries.
const QUESTION_COLUMNS: &str = "\
    id, quiz_id, text, option_type, correct_answer, correct_option_id, \
    audio_url, created_at, updated_at";

/// Column list for `question_options` queries.
const OPTION_COLUMNS: &str = "id, question_id, position, label, image_url";

/// Provides CRUD operations for stored questions and their options.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Insert a question and its options in a single transaction.
    ///
    /// Options are stored in payload order. When `correct_option_position`
    /// is set, the question's `correct_option_id` is pointed at that option.
    pub async fn create(
        pool: &PgPool,
        quiz_id: DbId,
        input: &CreateQuestion,
    ) -> Result<QuestionWithOptions, sqlx::Error> {
        let option_type = input
            .option_type()
            .map(|t| t.as_str())
            .unwrap_or("TEXT");

        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO questions (quiz_id, text, option_type, correct_answer, audio_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {QUESTION_COLUMNS}"
        );
        let mut question = sqlx::query_as::<_, Question>(&insert_query)
            .bind(quiz_id)
            .bind(input.text.trim())
            .bind(option_type)
            .bind(input.correct_answer.as_deref())
            .bind(input.audio_url.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let options = Self::insert_options_inner(&mut tx, question.id, input).await?;

        if let Some(pos) = input.correct_option_position {
            if let Some(correct) = options.iter().find(|o| o.position == pos) {
                let update_query = format!(
                    "UPDATE questions SET correct_option_id = $2, updated_at = now() \
                     WHERE id = $1 RETURNING {QUESTION_COLUMNS}"
                );
                question = sqlx::query_as::<_, Question>(&update_query)
                    .bind(question.id)
                    .bind(correct.id)
                    .fetch_one(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(QuestionWithOptions { question, options })
    }

    async fn insert_options_inner(
        tx: &mut Transaction<'_, Postgres>,
        question_id: DbId,
        input: &CreateQuestion,
    ) -> Result<Vec<QuestionOption>, sqlx::Error> {
        let query = format!(
            "INSERT INTO question_options (question_id, position, label, image_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {OPTION_COLUMNS}"
        );
        let mut options = Vec::with_capacity(input.options.len());
        for (position, opt) in input.options.iter().enumerate() {
            let row = sqlx::query_as::<_, QuestionOption>(&query)
                .bind(question_id)
                .bind(position as i32)
                .bind(opt.label.trim())
                .bind(opt.image_url.as_deref())
                .fetch_one(&mut **tx)
                .await?;
            options.push(row);
        }
        Ok(options)
    }

    /// Find a question by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a question by ID together with its options.
    pub async fn find_with_options(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<QuestionWithOptions>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(question) => {
                let options = Self::list_options(pool, question.id).await?;
                Ok(Some(QuestionWithOptions { question, options }))
            }
            None => Ok(None),
        }
    }

    /// List the options of a question, ordered by position.
    pub async fn list_options(
        pool: &PgPool,
        question_id: DbId,
    ) -> Result<Vec<QuestionOption>, sqlx::Error> {
        let query = format!(
            "SELECT {OPTION_COLUMNS} FROM question_options \
             WHERE question_id = $1 ORDER BY position"
        );
        sqlx::query_as::<_, QuestionOption>(&query)
            .bind(question_id)
            .fetch_all(pool)
            .await
    }

    /// List every question of a quiz with its options, in insertion order.
    pub async fn list_by_quiz(
        pool: &PgPool,
        quiz_id: DbId,
    ) -> Result<Vec<QuestionWithOptions>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY id"
        );
        let questions = sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await?;

        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = questions.iter().map(|q| q.id).collect();
        let options_query = format!(
            "SELECT {OPTION_COLUMNS} FROM question_options \
             WHERE question_id = ANY($1) ORDER BY question_id, position"
        );
        let all_options = sqlx::query_as::<_, QuestionOption>(&options_query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_question: HashMap<DbId, Vec<QuestionOption>> = HashMap::new();
        for opt in all_options {
            by_question.entry(opt.question_id).or_default().push(opt);
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let options = by_question.remove(&question.id).unwrap_or_default();
                QuestionWithOptions { question, options }
            })
            .collect())
    }
}
