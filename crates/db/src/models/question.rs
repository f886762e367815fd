//! Stored question and option entities and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tunequiz_core::error::CoreError;
use tunequiz_core::evaluation::{
    eq_ignore_case, AnswerKey, AnswerOption, CorrectAnswer, KeyedOption, OptionType,
};
use tunequiz_core::types::{DbId, Timestamp};

/// Maximum options a stored question may carry.
pub const MAX_OPTIONS: usize = 10;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub quiz_id: DbId,
    pub text: String,
    pub option_type: String,
    pub correct_answer: Option<String>,
    pub correct_option_id: Option<DbId>,
    pub audio_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `question_options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionOption {
    pub id: DbId,
    pub question_id: DbId,
    pub position: i32,
    pub label: String,
    pub image_url: Option<String>,
}

/// A question together with its options, ordered by position.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

impl QuestionWithOptions {
    /// Build the evaluator's view of this question.
    ///
    /// An explicit `correct_option_id` takes precedence over the legacy
    /// `correct_answer` text; a missing legacy value evaluates as empty.
    pub fn answer_key(&self) -> Result<AnswerKey, CoreError> {
        let option_type: OptionType = self.question.option_type.parse()?;
        let correct = match self.question.correct_option_id {
            Some(id) => CorrectAnswer::OptionId(id),
            None => CorrectAnswer::Legacy(self.question.correct_answer.clone().unwrap_or_default()),
        };
        let options = self
            .options
            .iter()
            .map(|o| KeyedOption {
                id: o.id,
                label: o.label.clone(),
                image_url: o.image_url.clone(),
            })
            .collect();

        Ok(AnswerKey {
            option_type,
            options,
            correct,
        })
    }

    /// Options as served to players, without ids.
    pub fn served_options(&self) -> Vec<AnswerOption> {
        self.options
            .iter()
            .map(|o| AnswerOption {
                label: o.label.clone(),
                image_url: o.image_url.clone(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// A single option in a [`CreateQuestion`] payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionOption {
    pub label: String,
    pub image_url: Option<String>,
}

/// DTO for adding a question to a quiz.
///
/// The correct answer is given either as `correct_option_position` (index
/// into `options`) or as legacy `correct_answer` text.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestion {
    pub text: String,
    pub option_type: Option<String>,
    pub options: Vec<CreateQuestionOption>,
    pub correct_answer: Option<String>,
    pub correct_option_position: Option<i32>,
    pub audio_url: Option<String>,
}

impl CreateQuestion {
    /// Resolved option type, defaulting to `TEXT`.
    pub fn option_type(&self) -> Result<OptionType, CoreError> {
        self.option_type
            .as_deref()
            .map_or(Ok(OptionType::Text), |s| s.parse())
    }

    /// Check the payload before it reaches the database.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.text.trim().is_empty() {
            return Err(CoreError::Validation("text must not be empty".into()));
        }
        self.option_type()?;

        if self.options.is_empty() || self.options.len() > MAX_OPTIONS {
            return Err(CoreError::Validation(format!(
                "a question needs between 1 and {MAX_OPTIONS} options"
            )));
        }
        if self.options.iter().any(|o| o.label.trim().is_empty()) {
            return Err(CoreError::Validation("option labels must not be empty".into()));
        }
        for (i, a) in self.options.iter().enumerate() {
            if let Some(b) = self.options[i + 1..]
                .iter()
                .find(|b| eq_ignore_case(a.label.trim(), b.label.trim()))
            {
                return Err(CoreError::Validation(format!(
                    "option labels must be unique ignoring case: '{}' and '{}'",
                    a.label.trim(),
                    b.label.trim()
                )));
            }
        }

        match (self.correct_option_position, self.correct_answer.as_deref()) {
            (Some(pos), _) if pos < 0 || pos as usize >= self.options.len() => {
                Err(CoreError::Validation(format!(
                    "correct_option_position {pos} is out of range"
                )))
            }
            (Some(_), _) => Ok(()),
            (None, Some(answer)) if !answer.trim().is_empty() => Ok(()),
            (None, _) => Err(CoreError::Validation(
                "either correct_option_position or correct_answer is required".into(),
            )),
        }
    }
}
