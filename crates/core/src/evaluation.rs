//! Answer evaluation for stored and generated questions.
//!
//! Stored questions come in two shapes. Newer rows reference the correct
//! option by id ([`CorrectAnswer::OptionId`]) and are compared by identity.
//! Older rows keep a free-text `correct_answer` that may hold either the
//! option label or the option image URL ([`CorrectAnswer::Legacy`]); those
//! go through a two-path string match.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Option types
// ---------------------------------------------------------------------------

/// How a question's options are presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Text,
    Image,
}

impl OptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("TEXT") {
            Ok(Self::Text)
        } else if s.eq_ignore_ascii_case("IMAGE") {
            Ok(Self::Image)
        } else {
            Err(CoreError::Validation(format!(
                "Unknown option type '{s}'. Expected TEXT or IMAGE"
            )))
        }
    }
}

/// A selectable option as served to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Answer keys
// ---------------------------------------------------------------------------

/// An option of a stored question, carrying its database id.
#[derive(Debug, Clone)]
pub struct KeyedOption {
    pub id: DbId,
    pub label: String,
    pub image_url: Option<String>,
}

/// Where the correct answer of a stored question lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectAnswer {
    /// Id of the correct option.
    OptionId(DbId),
    /// Free-text value: either an option label or an option image URL.
    Legacy(String),
}

/// Everything needed to evaluate an answer to a stored question.
#[derive(Debug, Clone)]
pub struct AnswerKey {
    pub option_type: OptionType,
    pub options: Vec<KeyedOption>,
    pub correct: CorrectAnswer,
}

// ---------------------------------------------------------------------------
// Matching helpers
// ---------------------------------------------------------------------------

/// Unicode-aware case-insensitive equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Trim a client selection; a missing selection is the empty string.
pub fn normalize_selection(selected: Option<&str>) -> &str {
    selected.map(str::trim).unwrap_or("")
}

/// Compare a selection against the correct name of a generated question.
pub fn matches_expected(expected: &str, selected: Option<&str>) -> bool {
    eq_ignore_case(expected, normalize_selection(selected))
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Decide whether `selected` answers the stored question correctly.
pub fn is_correct(key: &AnswerKey, selected: Option<&str>) -> bool {
    let selected = normalize_selection(selected);

    match &key.correct {
        CorrectAnswer::OptionId(correct_id) => key
            .options
            .iter()
            .any(|o| o.id == *correct_id && eq_ignore_case(&o.label, selected)),
        CorrectAnswer::Legacy(correct) => {
            if eq_ignore_case(correct, selected) {
                return true;
            }
            if key.option_type != OptionType::Image {
                return false;
            }
            key.options.iter().any(|o| {
                eq_ignore_case(&o.label, selected)
                    && o.image_url
                        .as_deref()
                        .is_some_and(|url| eq_ignore_case(correct, url))
            })
        }
    }
}

/// The display label of the correct answer.
///
/// For legacy rows whose stored value matches neither a label nor an image
/// URL, the raw value is returned unchanged and a warning is logged.
pub fn correct_answer_label(key: &AnswerKey) -> String {
    match &key.correct {
        CorrectAnswer::OptionId(correct_id) => {
            match key.options.iter().find(|o| o.id == *correct_id) {
                Some(option) => option.label.clone(),
                None => {
                    tracing::warn!(
                        option_id = correct_id,
                        "Correct option id does not belong to the question"
                    );
                    String::new()
                }
            }
        }
        CorrectAnswer::Legacy(correct) => {
            if key.options.iter().any(|o| eq_ignore_case(&o.label, correct)) {
                return correct.clone();
            }
            let by_url = key.options.iter().find(|o| {
                o.image_url
                    .as_deref()
                    .is_some_and(|url| eq_ignore_case(url, correct))
            });
            match by_url {
                Some(option) => option.label.clone(),
                None => {
                    tracing::warn!(
                        correct_answer = %correct,
                        "Stored correct answer matches no option label or image URL"
                    );
                    correct.clone()
                }
            }
        }
    }
}
