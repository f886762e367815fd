//! Difficulty tiers and their per-question time budgets.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A named tier whose time budget defines the scoring thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Seconds a player has to answer a single question at this tier.
    pub fn time_budget_secs(self) -> i64 {
        match self {
            Self::Easy => 20,
            Self::Medium => 15,
            Self::Hard => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CoreError;

    /// Case-insensitive parse of `EASY`, `MEDIUM` or `HARD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown difficulty '{s}'. Expected one of: EASY, MEDIUM, HARD"
                ))
            })
    }
}
