use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("category is required")]
    EmptyCategory,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

/// Difficulty levels understood by the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lowercase value sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Capitalized label for headers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(SettingsError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Setup-form input for a quiz generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    category: String,
    difficulty: Difficulty,
    use_ai: bool,
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::EmptyCategory` for a blank category.
    pub fn new(
        category: impl Into<String>,
        difficulty: Difficulty,
        use_ai: bool,
    ) -> Result<Self, SettingsError> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(SettingsError::EmptyCategory);
        }
        Ok(Self {
            category,
            difficulty,
            use_ai,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn use_ai(&self) -> bool {
        self.use_ai
    }

    #[must_use]
    pub fn category_label(&self) -> String {
        format!("Category: {}", self.category)
    }

    #[must_use]
    pub fn difficulty_label(&self) -> String {
        format!("Difficulty: {}", self.difficulty.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_difficulty_case_insensitively() {
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!(matches!(
            "extreme".parse::<Difficulty>(),
            Err(SettingsError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn settings_trim_category_and_build_labels() {
        let settings = QuizSettings::new("  Computer Networks ", Difficulty::Hard, true).unwrap();
        assert_eq!(settings.category(), "Computer Networks");
        assert_eq!(settings.category_label(), "Category: Computer Networks");
        assert_eq!(settings.difficulty_label(), "Difficulty: Hard");
    }

    #[test]
    fn blank_category_is_rejected() {
        assert_eq!(
            QuizSettings::new(" ", Difficulty::Easy, false).unwrap_err(),
            SettingsError::EmptyCategory
        );
    }
}
