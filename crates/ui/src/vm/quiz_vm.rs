use quiz_core::model::{Difficulty, QuizSettings};
use services::{Phase, QuizSession};

use crate::views::ViewError;

pub const DEFAULT_CATEGORY: &str = "General Knowledge";

/// Editable setup form state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupForm {
    pub category: String,
    pub difficulty: Difficulty,
    pub use_ai: bool,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            difficulty: Difficulty::Easy,
            use_ai: false,
        }
    }
}

impl SetupForm {
    /// # Errors
    ///
    /// Returns `ViewError::Message` when the category is blank.
    pub fn to_settings(&self) -> Result<QuizSettings, ViewError> {
        QuizSettings::new(&self.category, self.difficulty, self.use_ai)
            .map_err(|_| ViewError::Message("Please choose a category."))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub index: usize,
    pub title: String,
    pub options: Vec<OptionVm>,
}

/// Display data for the active quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub category_label: String,
    pub difficulty_label: String,
    pub source_label: String,
    pub cards: Vec<QuestionCardVm>,
    pub answered: usize,
    pub total: usize,
    pub submitting: bool,
}

impl QuizVm {
    /// `None` unless the session is active.
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        if session.phase() != Phase::Active {
            return None;
        }
        let settings = session.settings()?;
        let cards = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = session.answer(index);
                QuestionCardVm {
                    index,
                    title: format!("{}. {}", index + 1, question.text()),
                    options: question
                        .options()
                        .iter()
                        .enumerate()
                        .map(|(option, text)| OptionVm {
                            index: option,
                            text: text.clone(),
                            selected: selected == Some(option),
                        })
                        .collect(),
                }
            })
            .collect();
        let total = session.questions().len();
        Some(Self {
            category_label: settings.category_label(),
            difficulty_label: settings.difficulty_label(),
            source_label: format!("Source: {}", session.questions().source()),
            cards,
            answered: total - session.unanswered_count(),
            total,
            submitting: session.pending().is_some(),
        })
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("Answered {} of {}", self.answered, self.total)
    }
}

/// Text of the unanswered-questions confirmation.
#[must_use]
pub fn unanswered_prompt(unanswered: usize) -> String {
    format!("You have not answered {unanswered} question(s). Do you still want to submit?")
}
