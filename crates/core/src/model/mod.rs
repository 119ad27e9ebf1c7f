mod question;
mod score;
mod settings;

pub use question::{MIN_OPTIONS, Question, QuestionError, QuestionSet, QuestionSource};
pub use score::{ScoreError, ScoreResult};
pub use settings::{Difficulty, QuizSettings, SettingsError};
