mod analytics_vm;
mod quiz_vm;

pub use analytics_vm::{AnalyticsVm, ChartImageVm, ReviewRowVm};
pub use quiz_vm::{
    DEFAULT_CATEGORY, OptionVm, QuestionCardVm, QuizVm, SetupForm, unanswered_prompt,
};
