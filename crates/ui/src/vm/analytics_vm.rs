use quiz_core::analytics::ReviewStatus;
use quiz_core::chart::ChartKind;
use services::{Phase, QuizSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub question_line: String,
    pub your_answer_line: String,
    pub correct_answer_line: String,
    /// CSS class of the answer line.
    pub tone: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartImageVm {
    pub alt: &'static str,
    pub src: String,
}

/// Display data for a scored quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsVm {
    pub score_text: String,
    pub time_text: String,
    pub accuracy_text: String,
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
    pub charts: Vec<ChartImageVm>,
    pub review: Vec<ReviewRowVm>,
}

impl AnalyticsVm {
    /// `None` unless the session is being reviewed.
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        if session.phase() != Phase::Reviewing {
            return None;
        }
        let report = session.analytics()?;
        let charts = [
            (ChartKind::Proportional, "Score breakdown"),
            (ChartKind::Magnitude, "Correct vs wrong"),
        ]
        .into_iter()
        .filter_map(|(kind, alt)| {
            let image = session.charts().image(kind).ok()?;
            Some(ChartImageVm {
                alt,
                src: image.data_url(),
            })
        })
        .collect();
        let review = report
            .review
            .iter()
            .map(|entry| ReviewRowVm {
                question_line: entry.question_line(),
                your_answer_line: entry.your_answer_line(),
                correct_answer_line: entry.correct_answer_line(),
                tone: match entry.status {
                    ReviewStatus::Correct => "correct",
                    ReviewStatus::Wrong | ReviewStatus::NotAnswered => "wrong",
                },
            })
            .collect();

        Some(Self {
            score_text: report.score_text.clone(),
            time_text: report.time_text.clone(),
            accuracy_text: report.accuracy_text.clone(),
            correct: report.metrics.correct,
            wrong: report.metrics.wrong,
            total: report.metrics.total,
            charts,
            review,
        })
    }
}
