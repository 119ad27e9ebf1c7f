//! Post-submission analytics: summary strings, chart dataset and per-question review.
//!
//! Everything here is a pure function of the question set, the submitted
//! answers and the scorer's result.

use std::fmt;

use crate::chart::{ChartDataset, ChartKind, ChartSpec};
use crate::ledger::AnswerSnapshot;
use crate::model::{QuestionSet, ScoreResult};

pub const NOT_ANSWERED_LABEL: &str = "Not answered";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    NotAnswered,
    Correct,
    Wrong,
}

impl ReviewStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotAnswered => NOT_ANSWERED_LABEL,
            Self::Correct => "Correct",
            Self::Wrong => "Wrong",
        }
    }

    /// Classify one answer against the correct index.
    #[must_use]
    pub fn classify(answer: Option<usize>, correct_index: usize) -> Self {
        match answer {
            None => Self::NotAnswered,
            Some(chosen) if chosen == correct_index => Self::Correct,
            Some(_) => Self::Wrong,
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One question's outcome, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    /// 1-based position.
    pub number: usize,
    pub question: String,
    pub status: ReviewStatus,
    pub your_answer: String,
    pub correct_answer: String,
}

impl ReviewEntry {
    #[must_use]
    pub fn question_line(&self) -> String {
        format!("{}. {}", self.number, self.question)
    }

    #[must_use]
    pub fn your_answer_line(&self) -> String {
        match self.status {
            ReviewStatus::NotAnswered => format!("Your answer: {NOT_ANSWERED_LABEL}"),
            status => format!("Your answer: {} ({status})", self.your_answer),
        }
    }

    #[must_use]
    pub fn correct_answer_line(&self) -> String {
        format!("Correct answer: {}", self.correct_answer)
    }
}

/// Counts per review class; always sums to the question count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewTally {
    pub not_answered: usize,
    pub correct: usize,
    pub wrong: usize,
}

impl ReviewTally {
    #[must_use]
    pub fn total(&self) -> usize {
        self.not_answered + self.correct + self.wrong
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreMetrics {
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
}

/// Display-ready analytics for a scored quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub score_text: String,
    pub time_text: String,
    pub accuracy_text: String,
    pub accuracy_percent: f64,
    pub elapsed_ms: u64,
    pub metrics: ScoreMetrics,
    pub chart: ChartDataset,
    pub review: Vec<ReviewEntry>,
}

impl AnalyticsReport {
    /// The three summary lines, in display order.
    #[must_use]
    pub fn summary_lines(&self) -> [&str; 3] {
        [&self.score_text, &self.time_text, &self.accuracy_text]
    }

    #[must_use]
    pub fn tally(&self) -> ReviewTally {
        self.review
            .iter()
            .fold(ReviewTally::default(), |mut tally, entry| {
                match entry.status {
                    ReviewStatus::NotAnswered => tally.not_answered += 1,
                    ReviewStatus::Correct => tally.correct += 1,
                    ReviewStatus::Wrong => tally.wrong += 1,
                }
                tally
            })
    }

    /// Donut and bar specs over the same dataset.
    #[must_use]
    pub fn chart_specs(&self) -> [ChartSpec; 2] {
        [
            ChartSpec::new(self.chart, ChartKind::Proportional),
            ChartSpec::new(self.chart, ChartKind::Magnitude),
        ]
    }
}

/// `correct / total * 100`, or 0 for an empty quiz.
#[must_use]
pub fn accuracy_percent(score: &ScoreResult) -> f64 {
    if score.total() == 0 {
        return 0.0;
    }
    f64::from(score.correct()) / f64::from(score.total()) * 100.0
}

/// `Time taken: M min S sec`, or `Not recorded` when the rounded time is zero.
#[must_use]
pub fn format_time_taken(elapsed_ms: u64) -> String {
    let seconds = elapsed_ms.saturating_add(500) / 1000;
    if seconds == 0 {
        return "Time taken: Not recorded".to_string();
    }
    format!("Time taken: {} min {} sec", seconds / 60, seconds % 60)
}

#[must_use]
pub fn format_score(score: &ScoreResult) -> String {
    format!(
        "You scored {} out of {} ({:.2}%).",
        score.correct(),
        score.total(),
        score.percent()
    )
}

#[must_use]
pub fn format_accuracy(accuracy: f64) -> String {
    format!("Accuracy: {accuracy:.2}%.")
}

/// Build the review list. Every question maps to exactly one status.
#[must_use]
pub fn review_entries(questions: &QuestionSet, answers: &AnswerSnapshot) -> Vec<ReviewEntry> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let answer = answers.get(index);
            let status = ReviewStatus::classify(answer, question.correct_index());
            let your_answer = match answer {
                None => NOT_ANSWERED_LABEL.to_string(),
                Some(chosen) => question
                    .option(chosen)
                    .map_or_else(|| format!("Option {}", chosen + 1), str::to_string),
            };
            ReviewEntry {
                number: index + 1,
                question: question.text().to_string(),
                status,
                your_answer,
                correct_answer: question.correct_option().to_string(),
            }
        })
        .collect()
}

/// Derive the full analytics report.
#[must_use]
pub fn derive_analytics(
    questions: &QuestionSet,
    answers: &AnswerSnapshot,
    score: &ScoreResult,
    elapsed_ms: u64,
) -> AnalyticsReport {
    let accuracy = accuracy_percent(score);
    AnalyticsReport {
        score_text: format_score(score),
        time_text: format_time_taken(elapsed_ms),
        accuracy_text: format_accuracy(accuracy),
        accuracy_percent: accuracy,
        elapsed_ms,
        metrics: ScoreMetrics {
            correct: score.correct(),
            wrong: score.wrong(),
            total: score.total(),
        },
        chart: ChartDataset::new(score.correct(), score.wrong()),
        review: review_entries(questions, answers),
    }
}
