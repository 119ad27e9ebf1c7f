mod document;
mod download;
mod layout;
mod pdf;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use quiz_core::chart::ChartKind;

use crate::error::ReportError;
use crate::sessions::{Phase, QuizSession};

pub use document::{Align, DocumentRenderer, DrawCommand, FontWeight, PageSize, TextStyle};
pub use download::{DownloadSink, FileDownloadSink};
pub use layout::{REPORT_TITLE, REVIEW_HEADING, ReportContent, block_height, chart_width, layout_report};
pub use pdf::{PdfDocumentRenderer, text_width, wrap_text};

pub const REPORT_FILE_NAME: &str = "quiz-report.pdf";

/// Builds the analytics report of a reviewed session and hands it to a sink.
#[derive(Clone)]
pub struct ReportService {
    document: Option<Arc<dyn DocumentRenderer>>,
    sink: Arc<dyn DownloadSink>,
}

impl ReportService {
    #[must_use]
    pub fn new(document: Option<Arc<dyn DocumentRenderer>>, sink: Arc<dyn DownloadSink>) -> Self {
        Self { document, sink }
    }

    /// Lay out and render the report for a session in review.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NothingToReport` outside review and
    /// `ReportError::RenderingUnavailable` when the document renderer or a
    /// chart is missing. Nothing is written in either case.
    pub fn synthesize(&self, session: &QuizSession) -> Result<Vec<u8>, ReportError> {
        let document = self
            .document
            .as_deref()
            .ok_or(ReportError::RenderingUnavailable("document"))?;
        let analytics = match (session.phase(), session.analytics()) {
            (Phase::Reviewing, Some(analytics)) => analytics,
            _ => return Err(ReportError::NothingToReport),
        };
        let donut = session.charts().image(ChartKind::Proportional)?;
        let bar = session.charts().image(ChartKind::Magnitude)?;

        let content = ReportContent {
            summary: analytics.summary_lines(),
            donut: &donut,
            bar: &bar,
            review: &analytics.review,
        };
        let commands = layout_report(&content, document);
        debug!(commands = commands.len(), "report laid out");
        document.render(&commands)
    }

    /// Synthesize the report and deliver it as `quiz-report.pdf`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` from synthesis or delivery.
    pub fn download(&self, session: &QuizSession) -> Result<PathBuf, ReportError> {
        let bytes = self.synthesize(session).inspect_err(|err| {
            warn!(error = %err, "report synthesis failed");
        })?;
        self.sink.deliver(REPORT_FILE_NAME, &bytes)
    }
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService")
            .field("has_document", &self.document.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartRenderer, RasterChartRenderer};
    use quiz_core::model::{Difficulty, Question, QuestionSet, QuestionSource, QuizSettings, ScoreResult};
    use quiz_core::time::fixed_clock;
    use crate::sessions::BeginSubmit;

    fn reviewed_session(renderer: Option<Arc<dyn ChartRenderer>>) -> QuizSession {
        let mut session = QuizSession::new(fixed_clock(), renderer);
        session.open_setup().unwrap();
        let settings = QuizSettings::new("Databases", Difficulty::Medium, false).unwrap();
        let ticket = session.begin_generate(settings, 2).unwrap();
        let questions = (0..2)
            .map(|i| {
                Question::new(format!("Question {i}?"), vec!["a".into(), "b".into()], 0).unwrap()
            })
            .collect();
        session
            .finish_generate(ticket, Ok(QuestionSet::new(questions, QuestionSource::Ai)))
            .unwrap();
        session.select_answer(0, 0).unwrap();
        let BeginSubmit::Ready(ticket) = session.begin_submit(|_| true).unwrap() else {
            panic!("expected a ticket");
        };
        session
            .finish_submit(ticket, Ok(ScoreResult::new(1, 1, 2, 50.0).unwrap()))
            .unwrap();
        session
    }

    fn service(dir: &std::path::Path, document: bool) -> ReportService {
        let document: Option<Arc<dyn DocumentRenderer>> =
            document.then(|| Arc::new(PdfDocumentRenderer::a4()) as Arc<dyn DocumentRenderer>);
        ReportService::new(document, Arc::new(FileDownloadSink::new(dir)))
    }

    #[tokio::test]
    async fn downloads_pdf_for_reviewed_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = reviewed_session(Some(Arc::new(RasterChartRenderer)));

        let path = service(dir.path(), true).download(&session).unwrap();

        assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn missing_document_renderer_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let session = reviewed_session(Some(Arc::new(RasterChartRenderer)));

        let err = service(dir.path(), false).download(&session).unwrap_err();

        assert_eq!(err.user_message(), "Report renderer is not available.");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_charts_abort_before_any_file() {
        let dir = tempfile::tempdir().unwrap();
        let session = reviewed_session(None);

        let err = service(dir.path(), true).download(&session).unwrap_err();

        assert!(matches!(err, ReportError::RenderingUnavailable("donut chart")));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn nothing_to_report_before_review() {
        let dir = tempfile::tempdir().unwrap();
        let session = QuizSession::new(fixed_clock(), None);
        let err = service(dir.path(), true).synthesize(&session).unwrap_err();
        assert!(matches!(err, ReportError::NothingToReport));
    }
}
