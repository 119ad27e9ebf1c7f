use std::sync::Arc;

use crate::Clock;
use crate::backend::{HttpQuizBackend, QuizBackend};
use crate::charts::{ChartRenderer, RasterChartRenderer};
use crate::config::QuizConfig;
use crate::error::BackendError;
use crate::report::{DocumentRenderer, FileDownloadSink, PdfDocumentRenderer, ReportService};
use crate::sessions::{QuizSession, QuizSessionService};

/// Assembles app-facing services around one configuration.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    config: QuizConfig,
    chart_renderer: Arc<dyn ChartRenderer>,
    quiz: Arc<QuizSessionService>,
    reports: Arc<ReportService>,
}

impl AppServices {
    /// Build services talking to the HTTP backend in `config`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the HTTP client cannot be built.
    pub fn new_http(config: QuizConfig, clock: Clock) -> Result<Self, BackendError> {
        let backend: Arc<dyn QuizBackend> = Arc::new(HttpQuizBackend::new(config.clone())?);
        Ok(Self::with_backend(config, clock, backend))
    }

    /// Build services around any backend, with the default renderers.
    #[must_use]
    pub fn with_backend(config: QuizConfig, clock: Clock, backend: Arc<dyn QuizBackend>) -> Self {
        let document: Arc<dyn DocumentRenderer> = Arc::new(PdfDocumentRenderer::a4());
        let sink = Arc::new(FileDownloadSink::new(config.download_dir().clone()));
        let quiz = Arc::new(QuizSessionService::new(backend, config.questions_per_quiz()));
        let reports = Arc::new(ReportService::new(Some(document), sink));
        Self {
            clock,
            config,
            chart_renderer: Arc::new(RasterChartRenderer),
            quiz,
            reports,
        }
    }

    /// A fresh session wired to this app's clock and chart renderer.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new(self.clock, Some(Arc::clone(&self.chart_renderer)))
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn reports(&self) -> Arc<ReportService> {
        Arc::clone(&self.reports)
    }
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
