use std::sync::Arc;

use services::{AppServices, QuizSession, QuizSessionService, ReportService};

pub trait UiApp: Send + Sync {
    fn quiz(&self) -> Arc<QuizSessionService>;
    fn reports(&self) -> Arc<ReportService>;

    /// A fresh session for the window to own.
    fn new_session(&self) -> QuizSession;
}

impl UiApp for AppServices {
    fn quiz(&self) -> Arc<QuizSessionService> {
        AppServices::quiz(self)
    }

    fn reports(&self) -> Arc<ReportService> {
        AppServices::reports(self)
    }

    fn new_session(&self) -> QuizSession {
        AppServices::new_session(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    quiz: Arc<QuizSessionService>,
    reports: Arc<ReportService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: Arc<dyn UiApp>) -> Self {
        let quiz = app.quiz();
        let reports = app.reports();
        Self { app, quiz, reports }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn reports(&self) -> Arc<ReportService> {
        Arc::clone(&self.reports)
    }

    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        self.app.new_session()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
