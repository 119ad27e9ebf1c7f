use std::sync::Arc;

use dioxus::prelude::*;
use quiz_core::model::QuizSettings;
use services::{
    BeginSubmit, QuizSession, QuizSessionService, ReportError, ReportService, SessionError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Message(&'static str),
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::Message(message) => message,
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        Self::Message(err.user_message())
    }
}

impl From<&ReportError> for ViewError {
    fn from(err: &ReportError) -> Self {
        Self::Message(err.user_message())
    }
}

//
// ─── SESSION HANDLE ────────────────────────────────────────────────────────────
//

/// Reactive handle to the window's quiz session, shared through context.
///
/// Remote calls run in spawned tasks; the session signal is only written
/// before and after each request, never held across it.
#[derive(Clone, Copy)]
pub struct QuizHandle {
    pub session: Signal<QuizSession>,
    pub error: Signal<Option<ViewError>>,
    pub notice: Signal<Option<String>>,
    /// Unanswered count awaiting the user's confirmation.
    pub pending_confirm: Signal<Option<usize>>,
}

impl QuizHandle {
    fn report(mut self, result: Result<(), ViewError>) {
        match result {
            Ok(()) => self.error.set(None),
            Err(err) => self.error.set(Some(err)),
        }
    }

    fn reset_messages(mut self) {
        self.error.set(None);
        self.notice.set(None);
        self.pending_confirm.set(None);
    }

    pub fn open_setup(mut self) {
        self.reset_messages();
        let result = self.session.write().open_setup();
        self.report(result.map_err(|err| ViewError::from(&err)));
    }

    pub fn go_home(mut self) {
        self.reset_messages();
        self.session.write().go_home();
    }

    pub fn retake(mut self) {
        self.reset_messages();
        let result = self.session.write().retake();
        self.report(result.map_err(|err| ViewError::from(&err)));
    }

    pub fn generate(mut self, quiz: Arc<QuizSessionService>, settings: QuizSettings) {
        self.reset_messages();
        let begin = quiz.begin_generate(&mut self.session.write(), settings);
        let ticket = match begin {
            Ok(ticket) => ticket,
            Err(err) => return self.report(Err(ViewError::from(&err))),
        };
        let mut session = self.session;
        spawn(async move {
            let result = quiz.run_generate(&ticket).await;
            let outcome = session.write().finish_generate(ticket, result);
            self.report(outcome.map(|_| ()).map_err(|err| ViewError::from(&err)));
        });
    }

    pub fn select(self, question: usize, option: usize) {
        let mut session = self.session;
        // Index mismatches are ignored.
        if let Err(err) = session.write().select_answer(question, option) {
            tracing::debug!(error = %err, "answer ignored");
        }
    }

    /// Submit, asking for confirmation first when answers are missing.
    pub fn submit(mut self, quiz: Arc<QuizSessionService>, confirmed: bool) {
        self.error.set(None);
        let mut pending_confirm = self.pending_confirm;
        let begin = self.session.write().begin_submit(|unanswered| {
            if !confirmed {
                pending_confirm.set(Some(unanswered));
            }
            confirmed
        });
        let ticket = match begin {
            Ok(BeginSubmit::Ready(ticket)) => ticket,
            Ok(BeginSubmit::Declined) => return,
            Err(err) => return self.report(Err(ViewError::from(&err))),
        };
        self.pending_confirm.set(None);
        let mut session = self.session;
        spawn(async move {
            let result = quiz.run_submit(&ticket).await;
            let outcome = session.write().finish_submit(ticket, result);
            self.report(outcome.map(|_| ()).map_err(|err| ViewError::from(&err)));
        });
    }

    pub fn cancel_submit(mut self) {
        self.pending_confirm.set(None);
    }

    pub fn download(mut self, reports: Arc<ReportService>) {
        let result = reports.download(&self.session.read());
        match result {
            Ok(path) => {
                self.error.set(None);
                self.notice.set(Some(format!("Report saved to {}", path.display())));
            }
            Err(err) => {
                self.notice.set(None);
                self.error.set(Some(ViewError::from(&err)));
            }
        }
    }
}
