use std::sync::Arc;

use tracing::{info, instrument, warn};

use quiz_core::model::{QuestionSet, QuizSettings, ScoreResult};

use super::service::{
    BeginSubmit, GenerateOutcome, GenerateTicket, QuizSession, SubmitOutcome, SubmitTicket,
};
use crate::backend::QuizBackend;
use crate::error::{BackendError, SessionError};

/// Drives a `QuizSession` through its remote calls.
///
/// Each call is split into `begin_*`, `run_*` and `finish_*`. Only the begin
/// and finish steps touch the session, so callers that share it behind a lock
/// or signal release it while `run_*` is in flight. `generate` and `submit`
/// chain the three steps for callers that own the session outright.
#[derive(Clone)]
pub struct QuizSessionService {
    backend: Arc<dyn QuizBackend>,
    questions_per_quiz: u32,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>, questions_per_quiz: u32) -> Self {
        Self {
            backend,
            questions_per_quiz,
        }
    }

    #[must_use]
    pub fn questions_per_quiz(&self) -> u32 {
        self.questions_per_quiz
    }

    /// Capture a generation request; the session moves to pending.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session is not in setup or a request is
    /// already pending.
    pub fn begin_generate(
        &self,
        session: &mut QuizSession,
        settings: QuizSettings,
    ) -> Result<GenerateTicket, SessionError> {
        session.begin_generate(settings, self.questions_per_quiz)
    }

    /// Send a captured generation request. Does not touch the session.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged; `finish_generate` maps it.
    #[instrument(skip_all, fields(category = %ticket.request().category))]
    pub async fn run_generate(&self, ticket: &GenerateTicket) -> Result<QuestionSet, BackendError> {
        self.backend.generate_questions(ticket.request()).await
    }

    /// Send a captured submission for scoring. Does not touch the session.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged; `finish_submit` maps it.
    #[instrument(skip_all, fields(questions = ticket.questions().len()))]
    pub async fn run_submit(&self, ticket: &SubmitTicket) -> Result<ScoreResult, BackendError> {
        self.backend
            .score_quiz(ticket.questions(), ticket.answers())
            .await
    }

    /// Request questions and start the quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session is not in setup, a request is
    /// already pending, or the generator fails or returns nothing.
    #[instrument(skip_all, fields(category = %settings.category()))]
    pub async fn generate(
        &self,
        session: &mut QuizSession,
        settings: QuizSettings,
    ) -> Result<GenerateOutcome, SessionError> {
        let ticket = self.begin_generate(session, settings)?;
        let result = self.run_generate(&ticket).await;
        session.finish_generate(ticket, result)
    }

    /// Submit the current answers for scoring.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if no quiz is active, scoring is already
    /// pending, or the scorer fails.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        confirm_unanswered: impl FnOnce(usize) -> bool + Send,
    ) -> Result<SubmitOutcome, SessionError> {
        let ticket = match session.begin_submit(confirm_unanswered)? {
            BeginSubmit::Declined => return Ok(SubmitOutcome::Declined),
            BeginSubmit::Ready(ticket) => ticket,
        };
        let result = self.run_submit(&ticket).await;
        session.finish_submit(ticket, result)
    }

    /// Log the backend health; failures are reported, not fatal.
    pub async fn check_health(&self) -> bool {
        match self.backend.health().await {
            Ok(()) => {
                info!("quiz backend is healthy");
                true
            }
            Err(err) => {
                warn!(error = %err, "quiz backend health check failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for QuizSessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSessionService")
            .field("questions_per_quiz", &self.questions_per_quiz)
            .finish_non_exhaustive()
    }
}
