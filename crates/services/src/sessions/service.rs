use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use quiz_core::analytics::{AnalyticsReport, derive_analytics};
use quiz_core::model::{QuestionSet, QuizSettings, ScoreResult};
use quiz_core::{AnswerLedger, AnswerSnapshot, Clock};

use super::phase::{PendingRequest, Phase};
use super::timer::Timer;
use crate::backend::GenerateRequest;
use crate::charts::{ChartBoard, ChartRenderer};
use crate::error::{BackendError, SessionError};

//
// ─── TICKETS ───────────────────────────────────────────────────────────────────
//

/// A generation request captured by `begin_generate`.
#[derive(Debug, Clone)]
pub struct GenerateTicket {
    epoch: u64,
    settings: QuizSettings,
    request: GenerateRequest,
}

impl GenerateTicket {
    #[must_use]
    pub fn request(&self) -> &GenerateRequest {
        &self.request
    }
}

/// A scoring request captured by `begin_submit`. Its answers are frozen.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    epoch: u64,
    questions: QuestionSet,
    answers: AnswerSnapshot,
    elapsed_ms: u64,
}

impl SubmitTicket {
    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSnapshot {
        &self.answers
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

/// Result of `begin_submit`.
#[derive(Debug, Clone)]
pub enum BeginSubmit {
    /// The user declined to submit with unanswered questions.
    Declined,
    Ready(SubmitTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    Started { questions: usize },
    /// The session moved on while the request was in flight; result dropped.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Declined,
    Scored,
    /// The session moved on while the request was in flight; result dropped.
    Stale,
}

/// Answers and timing frozen at submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub answers: AnswerSnapshot,
    pub elapsed_ms: u64,
    pub submitted_at: DateTime<Utc>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Aggregate root of one quiz client: phase, questions, answers, timer, score
/// and charts.
///
/// Remote calls are split into `begin_*` / `finish_*` so state only changes
/// once a response is in hand, and so responses for a session that has since
/// moved on can be recognized and dropped.
pub struct QuizSession {
    clock: Clock,
    phase: Phase,
    epoch: u64,
    pending: Option<PendingRequest>,
    settings: Option<QuizSettings>,
    questions: QuestionSet,
    ledger: AnswerLedger,
    started_at: Option<DateTime<Utc>>,
    submission: Option<Submission>,
    score: Option<ScoreResult>,
    analytics: Option<AnalyticsReport>,
    timer: Timer,
    charts: ChartBoard,
}

impl QuizSession {
    #[must_use]
    pub fn new(clock: Clock, chart_renderer: Option<Arc<dyn ChartRenderer>>) -> Self {
        Self {
            clock,
            phase: Phase::Landing,
            epoch: 0,
            pending: None,
            settings: None,
            questions: QuestionSet::empty(),
            ledger: AnswerLedger::default(),
            started_at: None,
            submission: None,
            score: None,
            analytics: None,
            timer: Timer::new(),
            charts: ChartBoard::new(chart_renderer),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Bumped whenever the quiz is replaced or cleared.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingRequest> {
        self.pending
    }

    #[must_use]
    pub fn settings(&self) -> Option<&QuizSettings> {
        self.settings.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    #[must_use]
    pub fn answer(&self, question: usize) -> Option<usize> {
        self.ledger.get(question)
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.ledger.count_unanswered()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Live elapsed time while active, the frozen value once reviewing, else 0.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        match (self.phase, &self.submission) {
            (Phase::Reviewing, Some(submission)) => submission.elapsed_ms,
            (Phase::Active, _) => self.timer.elapsed_ms(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> Option<&ScoreResult> {
        self.score.as_ref()
    }

    #[must_use]
    pub fn analytics(&self) -> Option<&AnalyticsReport> {
        self.analytics.as_ref()
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    #[must_use]
    pub fn charts(&self) -> &ChartBoard {
        &self.charts
    }

    //
    // ─── NAVIGATION ───────────────────────────────────────────────────────────
    //

    /// Landing → Setup.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Landing`.
    pub fn open_setup(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::Landing, "open setup")?;
        self.phase = Phase::Setup;
        debug!("session entered setup");
        Ok(())
    }

    /// Reviewing → Setup, discarding the finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Reviewing`.
    pub fn retake(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::Reviewing, "retake")?;
        self.clear_quiz();
        self.phase = Phase::Setup;
        info!("session reset for retake");
        Ok(())
    }

    /// Return to Landing from any phase, discarding any quiz.
    pub fn go_home(&mut self) {
        if self.phase == Phase::Landing {
            return;
        }
        let from = self.phase;
        self.clear_quiz();
        self.phase = Phase::Landing;
        info!(%from, "session returned home");
    }

    //
    // ─── GENERATE ─────────────────────────────────────────────────────────────
    //

    /// Validate and capture a generation request. No state besides the
    /// in-flight marker changes until `finish_generate`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Setup` and
    /// `SessionError::RequestPending` while a generation is in flight.
    pub fn begin_generate(
        &mut self,
        settings: QuizSettings,
        num_questions: u32,
    ) -> Result<GenerateTicket, SessionError> {
        self.expect_phase(Phase::Setup, "generate a quiz")?;
        if let Some(pending) = self.pending {
            return Err(SessionError::RequestPending(pending.label()));
        }
        self.pending = Some(PendingRequest::Generate);
        let request = GenerateRequest::from_settings(&settings, num_questions);
        debug!(category = %request.category, difficulty = %request.difficulty, "generation requested");
        Ok(GenerateTicket {
            epoch: self.epoch,
            settings,
            request,
        })
    }

    /// Apply a generator response.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generate` for transport failures and empty
    /// results; the session stays in `Setup`.
    pub fn finish_generate(
        &mut self,
        ticket: GenerateTicket,
        result: Result<QuestionSet, BackendError>,
    ) -> Result<GenerateOutcome, SessionError> {
        if !self.ticket_is_current(ticket.epoch, Phase::Setup, PendingRequest::Generate) {
            debug!(ticket_epoch = ticket.epoch, epoch = self.epoch, "dropping stale generation result");
            return Ok(GenerateOutcome::Stale);
        }
        self.pending = None;

        let questions = match result {
            Ok(questions) if questions.is_empty() => {
                warn!("generator returned no questions");
                return Err(SessionError::Generate(BackendError::EmptyResponse));
            }
            Ok(questions) => questions,
            Err(err) => {
                warn!(error = %err, "question generation failed");
                return Err(SessionError::Generate(err));
            }
        };

        let count = questions.len();
        self.clear_quiz();
        self.ledger.reset(count);
        self.questions = questions;
        self.settings = Some(ticket.settings);
        self.started_at = Some(self.clock.now());
        self.timer.start();
        self.phase = Phase::Active;
        info!(questions = count, source = %self.questions.source(), "quiz started");
        Ok(GenerateOutcome::Started { questions: count })
    }

    //
    // ─── ANSWER ───────────────────────────────────────────────────────────────
    //

    /// Record the selected option for a question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Active`,
    /// `SessionError::Ledger` for an unknown question and
    /// `SessionError::OptionOutOfRange` for an option the question lacks.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        self.expect_phase(Phase::Active, "answer")?;
        if let Some(q) = self.questions.get(question) {
            if option >= q.option_count() {
                return Err(SessionError::OptionOutOfRange {
                    question,
                    option,
                    len: q.option_count(),
                });
            }
        }
        self.ledger.set(question, option)?;
        Ok(())
    }

    //
    // ─── SUBMIT ───────────────────────────────────────────────────────────────
    //

    /// Freeze answers and elapsed time for scoring.
    ///
    /// `confirm_unanswered` is asked only when some questions are blank;
    /// returning `false` leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveQuiz` outside `Active` and
    /// `SessionError::RequestPending` while scoring is in flight.
    pub fn begin_submit(
        &mut self,
        confirm_unanswered: impl FnOnce(usize) -> bool,
    ) -> Result<BeginSubmit, SessionError> {
        if self.phase != Phase::Active || self.questions.is_empty() {
            return Err(SessionError::NoActiveQuiz);
        }
        if let Some(pending) = self.pending {
            return Err(SessionError::RequestPending(pending.label()));
        }

        let answers = self.ledger.snapshot();
        let unanswered = answers.count_unanswered();
        if unanswered > 0 && !confirm_unanswered(unanswered) {
            debug!(unanswered, "submission declined");
            return Ok(BeginSubmit::Declined);
        }

        self.timer.stop();
        let elapsed_ms = self.timer.elapsed_ms();
        self.pending = Some(PendingRequest::Submit);
        debug!(unanswered, elapsed_ms, "submission requested");
        Ok(BeginSubmit::Ready(SubmitTicket {
            epoch: self.epoch,
            questions: self.questions.clone(),
            answers,
            elapsed_ms,
        }))
    }

    /// Apply a scorer response.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Score` or `SessionError::ScoreMismatch`; the
    /// session stays `Active` with its answers and the timer resumes.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<ScoreResult, BackendError>,
    ) -> Result<SubmitOutcome, SessionError> {
        if !self.ticket_is_current(ticket.epoch, Phase::Active, PendingRequest::Submit) {
            debug!(ticket_epoch = ticket.epoch, epoch = self.epoch, "dropping stale score");
            return Ok(SubmitOutcome::Stale);
        }
        self.pending = None;

        let score = match result {
            Ok(score) => score,
            Err(err) => {
                warn!(error = %err, "quiz scoring failed");
                self.timer.resume();
                return Err(SessionError::Score(err));
            }
        };
        if usize::try_from(score.total()).ok() != Some(self.questions.len()) {
            warn!(expected = self.questions.len(), actual = score.total(), "score does not cover the quiz");
            self.timer.resume();
            return Err(SessionError::ScoreMismatch {
                expected: self.questions.len(),
                actual: score.total(),
            });
        }

        let analytics = derive_analytics(&self.questions, &ticket.answers, &score, ticket.elapsed_ms);
        self.charts.install(&analytics.chart_specs());
        self.analytics = Some(analytics);
        self.score = Some(score);
        self.submission = Some(Submission {
            answers: ticket.answers,
            elapsed_ms: ticket.elapsed_ms,
            submitted_at: self.clock.now(),
        });
        self.phase = Phase::Reviewing;
        info!(correct = score.correct(), total = score.total(), "quiz scored");
        Ok(SubmitOutcome::Scored)
    }

    //
    // ─── INTERNALS ────────────────────────────────────────────────────────────
    //

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                phase: self.phase,
                action,
            })
        }
    }

    fn ticket_is_current(&self, epoch: u64, phase: Phase, request: PendingRequest) -> bool {
        self.epoch == epoch && self.phase == phase && self.pending == Some(request)
    }

    fn clear_quiz(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.pending = None;
        self.settings = None;
        self.questions = QuestionSet::empty();
        self.ledger.reset(0);
        self.started_at = None;
        self.submission = None;
        self.score = None;
        self.analytics = None;
        self.timer.reset();
        self.charts.dispose_all();
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("epoch", &self.epoch)
            .field("pending", &self.pending)
            .field("questions_len", &self.questions.len())
            .field("unanswered", &self.ledger.count_unanswered())
            .field("started_at", &self.started_at)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
