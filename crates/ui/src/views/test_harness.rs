use std::sync::{Arc, Mutex};

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::AnswerSnapshot;
use quiz_core::model::{
    Difficulty, Question, QuestionSet, QuestionSource, QuizSettings, ScoreResult,
};
use quiz_core::time::fixed_now;
use services::report::{FileDownloadSink, PdfDocumentRenderer};
use services::{
    BackendError, BeginSubmit, ChartRenderer, Clock, DocumentRenderer, GenerateRequest,
    QuizBackend, QuizSession,
    QuizSessionService, RasterChartRenderer, ReportService,
};

use super::QuizHandle;
use crate::app::App;
use crate::context::{UiApp, build_app_context};

/// Generates `sample_questions`; scores 1 of 2 only when `scores` is set.
struct StaticBackend {
    scores: bool,
}

#[async_trait::async_trait]
impl QuizBackend for StaticBackend {
    async fn generate_questions(
        &self,
        _request: &GenerateRequest,
    ) -> Result<QuestionSet, BackendError> {
        Ok(sample_questions())
    }

    async fn score_quiz(
        &self,
        _questions: &QuestionSet,
        _answers: &AnswerSnapshot,
    ) -> Result<ScoreResult, BackendError> {
        if self.scores {
            Ok(ScoreResult::new(1, 1, 2, 50.0)?)
        } else {
            Err(BackendError::Unreachable("scoring disabled in view tests".into()))
        }
    }
}

struct TestApp {
    quiz: Arc<QuizSessionService>,
    reports: Arc<ReportService>,
    prepared: Mutex<Option<QuizSession>>,
}

impl UiApp for TestApp {
    fn quiz(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz)
    }

    fn reports(&self) -> Arc<ReportService> {
        Arc::clone(&self.reports)
    }

    fn new_session(&self) -> QuizSession {
        self.prepared
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .unwrap_or_else(|| QuizSession::new(Clock::fixed(fixed_now()), None))
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn Harness(props: HarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(app));
    rsx! { App {} }
}

/// Runs once against a fresh handle, before anything is rendered.
pub type HandleAction = fn(QuizHandle, Arc<QuizSessionService>);

#[derive(Props, Clone)]
struct ActionProps {
    app: Arc<TestApp>,
    action: HandleAction,
}

impl PartialEq for ActionProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ActionHarness(props: ActionProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(app));
    let session = use_signal(|| ctx.new_session());
    let handle = use_context_provider(|| QuizHandle {
        session,
        error: Signal::new(None),
        notice: Signal::new(None),
        pending_confirm: Signal::new(None),
    });
    let action = props.action;
    let quiz = ctx.quiz();
    use_hook(move || action(handle, quiz));
    rsx! { HandleStatus {} }
}

#[component]
fn HandleStatus() -> Element {
    let handle = use_context::<QuizHandle>();
    let (phase, pending) = {
        let session = handle.session.read();
        (session.phase(), session.pending().is_some())
    };
    let error = (*handle.error.read()).map(|err| err.message());
    let confirm = *handle.pending_confirm.read();
    rsx! {
        p { "phase: {phase}" }
        p { "pending: {pending}" }
        if let Some(message) = error {
            p { "error: {message}" }
        }
        if let Some(unanswered) = confirm {
            p { "confirm: {unanswered}" }
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_questions() -> QuestionSet {
    let questions = vec![
        Question::new(
            "Which layer does TCP belong to?",
            vec!["Transport".into(), "Network".into(), "Link".into()],
            0,
        )
        .expect("question"),
        Question::new(
            "What does DNS resolve?",
            vec!["MAC addresses".into(), "Host names".into()],
            1,
        )
        .expect("question"),
    ];
    QuestionSet::new(questions, QuestionSource::Ai)
}

/// Which phase the harness session starts in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Landing,
    Setup,
    Active,
    Reviewing,
}

pub fn prepared_session(stage: Stage) -> QuizSession {
    let renderer: Arc<dyn ChartRenderer> = Arc::new(RasterChartRenderer);
    let mut session = QuizSession::new(Clock::fixed(fixed_now()), Some(renderer));
    if stage == Stage::Landing {
        return session;
    }
    session.open_setup().expect("open setup");
    if stage == Stage::Setup {
        return session;
    }
    let settings = QuizSettings::new("Networks", Difficulty::Medium, true).expect("settings");
    let ticket = session.begin_generate(settings, 10).expect("begin generate");
    session
        .finish_generate(ticket, Ok(sample_questions()))
        .expect("finish generate");
    session.select_answer(0, 0).expect("answer");
    if stage == Stage::Active {
        return session;
    }
    let BeginSubmit::Ready(ticket) = session.begin_submit(|_| true).expect("begin submit") else {
        panic!("expected a submit ticket");
    };
    session
        .finish_submit(ticket, Ok(ScoreResult::new(1, 1, 2, 50.0).expect("score")))
        .expect("finish submit");
    session
}

fn test_app(stage: Stage, scores: bool) -> Arc<TestApp> {
    let quiz = Arc::new(QuizSessionService::new(
        Arc::new(StaticBackend { scores }),
        10,
    ));
    let document: Arc<dyn DocumentRenderer> = Arc::new(PdfDocumentRenderer::a4());
    let reports = Arc::new(ReportService::new(
        Some(document),
        Arc::new(FileDownloadSink::new(std::env::temp_dir())),
    ));
    Arc::new(TestApp {
        quiz,
        reports,
        prepared: Mutex::new(Some(prepared_session(stage))),
    })
}

pub fn setup_view_harness(stage: Stage) -> ViewHarness {
    let app = test_app(stage, false);
    let dom = VirtualDom::new_with_props(Harness, HarnessProps { app });
    ViewHarness { dom }
}

/// Harness that applies `action` to the session handle on first render.
pub fn setup_handle_harness(stage: Stage, scores: bool, action: HandleAction) -> ViewHarness {
    let app = test_app(stage, scores);
    let dom = VirtualDom::new_with_props(ActionHarness, ActionProps { app, action });
    ViewHarness { dom }
}
