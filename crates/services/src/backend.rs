//! Remote question generator and scorer.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quiz_core::AnswerSnapshot;
use quiz_core::model::{
    Difficulty, Question, QuestionSet, QuestionSource, QuizSettings, ScoreResult,
};

use crate::config::QuizConfig;
use crate::error::{BackendError, PayloadError};

/// Generator request as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub category: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
    pub use_ai: bool,
}

impl GenerateRequest {
    #[must_use]
    pub fn from_settings(settings: &QuizSettings, num_questions: u32) -> Self {
        Self {
            category: settings.category().to_string(),
            difficulty: settings.difficulty(),
            num_questions,
            use_ai: settings.use_ai(),
        }
    }
}

/// Contract for the two remote services a quiz needs.
///
/// `generate_questions` returns `BackendError::EmptyResponse` when the call
/// succeeded but yielded no usable question.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or an empty question list.
    async fn generate_questions(&self, request: &GenerateRequest)
    -> Result<QuestionSet, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or an inconsistent score.
    async fn score_quiz(
        &self,
        questions: &QuestionSet,
        answers: &AnswerSnapshot,
    ) -> Result<ScoreResult, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError` when the backend does not report healthy.
    async fn health(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// `reqwest`-backed client for the quiz API.
#[derive(Clone)]
pub struct HttpQuizBackend {
    client: Client,
    config: QuizConfig,
}

impl HttpQuizBackend {
    /// Build a client bounded by the config's request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: QuizConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, BackendError> {
        let url = self.config.endpoint(path);
        debug!(%url, "posting quiz request");
        let response = self.client.post(url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn generate_questions(
        &self,
        request: &GenerateRequest,
    ) -> Result<QuestionSet, BackendError> {
        let payload = GeneratePayload {
            category: &request.category,
            difficulty: request.difficulty.as_str(),
            num_questions: request.num_questions,
            use_ai: request.use_ai,
        };
        let body: GenerateResponse = self.post_json("generate-questions", &payload).await?;
        decode_question_set(body)
    }

    async fn score_quiz(
        &self,
        questions: &QuestionSet,
        answers: &AnswerSnapshot,
    ) -> Result<ScoreResult, BackendError> {
        let payload = ScorePayload {
            questions: questions
                .iter()
                .enumerate()
                .map(|(index, question)| WireQuestion::from_question(index, question))
                .collect(),
            user_answers: answers.to_wire(),
        };
        let body: ScoreResponse = self.post_json("score-quiz", &payload).await?;
        Ok(body.into_score()?)
    }

    async fn health(&self) -> Result<(), BackendError> {
        let url = self.config.endpoint("health");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }
        let body: HealthResponse = response.json().await?;
        if body.status.eq_ignore_ascii_case("ok") {
            Ok(())
        } else {
            Err(BackendError::Unreachable(body.status))
        }
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePayload<'a> {
    category: &'a str,
    difficulty: &'a str,
    num_questions: u32,
    #[serde(rename = "useAI")]
    use_ai: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireQuestion {
    #[serde(default)]
    id: Option<String>,
    question_text: String,
    options: Vec<String>,
    correct_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    difficulty: Option<String>,
}

impl WireQuestion {
    fn from_question(index: usize, question: &Question) -> Self {
        // The scorer requires an id on every question.
        let id = question
            .id()
            .map_or_else(|| format!("q{index}"), str::to_string);
        Self {
            id: Some(id),
            question_text: question.text().to_string(),
            options: question.options().to_vec(),
            correct_index: question.correct_index() as i64,
            explanation: question.explanation().map(str::to_string),
            category: question.category().map(str::to_string),
            difficulty: question.difficulty().map(str::to_string),
        }
    }

    fn into_question(self, index: usize) -> Result<Question, PayloadError> {
        let correct_index = usize::try_from(self.correct_index).unwrap_or(usize::MAX);
        let mut question = Question::new(self.question_text, self.options, correct_index)
            .map_err(|err| PayloadError::Question {
                index,
                source: err.into(),
            })?
            .with_topic(self.category, self.difficulty);
        if let Some(id) = self.id {
            question = question.with_id(id);
        }
        if let Some(explanation) = self.explanation {
            question = question.with_explanation(explanation);
        }
        Ok(question)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScorePayload {
    questions: Vec<WireQuestion>,
    user_answers: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreResponse {
    total_questions: u32,
    correct_count: u32,
    wrong_count: u32,
    score_percent: f64,
}

impl ScoreResponse {
    fn into_score(self) -> Result<ScoreResult, quiz_core::model::ScoreError> {
        ScoreResult::new(
            self.correct_count,
            self.wrong_count,
            self.total_questions,
            self.score_percent,
        )
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Convert a generator response, dropping malformed questions.
///
/// Returns `BackendError::EmptyResponse` if nothing usable remains.
pub(crate) fn decode_question_set(body: GenerateResponse) -> Result<QuestionSet, BackendError> {
    let source = QuestionSource::from_wire(body.source.as_deref());
    let received = body.questions.len();
    let questions: Vec<Question> = body
        .questions
        .into_iter()
        .enumerate()
        .filter_map(|(index, wire)| match wire.into_question(index) {
            Ok(question) => Some(question),
            Err(err) => {
                warn!(error = %err, "skipping malformed question");
                None
            }
        })
        .collect();

    if questions.is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    debug!(received, kept = questions.len(), %source, "decoded question set");
    Ok(QuestionSet::new(questions, source))
}
