//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::LedgerError;
use quiz_core::model::ScoreError;

use crate::sessions::Phase;

/// Failure classes surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Service unreachable or non-success response.
    TransportFailure,
    /// Service answered but with nothing usable.
    EmptyResult,
    /// A transition or ledger write violated a precondition.
    ValidationFailure,
    /// A rendering collaborator was missing at report time.
    RenderingUnavailable,
}

/// Errors emitted by `QuizBackend` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("quiz backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quiz backend is unreachable: {0}")]
    Unreachable(String),
    #[error("quiz backend returned no questions")]
    EmptyResponse,
    #[error("quiz backend returned an unusable score: {0}")]
    InvalidScore(#[from] ScoreError),
}

impl BackendError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyResponse => ErrorKind::EmptyResult,
            Self::HttpStatus(_) | Self::Http(_) | Self::Unreachable(_) | Self::InvalidScore(_) => {
                ErrorKind::TransportFailure
            }
        }
    }
}

/// Errors emitted by session transitions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {action} while in {phase:?}")]
    InvalidTransition { phase: Phase, action: &'static str },
    #[error("no active quiz")]
    NoActiveQuiz,
    #[error("a {0} request is already in flight")]
    RequestPending(&'static str),
    #[error("option {option} is outside 0..{len} for question {question}")]
    OptionOutOfRange {
        question: usize,
        option: usize,
        len: usize,
    },
    #[error("score covers {actual} questions but the quiz has {expected}")]
    ScoreMismatch { expected: usize, actual: u32 },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("question generation failed: {0}")]
    Generate(#[source] BackendError),
    #[error("quiz scoring failed: {0}")]
    Score(#[source] BackendError),
}

impl SessionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Generate(err) | Self::Score(err) => err.kind(),
            Self::ScoreMismatch { .. } => ErrorKind::TransportFailure,
            Self::InvalidTransition { .. }
            | Self::NoActiveQuiz
            | Self::RequestPending(_)
            | Self::OptionOutOfRange { .. }
            | Self::Ledger(_) => ErrorKind::ValidationFailure,
        }
    }

    /// Message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Generate(err) if err.kind() == ErrorKind::EmptyResult => {
                "No questions returned from backend."
            }
            Self::Generate(_) => "Failed to fetch questions. Make sure backend is running.",
            Self::Score(_) | Self::ScoreMismatch { .. } => "Failed to score quiz.",
            Self::NoActiveQuiz => "Please generate a quiz first.",
            Self::RequestPending(_) => "Please wait for the current request to finish.",
            Self::InvalidTransition { .. }
            | Self::OptionOutOfRange { .. }
            | Self::Ledger(_) => "That action is not available right now.",
        }
    }
}

/// Errors emitted while synthesizing or delivering the report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("no scored quiz to report on")]
    NothingToReport,
    #[error("{0} renderer is not available")]
    RenderingUnavailable(&'static str),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReportError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NothingToReport => ErrorKind::ValidationFailure,
            Self::RenderingUnavailable(_) | Self::Image(_) | Self::Pdf(_) | Self::Io(_) => {
                ErrorKind::RenderingUnavailable
            }
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NothingToReport => "Finish a quiz before downloading the report.",
            Self::RenderingUnavailable(_) => "Report renderer is not available.",
            Self::Image(_) | Self::Pdf(_) => "Could not build the PDF report.",
            Self::Io(_) => "Could not save the PDF report.",
        }
    }
}

/// Errors emitted while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base URL {raw}: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API base URL must be http or https: {0}")]
    UnsupportedScheme(String),
    #[error("request timeout must be a positive number of seconds: {0:?}")]
    InvalidTimeout(String),
}

/// Errors emitted while decoding a generator payload into domain questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PayloadError {
    #[error("question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: quiz_core::Error,
    },
}
