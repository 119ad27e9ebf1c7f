#![forbid(unsafe_code)]

pub mod app_services;
pub mod backend;
pub mod charts;
pub mod config;
pub mod error;
pub mod report;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use backend::{GenerateRequest, HttpQuizBackend, QuizBackend};
pub use charts::{ChartBoard, ChartHandle, ChartRenderer, RasterChartRenderer, RasterImage};
pub use config::QuizConfig;
pub use error::{BackendError, ConfigError, ErrorKind, ReportError, SessionError};
pub use report::{DocumentRenderer, DownloadSink, ReportService};

pub use sessions::{
    BeginSubmit, GenerateOutcome, Phase, QuizSession, QuizSessionService, SubmitOutcome, Timer,
};
