use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://mini-project-quiz-app.onrender.com/api";
pub const API_BASE_URL_ENV: &str = "QUIZ_API_BASE_URL";
pub const DOWNLOAD_DIR_ENV: &str = "QUIZ_DOWNLOAD_DIR";
pub const REQUEST_TIMEOUT_ENV: &str = "QUIZ_REQUEST_TIMEOUT_SECS";

/// Upper bound on one backend request, connection included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Questions requested per quiz.
pub const QUESTIONS_PER_QUIZ: u32 = 10;

/// Runtime configuration for the quiz client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    api_base_url: Url,
    download_dir: PathBuf,
    questions_per_quiz: u32,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl QuizConfig {
    /// Build a config from an explicit base URL and download directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse or is not http(s).
    pub fn new(api_base_url: &str, download_dir: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            download_dir,
            questions_per_quiz: QUESTIONS_PER_QUIZ,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Read `QUIZ_API_BASE_URL`, `QUIZ_DOWNLOAD_DIR` and
    /// `QUIZ_REQUEST_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `QUIZ_API_BASE_URL` is set to an invalid URL
    /// or `QUIZ_REQUEST_TIMEOUT_SECS` is not a positive number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let download_dir = env::var_os(DOWNLOAD_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);
        let mut config = Self::new(&base, download_dir)?;
        if let Some(raw) = env::var(REQUEST_TIMEOUT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config = config.with_request_timeout(parse_timeout_secs(&raw)?);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: Url) -> Self {
        self.api_base_url = url;
        self
    }

    #[must_use]
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    /// Total time allowed per request. The connect timeout never exceeds it.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[must_use]
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    /// Join an endpoint path onto the base URL, keeping the base path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    #[must_use]
    pub fn download_dir(&self) -> &PathBuf {
        &self.download_dir
    }

    #[must_use]
    pub fn questions_per_quiz(&self) -> u32 {
        self.questions_per_quiz
    }
}

/// # Errors
///
/// Returns `ConfigError` if `raw` is not an absolute http(s) URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(raw.to_string())),
    }
}

/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` unless `raw` is a whole number of
/// seconds greater than zero.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
