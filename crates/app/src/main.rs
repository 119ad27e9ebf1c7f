use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::config::{
    API_BASE_URL_ENV, DOWNLOAD_DIR_ENV, REQUEST_TIMEOUT_ENV, parse_base_url, parse_timeout_secs,
};
use services::{AppServices, Clock, ConfigError, QuizConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl(ConfigError),
    InvalidDownloadDir { raw: String },
    InvalidTimeout(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl(err) => write!(f, "invalid --api-url value: {err}"),
            ArgsError::InvalidDownloadDir { raw } => {
                write!(f, "invalid --download-dir value: {raw:?}")
            }
            ArgsError::InvalidTimeout(err) => write!(f, "invalid --timeout value: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArgsError::InvalidApiUrl(err) | ArgsError::InvalidTimeout(err) => Some(err),
            _ => None,
        }
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--api-url <url>] [--download-dir <path>] [--timeout <secs>] [--skip-health]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {}", services::config::DEFAULT_API_BASE_URL);
    eprintln!("  --download-dir <system downloads folder>");
    eprintln!(
        "  --timeout {}",
        services::config::DEFAULT_REQUEST_TIMEOUT.as_secs()
    );
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {API_BASE_URL_ENV}, {DOWNLOAD_DIR_ENV}, {REQUEST_TIMEOUT_ENV}, RUST_LOG");
}

struct Args {
    config: QuizConfig,
    check_health: bool,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        let mut config = QuizConfig::from_env()?;
        let mut check_health = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    let url = parse_base_url(&value).map_err(ArgsError::InvalidApiUrl)?;
                    config = config.with_api_base_url(url);
                }
                "--download-dir" => {
                    let value = require_value(args, "--download-dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDownloadDir { raw: value }.into());
                    }
                    config = config.with_download_dir(PathBuf::from(value));
                }
                "--timeout" => {
                    let value = require_value(args, "--timeout")?;
                    let timeout = parse_timeout_secs(&value).map_err(ArgsError::InvalidTimeout)?;
                    config = config.with_request_timeout(timeout);
                }
                "--skip-health" => check_health = false,
                "--help" | "-h" => {
                    print_usage();
                    return Ok(None);
                }
                _ => return Err(ArgsError::UnknownArg(arg).into()),
            }
        }

        Ok(Some(Self {
            config,
            check_health,
        }))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => return Ok(()),
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err);
        }
    };

    info!(
        api = %parsed.config.api_base_url(),
        downloads = %parsed.config.download_dir().display(),
        timeout_secs = parsed.config.request_timeout().as_secs(),
        "starting quiz"
    );

    let services = AppServices::new_http(parsed.config, Clock::default_clock())?;
    if parsed.check_health {
        let quiz = services.quiz();
        tokio::spawn(async move {
            quiz.check_health().await;
        });
    }

    let context = build_app_context(Arc::new(services));

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
