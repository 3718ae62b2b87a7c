use std::path::PathBuf;
use std::time::Duration;

use payloads::{APIClient, FileSessionStore, SessionContext};

use crate::guard::DEFAULT_FETCH_DELAY;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BACKEND_URL must be set")]
    MissingBackendUrl,
    #[error("{name} must be a whole number of milliseconds")]
    InvalidMillis {
        name: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Failed to build the HTTP client")]
    Http(#[from] reqwest::Error),
}

/// Client-side settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// e.g. "http://127.0.0.1:8000", without the `/api` suffix
    pub backend_url: String,
    pub request_timeout: Duration,
    /// Delay before a fetch requested during another fetch is retried.
    pub fetch_delay: Duration,
    /// Where the session is persisted; in memory when unset.
    pub session_file: Option<PathBuf>,
}

impl Config {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fetch_delay: DEFAULT_FETCH_DELAY,
            session_file: None,
        }
    }

    /// Read `BACKEND_URL`, `REQUEST_TIMEOUT_MS`, `FETCH_DEBOUNCE_MS` and
    /// `SESSION_FILE`, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let millis = |name: &'static str, default: Duration| {
            match var(name).filter(|value| !value.trim().is_empty()) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Duration::from_millis)
                    .map_err(|source| ConfigError::InvalidMillis { name, source }),
                None => Ok(default),
            }
        };

        let backend_url = var("BACKEND_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBackendUrl)?;

        Ok(Self {
            backend_url,
            request_timeout: millis("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT)?,
            fetch_delay: millis("FETCH_DEBOUNCE_MS", DEFAULT_FETCH_DELAY)?,
            session_file: var("SESSION_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

/// An API client with the configured timeout and session backend.
pub fn build_client(config: &Config) -> Result<APIClient, ConfigError> {
    let session = match &config.session_file {
        Some(path) => SessionContext::new(FileSessionStore::new(path)),
        None => SessionContext::in_memory(),
    };
    let inner_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    Ok(APIClient {
        inner_client,
        ..APIClient::new(config.backend_url.clone(), session)
    })
}
