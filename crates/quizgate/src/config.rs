//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use quizgate_session::SessionConfig;
use quizgate_transport::ApiConfig;

use crate::QuizgateError;

pub const DEFAULT_SESSION_FILE: &str = ".quizgate/session.json";

/// Everything needed to build a client: where the Auth API lives, how the
/// session behaves, and where it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// All optional:
    /// - `QUIZGATE_API_URL`: default `http://localhost:3000/api`
    /// - `QUIZGATE_REQUEST_TIMEOUT_SECS`: default 30, applies to both the
    ///   HTTP client and the session's per-call bound
    /// - `QUIZGATE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `QUIZGATE_SESSION_FILE`: default `.quizgate/session.json`
    /// - `QUIZGATE_REFETCH_AFTER_UPDATE`: `true`/`false`, default `false`
    ///
    /// # Errors
    /// [`QuizgateError::Config`] if a variable is set but unusable.
    pub fn from_env() -> Result<Self, QuizgateError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, QuizgateError> {
        let mut config = Self::default();

        if let Some(url) = lookup("QUIZGATE_API_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(QuizgateError::Config("QUIZGATE_API_URL is empty".into()));
            }
            config.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_secs(&lookup, "QUIZGATE_REQUEST_TIMEOUT_SECS")? {
            config.api.request_timeout = secs;
            config.session.request_timeout = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "QUIZGATE_CONNECT_TIMEOUT_SECS")? {
            config.api.connect_timeout = secs;
        }
        if let Some(path) = lookup("QUIZGATE_SESSION_FILE").filter(|p| !p.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }
        if let Some(flag) = lookup("QUIZGATE_REFETCH_AFTER_UPDATE") {
            config.session.refetch_after_update = parse_bool("QUIZGATE_REFETCH_AFTER_UPDATE", &flag)?;
        }

        Ok(config)
    }
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, QuizgateError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(QuizgateError::Config(format!("{key} must be at least 1"))),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(_) => Err(QuizgateError::Config(format!(
            "{key} must be a whole number of seconds, got '{raw}'"
        ))),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, QuizgateError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(QuizgateError::Config(format!(
            "{key} must be true or false, got '{other}'"
        ))),
    }
}
