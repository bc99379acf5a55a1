//! `QuizgateClientBuilder`: wires the HTTP Auth API and the session file
//! into a ready-to-use [`SessionManager`].

use std::path::PathBuf;
use std::time::Duration;

use quizgate_session::{SessionConfig, SessionManager};
use quizgate_store::FileStore;
use quizgate_transport::{ApiConfig, HttpAuthApi};

use crate::{ClientConfig, QuizgateError};

/// A session manager talking HTTP and persisting to a JSON file.
pub type QuizgateClient = SessionManager<HttpAuthApi, FileStore>;

/// Builder for configuring a [`QuizgateClient`].
///
/// # Example
///
/// ```rust,no_run
/// use quizgate::prelude::*;
///
/// # async fn run() -> Result<(), QuizgateError> {
/// let client = QuizgateClientBuilder::new()
///     .base_url("https://quiz.example.com/api")
///     .session_file("/tmp/quizgate-session.json")
///     .build()?;
///
/// if !client.is_authenticated() {
///     client.login("admin@gmail.com", "123").await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QuizgateClientBuilder {
    config: ClientConfig,
}

impl QuizgateClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Starts from an existing configuration, e.g. [`ClientConfig::from_env`].
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Sets the Auth API base URL. A trailing slash is ignored.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.config.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Bounds every Auth API call, both in the HTTP client and in the
    /// session manager.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.api.request_timeout = timeout;
        self.config.session.request_timeout = timeout;
        self
    }

    /// Sets the file the session is persisted to.
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.session_file = path.into();
        self
    }

    /// Sets the HTTP client configuration.
    pub fn api_config(mut self, config: ApiConfig) -> Self {
        self.config.api = config;
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Builds the client. The returned manager has already hydrated from
    /// the session file.
    ///
    /// # Errors
    /// - [`QuizgateError::Config`] if the base URL is empty
    /// - [`QuizgateError::Transport`] if the HTTP client can't be built
    pub fn build(self) -> Result<QuizgateClient, QuizgateError> {
        let ClientConfig {
            api,
            session,
            session_file,
        } = self.config;

        if api.base_url.trim().is_empty() {
            return Err(QuizgateError::Config("base URL is empty".into()));
        }

        tracing::info!(
            base_url = %api.base_url,
            session_file = %session_file.display(),
            "building quizgate client"
        );

        let api = HttpAuthApi::new(api)?;
        let store = FileStore::new(session_file);
        Ok(SessionManager::new(api, store, session))
    }
}

impl Default for QuizgateClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_reach_config() {
        let builder = QuizgateClientBuilder::new()
            .base_url("https://quiz.example.com/api/")
            .request_timeout(Duration::from_secs(3))
            .session_file("/tmp/session.json");

        assert_eq!(builder.config.api.base_url, "https://quiz.example.com/api");
        assert_eq!(builder.config.api.request_timeout, Duration::from_secs(3));
        assert_eq!(builder.config.session.request_timeout, Duration::from_secs(3));
        assert_eq!(builder.config.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_build_empty_base_url_is_config_error() {
        let result = QuizgateClientBuilder::new().base_url("").build();

        assert!(matches!(result, Err(QuizgateError::Config(_))));
    }
}
