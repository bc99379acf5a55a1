//! Auth API client configuration.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where the Auth API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL the `/auth/...` paths are appended to. A trailing slash is
    /// stripped by [`with_base_url`](Self::with_base_url).
    pub base_url: String,

    /// Upper bound on a whole request, connect to last body byte.
    pub request_timeout: Duration,

    /// Upper bound on establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Default timeouts with the given base URL.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let config = ApiConfig::with_base_url("https://quiz.example.com/api/");
        assert_eq!(config.base_url, "https://quiz.example.com/api");
    }
}
