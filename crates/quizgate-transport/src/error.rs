use std::time::Duration;

use crate::Endpoint;

/// Errors that can occur while talking to the Auth API.
///
/// The split matters to the session layer: `Network` and `Timeout` mean
/// no answer came back, `Api` means the server answered and said no.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused, reset, TLS).
    #[error("request to {endpoint} failed: {message}")]
    Network { endpoint: Endpoint, message: String },

    /// No response within the configured request timeout.
    #[error("request to {endpoint} timed out after {after:?}")]
    Timeout { endpoint: Endpoint, after: Duration },

    /// The server answered with a non-2xx status. `message` is the body's
    /// `error` field, or the endpoint's fallback message.
    #[error("{message}")]
    Api {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },

    /// The server answered 2xx with a body we could not parse.
    #[error("unexpected response from {endpoint}: {message}")]
    InvalidResponse {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl TransportError {
    /// `true` when no response was received (network failure or timeout).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// The HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The endpoint the failed request targeted.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Network { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Api { endpoint, .. }
            | Self::InvalidResponse { endpoint, .. } => Some(*endpoint),
            Self::ClientBuild(_) => None,
        }
    }
}
