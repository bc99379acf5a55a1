//! Error types for the session layer.

use quizgate_transport::TransportError;

/// Message stored in [`Session::error`](crate::Session::error) when the
/// Auth API could not be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Errors returned by [`SessionManager`](crate::SessionManager) operations.
///
/// The `Display` text of `Api` and `Network` is exactly what lands in the
/// shared session's `error` field, so a view that catches the returned error
/// and a view that watches shared state show the same message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The Auth API answered and refused. `message` is the server's own
    /// text (or the endpoint's generic fallback).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The Auth API answered 2xx with something unusable (unparseable body,
    /// empty token). Holds the endpoint's generic failure message.
    #[error("{0}")]
    InvalidResponse(String),

    /// No answer came back: connection failure or timeout. The detail is
    /// kept for logs; users see a generic message.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(String),

    /// A newer mutating operation started before this one resolved, so its
    /// result was discarded. Shared state reflects the newer operation.
    #[error("operation superseded by a newer session change")]
    Superseded,

    /// The operation needs a signed-in user and there is none. Returned
    /// before any request is sent; shared state is untouched.
    #[error("no authenticated session")]
    NotAuthenticated,
}

impl SessionError {
    /// `true` for errors that were also written into the shared session.
    pub fn is_recorded(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::InvalidResponse(_) | Self::Network(_)
        )
    }
}

impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Api {
                status, message, ..
            } => Self::Api { status, message },
            TransportError::InvalidResponse { endpoint, .. } => {
                Self::InvalidResponse(endpoint.fallback_message().to_string())
            }
            TransportError::Network { message, .. } => Self::Network(message),
            TransportError::Timeout { after, .. } => {
                Self::Network(format!("timed out after {after:?}"))
            }
            TransportError::ClientBuild(message) => Self::Network(message),
        }
    }
}
