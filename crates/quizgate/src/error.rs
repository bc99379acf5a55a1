//! Unified error type for quizgate.

use quizgate_protocol::ProtocolError;
use quizgate_session::SessionError;
use quizgate_store::StoreError;
use quizgate_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `quizgate` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum QuizgateError {
    /// An Auth API error (unreachable, refused, unreadable reply).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An encode/decode error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A durable storage error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session operation error.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}
