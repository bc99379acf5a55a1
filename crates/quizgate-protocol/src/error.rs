//! Error types for the protocol layer.
//!
//! Each crate in quizgate defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization of a record,
//! not in networking or storage.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields (e.g. a
    /// persisted user without an `email`), or a truncated file.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The record parsed but violates a protocol rule, e.g. an auth
    /// response with an empty token.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
