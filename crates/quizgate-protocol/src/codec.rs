//! Codec trait and implementations for serializing/deserializing records.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The session manager uses a codec to put the cached [`User`](crate::User)
//! into durable storage and to read it back during hydration. Storage is a
//! string-keyed, string-valued store (like browser `localStorage`), so the
//! trait also offers `&str`-based helpers on top of the byte methods.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// - `Send + Sync` → safe to share between tasks (the session manager is
///   usually held in an `Arc` and driven from several views at once).
/// - `'static` → the codec owns everything it needs.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Serializes a value into a UTF-8 string, for string-valued stores.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` if the codec produced bytes
    /// that are not valid UTF-8 (binary codecs can't back a text store).
    fn encode_string<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        let bytes = self.encode(value)?;
        String::from_utf8(bytes)
            .map_err(|e| ProtocolError::InvalidMessage(format!("codec output is not UTF-8: {e}")))
    }

    /// Deserializes a value from a string read out of a text store.
    ///
    /// # Errors
    /// Same as [`decode`](Self::decode).
    fn decode_str<T: DeserializeOwned>(&self, data: &str) -> Result<T, ProtocolError> {
        self.decode(data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON is what the Auth API speaks and what a browser build would keep in
/// `localStorage`, so it is the only codec shipped. It is behind the `json`
/// feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use quizgate_protocol::{Codec, JsonCodec, RoleLevel, User, UserId};
///
/// let codec = JsonCodec;
/// let user = User {
///     id: UserId(1),
///     email: "admin@gmail.com".into(),
///     first_name: "Ada".into(),
///     last_name: "Admin".into(),
///     organization: None,
///     department: None,
///     role_level: RoleLevel::Admin,
///     created_at: None,
///     last_login: None,
/// };
///
/// let text = codec.encode_string(&user).unwrap();
/// let decoded: User = codec.decode_str(&text).unwrap();
/// assert_eq!(user, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
