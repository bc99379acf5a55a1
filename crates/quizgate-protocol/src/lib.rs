//! Wire and storage types for quizgate.
//!
//! This crate defines the "language" spoken between the session manager,
//! the Auth API, and durable storage:
//!
//! - **Types** ([`User`], [`RoleLevel`], [`LoginRequest`], [`AuthResponse`],
//!   etc.): the records that travel over HTTP and get persisted.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those records are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits below both the transport (HTTP) and the session
//! layer. It knows nothing about requests in flight or storage keys: it
//! only knows the shape of the data.
//!
//! ```text
//! Transport (HTTP bodies) ─┐
//!                          ├─→ Protocol (User, AuthResponse, ...)
//! Store (persisted JSON) ──┘
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AuthResponse, ChangePasswordRequest, ErrorBody, LoginRequest,
    ProfileResponse, ProfileUpdate, RegisterRequest, RoleLevel, User, UserId,
};
