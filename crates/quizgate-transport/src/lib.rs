//! Auth API abstraction layer for quizgate.
//!
//! Provides the [`AuthApi`] trait: the four (plus one) calls the session
//! manager makes against the authentication backend. The session layer only
//! ever talks to this trait, which lets tests swap in a stub backend with
//! scripted delays and failures.
//!
//! # Feature Flags
//!
//! - `http` (default): [`HttpAuthApi`], a JSON-over-HTTP implementation via
//!   `reqwest`

#![allow(async_fn_in_trait)]

mod config;
mod error;
#[cfg(feature = "http")]
mod http;

pub use config::{
    ApiConfig, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::HttpAuthApi;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use quizgate_protocol::{
    AuthResponse, ChangePasswordRequest, ErrorBody, LoginRequest, ProfileUpdate,
    RegisterRequest, User,
};

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// The Auth API endpoints the session manager calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Register,
    UpdateProfile,
    ChangePassword,
    FetchProfile,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::UpdateProfile | Self::FetchProfile => "/auth/profile",
            Self::ChangePassword => "/auth/change-password",
        }
    }

    /// HTTP method name.
    pub fn method(self) -> &'static str {
        match self {
            Self::Login | Self::Register | Self::ChangePassword => "POST",
            Self::UpdateProfile => "PUT",
            Self::FetchProfile => "GET",
        }
    }

    /// Whether the call carries the session's bearer token.
    pub fn requires_token(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// Message shown when the server fails without saying why.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::UpdateProfile => "Profile update failed",
            Self::ChangePassword => "Password change failed",
            Self::FetchProfile => "Failed to load profile",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// Extracts the user-facing message from a non-2xx response body.
///
/// Uses the body's `error` field when it is present and non-blank, and the
/// endpoint's fallback otherwise (empty body, HTML error page, other JSON).
pub fn error_message(endpoint: Endpoint, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message().map(str::to_string))
        .unwrap_or_else(|| endpoint.fallback_message().to_string())
}

// ---------------------------------------------------------------------------
// AuthApi
// ---------------------------------------------------------------------------

/// The authentication backend as seen by the session manager.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → one API client is shared by every operation
///   of a session manager, which may be driven from several tasks.
/// - Every returned future is `Send` so operations can be spawned.
///
/// Implementations report any non-2xx answer as
/// [`TransportError::Api`] and any missing answer as
/// [`TransportError::Network`] / [`TransportError::Timeout`].
///
/// # Example
///
/// ```rust
/// use quizgate_protocol::*;
/// use quizgate_transport::{AuthApi, Endpoint, TransportError};
///
/// /// Rejects everything. Handy for exercising failure paths.
/// struct ClosedApi;
///
/// fn closed(endpoint: Endpoint) -> TransportError {
///     TransportError::Api {
///         endpoint,
///         status: 503,
///         message: "Service unavailable".into(),
///     }
/// }
///
/// impl AuthApi for ClosedApi {
///     async fn login(&self, _: &LoginRequest) -> Result<AuthResponse, TransportError> {
///         Err(closed(Endpoint::Login))
///     }
///     async fn register(&self, _: &RegisterRequest) -> Result<AuthResponse, TransportError> {
///         Err(closed(Endpoint::Register))
///     }
///     async fn update_profile(&self, _: &str, _: &ProfileUpdate) -> Result<(), TransportError> {
///         Err(closed(Endpoint::UpdateProfile))
///     }
///     async fn change_password(
///         &self,
///         _: &str,
///         _: &ChangePasswordRequest,
///     ) -> Result<(), TransportError> {
///         Err(closed(Endpoint::ChangePassword))
///     }
///     async fn fetch_profile(&self, _: &str) -> Result<User, TransportError> {
///         Err(closed(Endpoint::FetchProfile))
///     }
/// }
/// ```
pub trait AuthApi: Send + Sync + 'static {
    /// `POST /auth/login` → the user and a fresh token.
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, TransportError>> + Send;

    /// `POST /auth/register` → the new user and a fresh token.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, TransportError>> + Send;

    /// `PUT /auth/profile` with the edited fields. The body of a successful
    /// response is ignored.
    fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// `POST /auth/change-password`.
    fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// `GET /auth/profile` → the authoritative user record.
    fn fetch_profile(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<User, TransportError>> + Send;
}

/// Sharing one backend between several managers (or between a manager and
/// a test that inspects the stub) goes through `Arc`.
impl<T: AuthApi> AuthApi for Arc<T> {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, TransportError>> + Send {
        (**self).login(request)
    }

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, TransportError>> + Send {
        (**self).register(request)
    }

    fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).update_profile(token, update)
    }

    fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).change_password(token, request)
    }

    fn fetch_profile(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<User, TransportError>> + Send {
        (**self).fetch_profile(token)
    }
}
