//! Session types: the data structures views observe.
//!
//! A "session" is the client's record of who is signed in. It tracks:
//! - WHO the user is (`User`) and the credential proving it (`token`)
//! - WHETHER a request affecting the session is in flight (`is_loading`)
//! - WHAT went wrong last (`error`)

use std::fmt;
use std::time::Duration;

use quizgate_protocol::User;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
///
/// Sensible defaults are provided; override just the fields you care about:
///
/// ```rust
/// use quizgate_session::SessionConfig;
///
/// let config = SessionConfig {
///     refetch_after_update: true,
///     ..SessionConfig::default()
/// };
/// assert_eq!(config.token_key, "token");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Storage key holding the opaque token.
    pub token_key: String,

    /// Storage key holding the JSON-encoded user.
    pub user_key: String,

    /// Upper bound on any single Auth API call made by the manager. Expiry
    /// is reported as a network error.
    ///
    /// Default: 30 seconds.
    pub request_timeout: Duration,

    /// After a successful profile update, replace the cached user with a
    /// fresh `GET /auth/profile` instead of merging the edited fields
    /// locally. If the re-fetch fails the local merge is used.
    ///
    /// Default: `false` (local merge only).
    pub refetch_after_update: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: "token".to_string(),
            user_key: "user".to_string(),
            request_timeout: Duration::from_secs(30),
            refetch_after_update: false,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionMode
// ---------------------------------------------------------------------------

/// The logical mode of a session, derived from its fields.
///
/// ```text
///              login / register
///   Anonymous ─────────────────→ Authenticating ──(ok)──→ Authenticated
///       ↑                             │                        │
///       │                          (error)                  logout
///       │                             ↓                        │
///       └──────(clear_error)────── Failed                      │
///       └──────────────────────────────────────────────────────┘
/// ```
///
/// Profile and password requests keep the mode at `Authenticated` while
/// they toggle `is_loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    Anonymous,
    Authenticating,
    Authenticated,
    Failed,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::Authenticated => write!(f, "Authenticated"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The authenticated context of one client.
///
/// Fields are private: the only way to change a `Session` is
/// [`apply_event`](crate::apply_event), which keeps `user` and `token` set
/// or cleared together. `Session::default()` is the empty, anonymous
/// session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(crate) user: Option<User>,
    pub(crate) token: Option<String>,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
}

impl Session {
    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `true` while a request affecting the session is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The last failure message, until cleared or the next action starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` iff both a user and a token are present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// The derived logical mode.
    pub fn mode(&self) -> SessionMode {
        if self.is_authenticated() {
            SessionMode::Authenticated
        } else if self.is_loading {
            SessionMode::Authenticating
        } else if self.error.is_some() {
            SessionMode::Failed
        } else {
            SessionMode::Anonymous
        }
    }
}

// The token is a bearer credential; keep it out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish()
    }
}
