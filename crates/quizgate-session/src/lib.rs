//! Client-side authentication session management for quizgate.
//!
//! This crate owns the lifecycle of one signed-in user:
//!
//! 1. **Hydration**: restoring a persisted `{token, user}` pair at startup
//! 2. **Authentication**: login and registration against the Auth API
//!    ([`AuthApi`](quizgate_transport::AuthApi) trait)
//! 3. **Credentialed calls**: profile updates and password changes
//! 4. **Logout**: dropping the session from memory and storage
//!
//! All state lives in one [`Session`] value owned by a [`SessionManager`].
//! Views subscribe to it and re-render on every change; they can't mutate
//! it except through the manager's operations.
//!
//! # How it fits in the stack
//!
//! ```text
//! Views (above)  ← subscribe to Session, call login/logout/...
//!     ↕
//! Session Layer (this crate)  ← state machine, generation guard, hydration
//!     ↕                 ↕
//! Transport (AuthApi)   Store (SessionStore)
//!     ↕                 ↕
//!        Protocol (User, AuthResponse, Codec)
//! ```

mod error;
mod event;
mod manager;
mod session;

pub use error::{NETWORK_ERROR_MESSAGE, SessionError};
pub use event::{SessionEvent, apply_event};
pub use manager::SessionManager;
pub use session::{Session, SessionConfig, SessionMode};
