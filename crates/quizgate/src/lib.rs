//! # Quizgate
//!
//! Client-side authentication sessions for the quizgate Auth API.
//!
//! Quizgate keeps one signed-in user per client: it logs in and registers
//! against the Auth API, remembers the session across restarts, sends the
//! bearer token on profile and password calls, and lets any number of
//! views watch the session change. Stale responses from operations that
//! were overtaken (say, a login answered after the user already logged out)
//! are discarded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizgate::prelude::*;
//!
//! # async fn run() -> Result<(), QuizgateError> {
//! quizgate::init_tracing();
//!
//! let config = ClientConfig::from_env()?;
//! let client = QuizgateClientBuilder::from_config(config).build()?;
//!
//! let mut session = client.subscribe();
//! client.login("admin@gmail.com", "123").await?;
//! assert!(session.borrow_and_update().is_authenticated());
//!
//! client.logout();
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate | Concern |
//! |---|---|
//! | `quizgate-protocol` | `User`, request/response bodies, `Codec` |
//! | `quizgate-transport` | `AuthApi` seam, `HttpAuthApi` |
//! | `quizgate-store` | `SessionStore`, `MemoryStore`, `FileStore` |
//! | `quizgate-session` | `Session`, `SessionManager` |

mod client;
mod config;
mod error;
mod logging;

pub use client::{QuizgateClient, QuizgateClientBuilder};
pub use config::{ClientConfig, DEFAULT_SESSION_FILE};
pub use error::QuizgateError;
pub use logging::init_tracing;

pub use quizgate_protocol as protocol;
pub use quizgate_session as session;
pub use quizgate_store as store;
pub use quizgate_transport as transport;

/// Everything a typical client needs in one import.
pub mod prelude {
    pub use crate::{ClientConfig, QuizgateClient, QuizgateClientBuilder, QuizgateError};
    pub use quizgate_protocol::{ProfileUpdate, RegisterRequest, RoleLevel, User, UserId};
    pub use quizgate_session::{
        Session, SessionConfig, SessionError, SessionManager, SessionMode,
    };
    pub use quizgate_store::{FileStore, MemoryStore, SessionStore};
    pub use quizgate_transport::{ApiConfig, AuthApi, HttpAuthApi};
}
