//! Session events and the pure transition function.
//!
//! Every change to a [`Session`] is described by a [`SessionEvent`] and
//! applied by [`apply_event`]. The function does no I/O, so the whole state
//! machine can be tested without an API or a store.

use quizgate_protocol::User;

use crate::Session;

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login or registration was sent. Clears the previous error.
    AuthStarted,

    /// Login or registration succeeded.
    AuthSucceeded { user: User, token: String },

    /// Login or registration failed. Drops any credentials.
    AuthFailed { error: String },

    /// A credentialed request (profile, password) was sent. Clears the
    /// previous error.
    RequestStarted,

    /// A credentialed request succeeded without touching the user.
    RequestSucceeded,

    /// A profile update succeeded; `user` is the new cached record.
    ProfileUpdated { user: User },

    /// A credentialed request failed. Credentials are kept.
    RequestFailed { error: String },

    /// A persisted `{token, user}` pair was restored.
    Hydrated { user: User, token: String },

    /// The user signed out (or the session was discarded).
    LoggedOut,

    /// The error banner was dismissed.
    ErrorCleared,
}

/// Applies `event` to `state` and returns the next state.
///
/// `user` and `token` only ever change together, so
/// `is_authenticated() == (user.is_some() && token.is_some())` and
/// `user.is_some() == token.is_some()` hold after every call.
pub fn apply_event(state: Session, event: SessionEvent) -> Session {
    match event {
        SessionEvent::AuthStarted | SessionEvent::RequestStarted => Session {
            is_loading: true,
            error: None,
            ..state
        },
        SessionEvent::AuthSucceeded { user, token } | SessionEvent::Hydrated { user, token } => {
            Session {
                user: Some(user),
                token: Some(token),
                is_loading: false,
                error: None,
            }
        }
        SessionEvent::AuthFailed { error } => Session {
            user: None,
            token: None,
            is_loading: false,
            error: Some(error),
        },
        SessionEvent::RequestSucceeded => Session {
            is_loading: false,
            ..state
        },
        SessionEvent::ProfileUpdated { user } => {
            // Without a token there is no session to update.
            let user = if state.token.is_some() {
                Some(user)
            } else {
                state.user
            };
            Session {
                user,
                is_loading: false,
                ..state
            }
        }
        SessionEvent::RequestFailed { error } => Session {
            is_loading: false,
            error: Some(error),
            ..state
        },
        SessionEvent::LoggedOut => Session::default(),
        SessionEvent::ErrorCleared => Session {
            error: None,
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use quizgate_protocol::{RoleLevel, UserId};

    use super::*;
    use crate::SessionMode;

    fn user(email: &str) -> User {
        User {
            id: UserId(1),
            email: email.into(),
            first_name: "Ada".into(),
            last_name: "Admin".into(),
            organization: None,
            department: None,
            role_level: RoleLevel::Admin,
            created_at: None,
            last_login: None,
        }
    }

    fn authenticated() -> Session {
        apply_event(
            Session::default(),
            SessionEvent::AuthSucceeded {
                user: user("admin@gmail.com"),
                token: "abc".into(),
            },
        )
    }

    fn failed() -> Session {
        let s = apply_event(Session::default(), SessionEvent::AuthStarted);
        apply_event(
            s,
            SessionEvent::AuthFailed {
                error: "Invalid credentials".into(),
            },
        )
    }

    // =====================================================================
    // login / register
    // =====================================================================

    #[test]
    fn test_auth_started_from_anonymous_is_authenticating() {
        let s = apply_event(Session::default(), SessionEvent::AuthStarted);

        assert_eq!(s.mode(), SessionMode::Authenticating);
        assert!(s.is_loading());
    }

    #[test]
    fn test_auth_started_from_failed_clears_error() {
        let s = apply_event(failed(), SessionEvent::AuthStarted);

        assert_eq!(s.error(), None);
        assert_eq!(s.mode(), SessionMode::Authenticating);
    }

    #[test]
    fn test_auth_succeeded_sets_user_and_token_together() {
        let s = authenticated();

        assert_eq!(s.mode(), SessionMode::Authenticated);
        assert_eq!(s.user().unwrap().email, "admin@gmail.com");
        assert_eq!(s.token(), Some("abc"));
        assert!(!s.is_loading());
    }

    #[test]
    fn test_auth_failed_is_failed_without_credentials() {
        let s = failed();

        assert_eq!(s.mode(), SessionMode::Failed);
        assert_eq!(s.error(), Some("Invalid credentials"));
        assert!(s.user().is_none());
        assert!(s.token().is_none());
        assert!(!s.is_loading());
    }

    #[test]
    fn test_auth_failed_while_authenticated_drops_credentials() {
        // Logging in again as someone else and failing leaves nobody signed in.
        let s = apply_event(authenticated(), SessionEvent::AuthStarted);
        let s = apply_event(
            s,
            SessionEvent::AuthFailed {
                error: "Invalid credentials".into(),
            },
        );

        assert!(!s.is_authenticated());
    }

    // =====================================================================
    // credentialed requests
    // =====================================================================

    #[test]
    fn test_request_started_keeps_credentials_and_loads() {
        let s = apply_event(authenticated(), SessionEvent::RequestStarted);

        assert!(s.is_loading());
        assert_eq!(s.mode(), SessionMode::Authenticated);
    }

    #[test]
    fn test_request_failed_keeps_user_and_sets_error() {
        let before = authenticated();
        let s = apply_event(before.clone(), SessionEvent::RequestStarted);
        let s = apply_event(
            s,
            SessionEvent::RequestFailed {
                error: "Current password is incorrect".into(),
            },
        );

        assert_eq!(s.user(), before.user());
        assert_eq!(s.token(), before.token());
        assert_eq!(s.error(), Some("Current password is incorrect"));
        assert!(!s.is_loading());
    }

    #[test]
    fn test_request_succeeded_only_stops_loading() {
        let before = authenticated();
        let s = apply_event(before.clone(), SessionEvent::RequestStarted);
        let s = apply_event(s, SessionEvent::RequestSucceeded);

        assert_eq!(s, before);
    }

    #[test]
    fn test_profile_updated_replaces_user() {
        let s = apply_event(authenticated(), SessionEvent::RequestStarted);
        let s = apply_event(
            s,
            SessionEvent::ProfileUpdated {
                user: user("renamed@example.com"),
            },
        );

        assert_eq!(s.user().unwrap().email, "renamed@example.com");
        assert_eq!(s.token(), Some("abc"));
        assert!(!s.is_loading());
    }

    #[test]
    fn test_profile_updated_without_session_is_ignored() {
        let s = apply_event(
            Session::default(),
            SessionEvent::ProfileUpdated {
                user: user("ghost@example.com"),
            },
        );

        assert!(s.user().is_none());
        assert!(!s.is_authenticated());
    }

    // =====================================================================
    // logout / clear_error / hydrate
    // =====================================================================

    #[test]
    fn test_logged_out_resets_everything() {
        let s = apply_event(authenticated(), SessionEvent::RequestStarted);
        let s = apply_event(s, SessionEvent::LoggedOut);

        assert_eq!(s, Session::default());
    }

    #[test]
    fn test_error_cleared_after_failed_leaves_credentials_empty() {
        let s = apply_event(failed(), SessionEvent::ErrorCleared);

        assert_eq!(s.error(), None);
        assert!(s.user().is_none());
        assert!(s.token().is_none());
        assert_eq!(s.mode(), SessionMode::Anonymous);
    }

    #[test]
    fn test_error_cleared_touches_nothing_else() {
        let s = apply_event(authenticated(), SessionEvent::RequestStarted);
        let s = apply_event(
            s,
            SessionEvent::RequestFailed {
                error: "boom".into(),
            },
        );
        let cleared = apply_event(s.clone(), SessionEvent::ErrorCleared);

        assert_eq!(cleared.user(), s.user());
        assert_eq!(cleared.token(), s.token());
        assert_eq!(cleared.is_loading(), s.is_loading());
        assert_eq!(cleared.error(), None);
    }

    #[test]
    fn test_hydrated_is_authenticated() {
        let s = apply_event(
            Session::default(),
            SessionEvent::Hydrated {
                user: user("admin@gmail.com"),
                token: "abc".into(),
            },
        );

        assert_eq!(s.mode(), SessionMode::Authenticated);
        assert!(!s.is_loading());
    }
}
