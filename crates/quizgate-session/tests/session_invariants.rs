/// Property-based tests for the session state machine using proptest
///
/// These fold random event sequences through `apply_event` and check the
/// invariants every view relies on after each step.
use proptest::prelude::*;
use quizgate_protocol::{RoleLevel, User, UserId};
use quizgate_session::{Session, SessionEvent, SessionMode, apply_event};

// Strategy to generate a user with a small id range so repeats happen
fn user_strategy() -> impl Strategy<Value = User> {
    (1u64..=5, prop::bool::ANY).prop_map(|(id, admin)| User {
        id: UserId(id),
        email: format!("user{id}@example.com"),
        first_name: "First".into(),
        last_name: "Last".into(),
        organization: None,
        department: None,
        role_level: if admin { RoleLevel::Admin } else { RoleLevel::User },
        created_at: None,
        last_login: None,
    })
}

// Strategy to generate any session event
fn event_strategy() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        Just(SessionEvent::AuthStarted),
        (user_strategy(), "[a-z]{1,8}")
            .prop_map(|(user, token)| SessionEvent::AuthSucceeded { user, token }),
        "[A-Za-z ]{1,20}".prop_map(|error| SessionEvent::AuthFailed { error }),
        Just(SessionEvent::RequestStarted),
        Just(SessionEvent::RequestSucceeded),
        user_strategy().prop_map(|user| SessionEvent::ProfileUpdated { user }),
        "[A-Za-z ]{1,20}".prop_map(|error| SessionEvent::RequestFailed { error }),
        (user_strategy(), "[a-z]{1,8}")
            .prop_map(|(user, token)| SessionEvent::Hydrated { user, token }),
        Just(SessionEvent::LoggedOut),
        Just(SessionEvent::ErrorCleared),
    ]
}

proptest! {
    #[test]
    fn test_user_and_token_always_move_together(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let mut session = Session::default();
        for event in events {
            session = apply_event(session, event);

            prop_assert_eq!(session.user().is_some(), session.token().is_some());
            prop_assert_eq!(
                session.is_authenticated(),
                session.user().is_some() && session.token().is_some()
            );
        }
    }

    #[test]
    fn test_completion_events_stop_loading(
        prefix in prop::collection::vec(event_strategy(), 0..20),
        last in event_strategy()
    ) {
        let session = prefix.into_iter().fold(Session::default(), apply_event);
        let completes = matches!(
            last,
            SessionEvent::AuthSucceeded { .. }
                | SessionEvent::AuthFailed { .. }
                | SessionEvent::RequestSucceeded
                | SessionEvent::ProfileUpdated { .. }
                | SessionEvent::RequestFailed { .. }
                | SessionEvent::Hydrated { .. }
                | SessionEvent::LoggedOut
        );

        let after = apply_event(session, last);

        if completes {
            prop_assert!(!after.is_loading());
        }
    }

    #[test]
    fn test_start_events_clear_error_and_load(
        prefix in prop::collection::vec(event_strategy(), 0..20),
        credentialed in prop::bool::ANY
    ) {
        let session = prefix.into_iter().fold(Session::default(), apply_event);
        let start = if credentialed {
            SessionEvent::RequestStarted
        } else {
            SessionEvent::AuthStarted
        };

        let after = apply_event(session, start);

        prop_assert!(after.is_loading());
        prop_assert_eq!(after.error(), None);
    }

    #[test]
    fn test_error_cleared_changes_only_error(
        prefix in prop::collection::vec(event_strategy(), 0..20)
    ) {
        let session = prefix.into_iter().fold(Session::default(), apply_event);

        let after = apply_event(session.clone(), SessionEvent::ErrorCleared);

        prop_assert_eq!(after.user(), session.user());
        prop_assert_eq!(after.token(), session.token());
        prop_assert_eq!(after.is_loading(), session.is_loading());
        prop_assert_eq!(after.error(), None);
    }

    #[test]
    fn test_logged_out_is_always_anonymous(
        prefix in prop::collection::vec(event_strategy(), 0..20)
    ) {
        let session = prefix.into_iter().fold(Session::default(), apply_event);

        let after = apply_event(session, SessionEvent::LoggedOut);

        prop_assert_eq!(after.mode(), SessionMode::Anonymous);
        prop_assert_eq!(after, Session::default());
    }
}
