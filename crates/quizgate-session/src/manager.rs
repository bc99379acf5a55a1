//! The session manager: owns the session and mediates every auth call.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Restoring a persisted session at construction (hydration)
//! - Logging in, registering, and logging out
//! - Sending credentialed profile and password requests
//! - Keeping durable storage in step with the in-memory session
//! - Publishing every change to subscribed views
//!
//! # Concurrency note
//!
//! Operations may overlap: a view can start a logout while a login is still
//! waiting on the network. Every mutating operation bumps a generation
//! counter when it starts and remembers the value. When its response
//! arrives it re-checks the counter under the store lock; if anything newer
//! has started in the meantime the response is dropped on the floor and the
//! operation returns [`SessionError::Superseded`]. A slow login can
//! therefore never resurrect a session the user has already signed out of.
//! The overtaken call is also cancelled: its request future is dropped as
//! soon as the newer operation starts.
//!
//! The store lock is a plain `std::sync::Mutex`. It is only ever held for
//! the synchronous check-apply-persist step and never across an `.await`.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use quizgate_protocol::{
    AuthResponse, ChangePasswordRequest, Codec, JsonCodec, LoginRequest, ProfileUpdate,
    RegisterRequest, User,
};
use quizgate_store::SessionStore;
use quizgate_transport::{AuthApi, Endpoint, TransportError};
use tokio::sync::{Notify, watch};

use crate::{Session, SessionConfig, SessionError, SessionEvent, SessionMode, apply_event};

/// Owns one client's [`Session`].
///
/// Construct one per client; there is no global instance. Share it behind
/// an `Arc` to drive it from several tasks.
///
/// ## Lifecycle
///
/// ```text
///  new() ──→ hydrate() ──→ [Anonymous] ──login()/register()──→ [Authenticated]
///                  │                                              │    ↑
///                  └──────(valid persisted pair)──────────────────┘    │
///                                                                       │
///   [Authenticated] ──update_profile()/change_password()────────────────┘
///   [Authenticated] ──logout()──→ [Anonymous]
/// ```
pub struct SessionManager<A: AuthApi, S: SessionStore, C: Codec = JsonCodec> {
    api: A,
    store: Mutex<S>,
    codec: C,
    /// Bumped at the start of every mutating operation, only while holding
    /// `store`.
    generation: AtomicU64,
    /// Woken on every bump so in-flight calls can abandon their request.
    superseded: Notify,
    /// The session and its subscribers. `watch` keeps only the latest value,
    /// which is exactly what a re-rendering view needs.
    state: watch::Sender<Session>,
    config: SessionConfig,
}

impl<A: AuthApi, S: SessionStore> SessionManager<A, S> {
    /// Creates a manager using JSON to persist the user, and hydrates it
    /// from `store` before returning.
    pub fn new(api: A, store: S, config: SessionConfig) -> Self {
        Self::with_codec(api, store, JsonCodec, config)
    }
}

impl<A: AuthApi, S: SessionStore, C: Codec> SessionManager<A, S, C> {
    /// Creates a manager with a custom codec for the persisted user, and
    /// hydrates it from `store` before returning.
    pub fn with_codec(api: A, store: S, codec: C, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(Session::default());
        let manager = Self {
            api,
            store: Mutex::new(store),
            codec,
            generation: AtomicU64::new(0),
            superseded: Notify::new(),
            state,
            config,
        };
        manager.hydrate();
        manager
    }

    // =====================================================================
    // Observation
    // =====================================================================

    /// A snapshot of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribes to session changes. The receiver always holds the latest
    /// session; every operation publishes a whole new value.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Shorthand for `session().is_authenticated()`.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Shorthand for `session().mode()`.
    pub fn mode(&self) -> SessionMode {
        self.state.borrow().mode()
    }

    /// The current generation. Increases by one for every mutating
    /// operation started.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // =====================================================================
    // Hydration
    // =====================================================================

    /// Reloads the session from durable storage.
    ///
    /// Called by the constructor; call it again to pick up changes another
    /// process made to the store. Supersedes any operation in flight.
    ///
    /// Returns `true` if a persisted session was restored. Corrupt or
    /// half-written data is erased and the session is left anonymous
    /// without setting `error`.
    pub fn hydrate(&self) -> bool {
        let mut store = self.lock_store();
        self.next_generation();

        match self.read_persisted(&*store) {
            Ok(Some((user, token))) => {
                tracing::info!(user_id = %user.id, "session restored from storage");
                self.apply(SessionEvent::Hydrated { user, token });
                true
            }
            Ok(None) => {
                tracing::debug!("no persisted session");
                self.apply(SessionEvent::LoggedOut);
                false
            }
            Err(reason) => {
                tracing::warn!(%reason, "discarding unreadable persisted session");
                self.erase(&mut *store);
                self.apply(SessionEvent::LoggedOut);
                false
            }
        }
    }

    /// Reads the persisted pair. `Ok(None)` when nothing is stored,
    /// `Err(reason)` when what is stored can't be trusted.
    fn read_persisted(&self, store: &S) -> Result<Option<(User, String)>, String> {
        let token = store
            .get(&self.config.token_key)
            .map_err(|e| e.to_string())?;
        let raw_user = store.get(&self.config.user_key).map_err(|e| e.to_string())?;

        match (token, raw_user) {
            (None, None) => Ok(None),
            (Some(token), Some(raw_user)) => {
                if token.is_empty() {
                    return Err("persisted token is empty".to_string());
                }
                let user: User = self
                    .codec
                    .decode_str(&raw_user)
                    .map_err(|e| e.to_string())?;
                Ok(Some((user, token)))
            }
            (Some(_), None) => Err("token persisted without a user".to_string()),
            (None, Some(_)) => Err("user persisted without a token".to_string()),
        }
    }

    // =====================================================================
    // Authentication
    // =====================================================================

    /// Signs in with email and password.
    ///
    /// The manager doesn't validate the inputs; the API decides.
    ///
    /// # Errors
    /// - [`SessionError::Api`]: the API refused; the message is also in
    ///   `session().error()`
    /// - [`SessionError::InvalidResponse`]: the API answered 2xx without a
    ///   usable session; the endpoint's generic message is in
    ///   `session().error()`
    /// - [`SessionError::Network`]: no answer (or timeout); a generic
    ///   message is in `session().error()`
    /// - [`SessionError::Superseded`]: a newer operation started first
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        tracing::debug!(email, "login requested");

        let generation = self.begin(SessionEvent::AuthStarted);
        let result = self
            .call(generation, Endpoint::Login, self.api.login(&request))
            .await?;
        self.finish_auth(generation, Endpoint::Login, result)
    }

    /// Creates an account and signs in as it.
    ///
    /// # Errors
    /// Same as [`login`](Self::login).
    pub async fn register(&self, request: RegisterRequest) -> Result<User, SessionError> {
        tracing::debug!(email = %request.email, "registration requested");

        let generation = self.begin(SessionEvent::AuthStarted);
        let result = self
            .call(generation, Endpoint::Register, self.api.register(&request))
            .await?;
        self.finish_auth(generation, Endpoint::Register, result)
    }

    /// Signs out: erases the persisted pair and resets the session.
    ///
    /// Never fails. Any operation still in flight is superseded and will
    /// not touch the session when it resolves.
    pub fn logout(&self) {
        let mut store = self.lock_store();
        self.next_generation();
        self.erase(&mut *store);
        let user_id = self.state.borrow().user().map(|u| u.id);
        self.apply(SessionEvent::LoggedOut);
        match user_id {
            Some(user_id) => tracing::info!(%user_id, "logged out"),
            None => tracing::debug!("logout with no active session"),
        }
    }

    fn finish_auth(
        &self,
        generation: u64,
        endpoint: Endpoint,
        result: Result<AuthResponse, TransportError>,
    ) -> Result<User, SessionError> {
        let mut store = self.lock_store();
        self.ensure_current(generation, endpoint)?;

        match result {
            Ok(AuthResponse { user, token }) if !token.is_empty() => {
                self.persist(&mut *store, &user, &token);
                tracing::info!(user_id = %user.id, %endpoint, "session authenticated");
                self.apply(SessionEvent::AuthSucceeded {
                    user: user.clone(),
                    token,
                });
                Ok(user)
            }
            Ok(_) => {
                let err = SessionError::InvalidResponse(endpoint.fallback_message().to_string());
                self.fail_auth(&mut *store, endpoint, err)
            }
            Err(e) => self.fail_auth(&mut *store, endpoint, e.into()),
        }
    }

    /// A failed login drops any previous session, so its persisted pair
    /// goes too.
    fn fail_auth(
        &self,
        store: &mut S,
        endpoint: Endpoint,
        err: SessionError,
    ) -> Result<User, SessionError> {
        log_failure(endpoint, &err);
        self.erase(store);
        self.apply(SessionEvent::AuthFailed {
            error: err.to_string(),
        });
        Err(err)
    }

    // =====================================================================
    // Credentialed requests
    // =====================================================================

    /// Sends the edited profile fields and, on success, updates the cached
    /// user and re-persists it.
    ///
    /// By default the edited fields are merged into the cached user
    /// locally; with [`SessionConfig::refetch_after_update`] the server's
    /// copy replaces it instead.
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`]: nobody is signed in; nothing
    ///   was sent and the session is untouched
    /// - otherwise as [`login`](Self::login); on failure the cached user is
    ///   left as it was
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, SessionError> {
        let endpoint = Endpoint::UpdateProfile;
        let (generation, token) = self.begin_credentialed(endpoint)?;

        let result = self
            .call(generation, endpoint, self.api.update_profile(&token, &update))
            .await?;
        let server_user = match result {
            Ok(()) if self.config.refetch_after_update => {
                self.refetch_user(generation, &token).await?
            }
            Ok(()) => None,
            Err(e) => return self.fail_request(generation, endpoint, e.into()),
        };

        let mut store = self.lock_store();
        self.ensure_current(generation, endpoint)?;

        let user = match server_user {
            Some(user) => user,
            None => {
                let mut user = self
                    .state
                    .borrow()
                    .user()
                    .cloned()
                    .ok_or(SessionError::NotAuthenticated)?;
                update.apply_to(&mut user);
                user
            }
        };
        self.persist(&mut *store, &user, &token);
        tracing::info!(user_id = %user.id, "profile updated");
        self.apply(SessionEvent::ProfileUpdated { user: user.clone() });
        Ok(user)
    }

    /// Changes the signed-in user's password. Only the loading flag (and
    /// the error, on failure) changes.
    ///
    /// # Errors
    /// Same as [`update_profile`](Self::update_profile).
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        let endpoint = Endpoint::ChangePassword;
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        let (generation, token) = self.begin_credentialed(endpoint)?;

        let result = self
            .call(generation, endpoint, self.api.change_password(&token, &request))
            .await?;
        if let Err(e) = result {
            return self.fail_request(generation, endpoint, e.into());
        }

        let _store = self.lock_store();
        self.ensure_current(generation, endpoint)?;
        tracing::info!("password changed");
        self.apply(SessionEvent::RequestSucceeded);
        Ok(())
    }

    /// Fetches the authoritative user after an update. `Ok(None)` (with a
    /// warning) if that fails; the caller falls back to the local merge.
    async fn refetch_user(
        &self,
        generation: u64,
        token: &str,
    ) -> Result<Option<User>, SessionError> {
        let result = self
            .call(generation, Endpoint::FetchProfile, self.api.fetch_profile(token))
            .await?;
        match result {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "profile re-fetch failed, keeping local merge");
                Ok(None)
            }
        }
    }

    fn fail_request<T>(
        &self,
        generation: u64,
        endpoint: Endpoint,
        err: SessionError,
    ) -> Result<T, SessionError> {
        let _store = self.lock_store();
        self.ensure_current(generation, endpoint)?;
        log_failure(endpoint, &err);
        self.apply(SessionEvent::RequestFailed {
            error: err.to_string(),
        });
        Err(err)
    }

    /// Clears the error message. Touches nothing else.
    pub fn clear_error(&self) {
        self.apply(SessionEvent::ErrorCleared);
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Starts a mutating operation: new generation plus its start event,
    /// both under the store lock.
    fn begin(&self, event: SessionEvent) -> u64 {
        let _store = self.lock_store();
        let generation = self.next_generation();
        self.apply(event);
        generation
    }

    /// Like [`begin`](Self::begin) for calls that need the bearer token.
    /// Fails fast, without bumping the generation, if nobody is signed in.
    fn begin_credentialed(&self, endpoint: Endpoint) -> Result<(u64, String), SessionError> {
        let _store = self.lock_store();
        let token = {
            let session = self.state.borrow();
            match (session.user(), session.token()) {
                (Some(_), Some(token)) => token.to_string(),
                _ => {
                    tracing::debug!(%endpoint, "rejected: no authenticated session");
                    return Err(SessionError::NotAuthenticated);
                }
            }
        };
        let generation = self.next_generation();
        self.apply(SessionEvent::RequestStarted);
        Ok((generation, token))
    }

    /// Must be called with the store lock held.
    fn ensure_current(&self, generation: u64, endpoint: Endpoint) -> Result<(), SessionError> {
        let current = self.generation.load(Ordering::SeqCst);
        if current == generation {
            Ok(())
        } else {
            tracing::debug!(%endpoint, generation, current, "discarding superseded result");
            Err(SessionError::Superseded)
        }
    }

    /// Sends one Auth API call, bounded by the configured request timeout.
    ///
    /// The outer `Err` is [`SessionError::Superseded`]: a newer operation
    /// started while the call was in flight and the request was dropped.
    async fn call<T>(
        &self,
        generation: u64,
        endpoint: Endpoint,
        request: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<Result<T, TransportError>, SessionError> {
        let after = self.config.request_timeout;
        tokio::select! {
            outcome = tokio::time::timeout(after, request) => Ok(match outcome {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout { endpoint, after }),
            }),
            () = self.wait_superseded(generation) => {
                tracing::debug!(%endpoint, generation, "request cancelled by a newer operation");
                Err(SessionError::Superseded)
            }
        }
    }

    /// Resolves once the generation moves past `generation`.
    async fn wait_superseded(&self, generation: u64) {
        loop {
            // Registered before the check so a bump in between still wakes us.
            let notified = self.superseded.notified();
            if self.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            notified.await;
        }
    }

    /// Must be called with the store lock held.
    fn next_generation(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.superseded.notify_waiters();
        generation
    }

    fn apply(&self, event: SessionEvent) {
        self.state.send_modify(|session| {
            let current = std::mem::take(session);
            *session = apply_event(current, event);
        });
    }

    /// Writes the token and user as one batch. A failed write is logged,
    /// not returned: the in-memory session is still valid for this run.
    fn persist(&self, store: &mut S, user: &User, token: &str) {
        let encoded = match self.codec.encode_string(user) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode user for storage");
                return;
            }
        };
        let entries = [
            (self.config.token_key.as_str(), token),
            (self.config.user_key.as_str(), encoded.as_str()),
        ];
        if let Err(e) = store.set_all(&entries) {
            tracing::warn!(error = %e, "could not persist session");
        }
    }

    fn erase(&self, store: &mut S) {
        let keys = [self.config.token_key.as_str(), self.config.user_key.as_str()];
        if let Err(e) = store.remove_all(&keys) {
            tracing::warn!(error = %e, "could not erase persisted session");
        }
    }

    // Every critical section is a single apply/persist step; a poisoned
    // store is as consistent as the last completed batch.
    fn lock_store(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_failure(endpoint: Endpoint, err: &SessionError) {
    match err {
        SessionError::Network(detail) => {
            tracing::warn!(%endpoint, %detail, "auth API unreachable");
        }
        other => tracing::info!(%endpoint, error = %other, "auth API refused request"),
    }
}

// =========================================================================
// Tests
// =========================================================================
