//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthSession` is the single writer of both the in-memory [`Session`] and
//! the persisted token. Route guards, forms and the CLI only ever read
//! snapshots returned by [`AuthSession::session`].
//!
//! LIFECYCLE
//! =========
//! A session starts `Initializing`. [`AuthSession::initialize`] validates any
//! stored token against `/auth/me` and settles on `Authenticated` or
//! `Anonymous`, then opens the readiness gate. Login and logout move between
//! those two states afterwards.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::store::TokenStore;
use crate::error::{AuthError, LOGIN_FAILED, REGISTRATION_FAILED};
use crate::forms::login::validate_login_input;
use crate::guard::{self, GuardDecision, Route};
use crate::net::api::AuthApi;
use crate::net::types::{Identity, RegisterRequest};

pub const MISSING_CREDENTIALS: &str = "Please enter both username and password";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Startup validation has not finished; navigation must wait.
    Initializing,
    Anonymous,
    Authenticated,
    /// Treated like `Anonymous` by the route guard. Never produced by
    /// `AuthSession`, which reports login failures through `error` instead.
    AuthenticationFailed,
}

/// Snapshot of the authentication state.
///
/// `user` is present iff `status` is `Authenticated`, and `token` is present
/// whenever `user` is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<Identity>,
    status: SessionStatus,
    error: Option<String>,
    pending_logins: u32,
}

impl Session {
    /// Fresh session awaiting startup validation.
    #[must_use]
    pub fn initializing() -> Self {
        Self { token: None, user: None, status: SessionStatus::Initializing, error: None, pending_logins: 0 }
    }

    /// Settled session with nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { status: SessionStatus::Anonymous, ..Self::initializing() }
    }

    /// Settled session for `user` holding `token`.
    #[must_use]
    pub fn authenticated(token: impl Into<String>, user: Identity) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
            status: SessionStatus::Authenticated,
            ..Self::initializing()
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Last login failure message, cleared by the next login attempt or logout.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a login request is outstanding. Disables the submit trigger;
    /// does not block navigation.
    #[must_use]
    pub fn login_in_flight(&self) -> bool {
        self.pending_logins > 0
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    fn set_authenticated(&mut self, token: String, user: Identity) {
        self.token = Some(token);
        self.user = Some(user);
        self.status = SessionStatus::Authenticated;
    }

    fn set_anonymous(&mut self) {
        self.token = None;
        self.user = None;
        self.status = SessionStatus::Anonymous;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initializing()
    }
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

enum Startup {
    NoToken,
    Restored(String, Identity),
    Rejected(String),
}

pub struct AuthSession<A> {
    api: A,
    tokens: Arc<dyn TokenStore>,
    state: Mutex<Session>,
    ready: watch::Sender<bool>,
}

impl<A: AuthApi> AuthSession<A> {
    #[must_use]
    pub fn new(api: A, tokens: Arc<dyn TokenStore>) -> Self {
        let (ready, _) = watch::channel(false);
        Self { api, tokens, state: Mutex::new(Session::initializing()), ready }
    }

    /// The API client, for view-layer calls that share the stored token.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }

    /// Current snapshot. Side-effect free.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Whether `initialize` has completed at least once.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait for the first `initialize` to finish, then return the snapshot.
    pub async fn wait_ready(&self) -> Session {
        let mut rx = self.ready.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|ready| *ready).await;
        self.session()
    }

    /// Validate the stored token, if any, and settle the session.
    ///
    /// No stored token means no network call. Any lookup failure clears the
    /// stored token and leaves the session anonymous without an error
    /// message.
    pub async fn initialize(&self) {
        let outcome = match self.tokens.load() {
            None => {
                tracing::debug!("no stored session token");
                Startup::NoToken
            }
            Some(token) => match self.api.current_user().await {
                Ok(identity) => {
                    tracing::info!(username = %identity.username, role = %identity.role, "session restored");
                    Startup::Restored(token, identity)
                }
                Err(e) => {
                    let reason = AuthError::from_identity_lookup(&e);
                    tracing::info!(error = %e, ?reason, "stored session rejected; signing out");
                    // A login that resolved meanwhile owns the store now.
                    if self.tokens.load().as_deref() == Some(token.as_str()) {
                        self.tokens.clear();
                    }
                    Startup::Rejected(token)
                }
            },
        };

        // A login or logout that resolved while `/auth/me` was in flight wins.
        let stored = self.tokens.load();
        self.update(|s| match outcome {
            Startup::Restored(token, identity) if stored.as_deref() == Some(token.as_str()) => {
                s.set_authenticated(token, identity);
            }
            Startup::Restored(token, _) | Startup::Rejected(token)
                if s.is_authenticated() && s.token() != Some(token.as_str()) => {}
            Startup::Restored(..) | Startup::Rejected(_) | Startup::NoToken => s.set_anonymous(),
        });
        self.ready.send_replace(true);
    }

    /// Sign in with `username` and `password`.
    ///
    /// On success the returned token is persisted and the session becomes
    /// authenticated. On failure the token and identity are untouched, the
    /// error message is kept in the session and also returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for blank input (no request is
    /// made), [`AuthError::InvalidCredentials`] when the backend rejects the
    /// pair, [`AuthError::Network`] for transport or server faults, and
    /// [`AuthError::Storage`] if the token cannot be persisted.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let (username, password) = match validate_login_input(username, password) {
            Ok(input) => input,
            Err(message) => {
                let err = AuthError::Validation(message.to_owned());
                self.update(|s| s.error = Some(err.user_message()));
                return Err(err);
            }
        };
        let (username, password) = (username.as_str(), password.as_str());

        self.update(|s| {
            s.pending_logins += 1;
            s.error = None;
        });
        tracing::debug!(%username, "login attempt");

        let result = match self.api.login(username, password).await {
            Ok(resp) => match self.tokens.save(&resp.access_token) {
                Ok(()) => {
                    tracing::info!(username = %resp.user.username, role = %resp.user.role, "login succeeded");
                    Ok((resp.access_token, resp.user))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "login succeeded but token could not be stored");
                    Err(AuthError::Storage(e.to_string()))
                }
            },
            Err(e) => {
                tracing::warn!(%username, error = %e, "login failed");
                Err(AuthError::from_api(&e, LOGIN_FAILED))
            }
        };

        self.update(|s| {
            s.pending_logins = s.pending_logins.saturating_sub(1);
            match result {
                Ok((token, identity)) => {
                    s.set_authenticated(token, identity.clone());
                    s.error = None;
                    Ok(identity)
                }
                Err(err) => {
                    s.error = Some(err.user_message());
                    Err(err)
                }
            }
        })
    }

    /// Sign out. Clears the stored token and the identity; never fails.
    pub fn logout(&self) {
        self.tokens.clear();
        self.update(|s| {
            s.set_anonymous();
            s.error = None;
        });
        tracing::info!("logged out");
    }

    /// Create an account. Does not sign in or touch the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] when the backend rejects the input
    /// (e.g. a taken username) and [`AuthError::Network`] for transport or
    /// server faults.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Identity, AuthError> {
        match self.api.register(request).await {
            Ok(identity) => {
                tracing::info!(username = %identity.username, role = %identity.role, "account registered");
                Ok(identity)
            }
            Err(e) => {
                tracing::warn!(username = %request.username, error = %e, "registration failed");
                Err(AuthError::from_api(&e, REGISTRATION_FAILED))
            }
        }
    }

    /// Route-guard decision for `route` against the current snapshot.
    #[must_use]
    pub fn guard(&self, route: Route) -> GuardDecision {
        guard::decide(route, &self.session())
    }
}
