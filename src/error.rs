//! Auth error taxonomy shared by the session manager, forms and CLI.
//!
//! DESIGN
//! ======
//! Every variant displays as a message fit for an inline form error. The
//! underlying transport detail is logged where the error is classified and
//! does not leak into the user-facing text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::net::api::ApiError;
use crate::net::types::Role;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const ALREADY_SIGNED_IN: &str = "Already signed in";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Transport failure or server-side fault; the request may not have been judged.
    #[error("{0}")]
    Network(String),

    /// The backend rejected the username/password pair.
    #[error("{0}")]
    InvalidCredentials(String),

    /// No settled signed-in session; the caller should send the user to `/login`.
    #[error("Please sign in to continue.")]
    SignInRequired,

    /// The stored token was rejected by `/auth/me`.
    #[error("Session expired. Please sign in again.")]
    ExpiredOrInvalidToken,

    /// Authenticated, but the role does not grant the requested destination.
    #[error("{} access required", required.as_str())]
    AuthorizationDenied { required: Role },

    /// Input rejected before or by the backend (blank fields, mismatched passwords, taken username).
    #[error("{0}")]
    Validation(String),

    /// The token could not be written to session storage.
    #[error("Could not save session: {0}")]
    Storage(String),
}

impl AuthError {
    /// Classify a failed login or registration call.
    ///
    /// 401 is a credential rejection, other 4xx responses are input
    /// rejections, everything else is a network-class failure. The message
    /// is the backend `detail` when present, else `fallback`.
    #[must_use]
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        let message = err.detail().unwrap_or(fallback).to_owned();
        match err.status() {
            Some(401) => Self::InvalidCredentials(message),
            Some(400..=499) => Self::Validation(message),
            _ => Self::Network(message),
        }
    }

    /// Classify a failed identity lookup.
    #[must_use]
    pub fn from_identity_lookup(err: &ApiError) -> Self {
        match err.status() {
            Some(401 | 403) => Self::ExpiredOrInvalidToken,
            _ => Self::Network(err.to_string()),
        }
    }

    /// Message retained in the session for passive display.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
