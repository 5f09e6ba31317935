//! Route guard: who may see which dashboard destination.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation is decided here from a [`Session`] snapshot so the CLI
//! and any embedding UI apply identical redirect behavior. Nothing is decided
//! while the session is still initializing.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::fmt;

use crate::error::{ALREADY_SIGNED_IN, AuthError};
use crate::net::types::Role;
use crate::state::auth::{Session, SessionStatus};

/// Known dashboard destinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    Admin,
    AdminFraud,
    AdminEnhanced,
    NotFound,
}

/// Who a destination is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Login and registration forms; signed-in users are bounced to their landing page.
    EntryPoint,
    /// Any signed-in role.
    Authenticated,
    /// Signed in with exactly this role.
    Role(Role),
}

impl Route {
    pub const ALL: [Route; 7] =
        [Self::Home, Self::Login, Self::Register, Self::Dashboard, Self::Admin, Self::AdminFraud, Self::AdminEnhanced];

    /// Resolve a path, ignoring any query string, fragment or trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        match path {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/admin" => Self::Admin,
            "/admin/fraud" => Self::AdminFraud,
            "/admin/enhanced" => Self::AdminEnhanced,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Admin => "/admin",
            Self::AdminFraud => "/admin/fraud",
            Self::AdminEnhanced => "/admin/enhanced",
            Self::NotFound => "/404",
        }
    }

    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Self::Home | Self::NotFound => Access::Public,
            Self::Login | Self::Register => Access::EntryPoint,
            Self::Dashboard => Access::Authenticated,
            Self::Admin | Self::AdminFraud | Self::AdminEnhanced => Access::Role(Role::Admin),
        }
    }

    /// Default destination after sign-in for `role`.
    #[must_use]
    pub fn landing_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Customer => Self::Dashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still initializing: show a neutral loading state, do not redirect.
    Loading,
    Render(Route),
    Redirect(Route),
}

/// Decide whether `route` may be shown for `session`.
#[must_use]
pub fn decide(route: Route, session: &Session) -> GuardDecision {
    let role = match session.status() {
        SessionStatus::Initializing => return GuardDecision::Loading,
        SessionStatus::Anonymous | SessionStatus::AuthenticationFailed => None,
        SessionStatus::Authenticated => session.user().map(|user| user.role),
    };

    match (route.access(), role) {
        (Access::Public, _) | (Access::EntryPoint, None) | (Access::Authenticated, Some(_)) => {
            GuardDecision::Render(route)
        }
        (Access::EntryPoint, Some(role)) => GuardDecision::Redirect(Route::landing_for(role)),
        (Access::Authenticated | Access::Role(_), None) => GuardDecision::Redirect(Route::Login),
        (Access::Role(required), Some(role)) if required == role => GuardDecision::Render(route),
        (Access::Role(_), Some(role)) => GuardDecision::Redirect(Route::landing_for(role)),
    }
}

/// [`decide`] for callers that cannot redirect, such as a command line.
///
/// # Errors
///
/// `SignInRequired` while loading or when the route needs a signed-in user,
/// `AuthorizationDenied` when the user lacks the route's role, and a
/// validation error when a signed-in user asks for an entry point.
pub fn require(route: Route, session: &Session) -> Result<(), AuthError> {
    match (decide(route, session), route.access()) {
        (GuardDecision::Render(_), _) => Ok(()),
        (GuardDecision::Loading | GuardDecision::Redirect(Route::Login), _) => Err(AuthError::SignInRequired),
        (GuardDecision::Redirect(_), Access::Role(required)) => Err(AuthError::AuthorizationDenied { required }),
        (GuardDecision::Redirect(_), Access::EntryPoint) => Err(AuthError::Validation(ALREADY_SIGNED_IN.to_owned())),
        (GuardDecision::Redirect(_), _) => Err(AuthError::SignInRequired),
    }
}
