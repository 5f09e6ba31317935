//! Login form: input normalization and submit flow.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::error::AuthError;
use crate::guard::Route;
use crate::net::api::AuthApi;
use crate::state::auth::{AuthSession, MISSING_CREDENTIALS};

/// Trim the username and require both fields. The password is sent as typed.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Submit the form and return where the user should land.
///
/// # Errors
///
/// Returns the [`AuthError`] from [`AuthSession::login`]; the same message is
/// kept in the session for display.
pub async fn submit_login<A: AuthApi>(
    auth: &AuthSession<A>,
    username: &str,
    password: &str,
) -> Result<Route, AuthError> {
    let identity = auth.login(username, password).await?;
    Ok(Route::landing_for(identity.role))
}
