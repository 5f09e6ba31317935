//! Registration form: client-side checks and submit flow.
//!
//! Mismatched passwords and blank required fields are rejected here, before
//! any request leaves the client.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use crate::error::AuthError;
use crate::guard::Route;
use crate::net::api::AuthApi;
use crate::net::types::{RegisterRequest, Role};
use crate::state::auth::AuthSession;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const MISSING_REQUIRED_FIELDS: &str = "Please fill in all required fields";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    pub full_name: String,
}

impl RegisterForm {
    /// Check the form and build the request body. `confirm_password` is not sent.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for blank required fields, an email
    /// without `@`, or mismatched passwords.
    pub fn validate(&self) -> Result<RegisterRequest, AuthError> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(MISSING_REQUIRED_FIELDS.to_owned()));
        }
        if !looks_like_email(email) {
            return Err(AuthError::Validation(INVALID_EMAIL.to_owned()));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::Validation(PASSWORDS_DO_NOT_MATCH.to_owned()));
        }

        let full_name = self.full_name.trim();
        Ok(RegisterRequest {
            username: username.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
            role: self.role,
            full_name: (!full_name.is_empty()).then(|| full_name.to_owned()),
        })
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Validate and submit the form. On success the user is sent to the login page.
///
/// # Errors
///
/// Returns the validation error without making a request, or the classified
/// backend failure from [`AuthSession::register`].
pub async fn submit_registration<A: AuthApi>(auth: &AuthSession<A>, form: &RegisterForm) -> Result<Route, AuthError> {
    let request = form.validate()?;
    auth.register(&request).await?;
    Ok(Route::Login)
}
