//! Fixtures shared by unit tests.

use crate::net::types::{Identity, LoginResponse, Role};

pub fn identity(username: &str, role: Role) -> Identity {
    Identity {
        id: format!("id-{username}"),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        full_name: None,
        role,
        created_at: "2024-03-01T09:30:00".to_owned(),
    }
}

pub fn login_response(token: &str, username: &str, role: Role) -> LoginResponse {
    LoginResponse {
        access_token: token.to_owned(),
        token_type: "bearer".to_owned(),
        user: identity(username, role),
    }
}
