//! Session-aware client for the banking dashboard API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `state` owns who is signed in, `guard` decides which dashboard views that
//! session may reach, `net` talks to the backend with the stored bearer
//! token, and `forms` holds the login/registration input rules. The
//! `bankdesk` binary wires these together as a CLI.

pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod net;
pub mod state;

#[cfg(test)]
mod test_helpers;

pub use error::AuthError;
pub use guard::{GuardDecision, Route};
pub use net::api::{ApiClient, ApiError, AuthApi};
pub use net::types::{Identity, Role};
pub use state::auth::{AuthSession, Session, SessionStatus};
pub use state::store::{FileTokenStore, MemoryTokenStore, TokenStore};
