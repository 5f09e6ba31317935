//! Client-side session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` persists the bearer token and `auth` owns the session lifecycle
//! built on top of it.

pub mod auth;
pub mod store;
