//! Networking modules for the dashboard REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls and bearer injection, and `types` defines the
//! shared wire schema.

pub mod api;
pub mod types;
