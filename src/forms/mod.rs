//! Headless form logic for the login and registration entry points.

pub mod login;
pub mod register;
