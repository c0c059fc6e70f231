//! HTTP handlers.
pub mod auth;
