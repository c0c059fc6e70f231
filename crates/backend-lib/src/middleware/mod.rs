// crates/backend-lib/src/middleware/mod.rs

//! Request guards for the auth endpoints.
//!
//! The credential checks are plain `Result`-returning functions that the
//! handlers chain with `?`; the first failing check is the response.
//! `restricted` is an axum middleware for routes that need a logged-in user.

pub mod restricted;
pub mod validation;

pub use restricted::{active_session, restricted, SessionUser};
pub use validation::{
    check_password_length, check_username_exists, check_username_free, check_username_present,
};
