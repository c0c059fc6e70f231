// ============================
// crates/backend-lib/src/middleware/validation.rs
// ============================
//! Credential checks run before the register and login handlers.
//!
//! Passwords are never checked for presence here: an empty password is
//! simply too short on register and a mismatch on login.

use crate::auth::validate_password_length;
use crate::error::AppError;
use crate::storage::{User, UserStore};

/// A whitespace-only username counts as missing
pub fn check_username_present(username: &str) -> Result<(), AppError> {
    if username.trim().is_empty() {
        return Err(AppError::MissingUsername);
    }
    Ok(())
}

/// Fails with 422 "Username taken" if the username is already registered.
///
/// This is a fast path only; the store's insert is what guarantees uniqueness.
pub async fn check_username_free(users: &dyn UserStore, username: &str) -> Result<(), AppError> {
    if users.find_by_username(username).await?.is_some() {
        return Err(AppError::UsernameTaken);
    }
    Ok(())
}

/// Fails with 401 if no such user exists, otherwise hands the user on
pub async fn check_username_exists(
    users: &dyn UserStore,
    username: &str,
) -> Result<User, AppError> {
    users
        .find_by_username(username)
        .await?
        .ok_or(AppError::InvalidCredentials)
}

/// Fails with 422 if the password is shorter than `min_length` chars
pub fn check_password_length(password: &str, min_length: usize) -> Result<(), AppError> {
    if !validate_password_length(password, min_length) {
        return Err(AppError::PasswordTooShort { min_length });
    }
    Ok(())
}
