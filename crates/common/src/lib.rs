// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between `sessionauth` clients and the server.
//! This module defines the JSON request and response bodies of the auth API.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a user by the user store
pub type UserId = i64;

/// Body of `POST /register` and `POST /login`
/// # Fields
/// * `username` - Account name, unique across the store
/// * `password` - Plaintext password, hashed before anything is persisted
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// Keep the plaintext out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public view of a user; the password hash is never part of it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
}

/// Single-message body used by every non-user response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
