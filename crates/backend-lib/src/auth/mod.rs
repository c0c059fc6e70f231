// ============================
// sessionauth-backend/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod password;
pub mod rate_limit;
pub mod session;
pub mod token_generator;

pub use password::{
    hash_password, hash_password_secure, validate_password_length, verify_password,
    DEFAULT_WORK_FACTOR, MIN_PASSWORD_LENGTH,
};
pub use rate_limit::{AuthRateLimiter, MAX_LOCKOUT_DURATION};
pub use session::{spawn_cleanup_task, InMemorySessionStore, Session, SessionStore, SESSION_TTL};
pub use token_generator::generate_secure_token;
