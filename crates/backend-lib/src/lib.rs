// ============================
// sessionauth-backend/src/lib.rs
// ============================
//! Session-based register / login / logout service.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;

use std::sync::Arc;

use crate::auth::{AuthRateLimiter, InMemorySessionStore, SessionStore};
use crate::config::{Settings, StorageBackend};
use crate::storage::{FlatFileUserStore, InMemoryUserStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// User store
    pub users: Arc<dyn UserStore>,
    /// Session store
    pub sessions: Arc<dyn SessionStore>,
    /// Failed-login lockout
    pub rate_limiter: Arc<AuthRateLimiter>,
    /// Configuration settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create application state around explicit stores
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        settings: Settings,
    ) -> Self {
        let rate_limiter = Arc::new(AuthRateLimiter::new(
            settings.login_limit.max_attempts,
            settings.lockout_duration(),
        ));

        Self {
            users,
            sessions,
            rate_limiter,
            settings: Arc::new(settings),
        }
    }

    /// Create application state with the stores the settings ask for
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let users: Arc<dyn UserStore> = match settings.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryUserStore::new()),
            StorageBackend::File => Arc::new(FlatFileUserStore::open(&settings.storage.path)?),
        };
        let sessions = Arc::new(InMemorySessionStore::new(settings.session_ttl()));

        Ok(Self::new(users, sessions, settings))
    }
}
