// ============================
// sessionauth-backend/src/auth/session.rs
// ============================
//! Server-side session storage.
use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use sessionauth_common::UserView;
use tokio::{sync::RwLock, task::JoinHandle};

use super::token_generator::generate_secure_token;
use crate::{metrics as keys, storage::StoreError};

/// Default session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24); // 24 hours

/// A logged-in session, keyed by the opaque id carried in the cookie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user: UserView,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Trait for session store backends
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session bound to `user` under a fresh id
    async fn create(&self, user: UserView) -> Result<Session, StoreError>;

    /// Fetch a live session; expired sessions are reported as absent
    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError>;

    /// Destroy a session. Returns whether anything was removed.
    async fn destroy(&self, session_id: &str) -> Result<bool, StoreError>;

    /// Drop every expired session, returning how many were removed
    async fn cleanup_expired(&self) -> Result<usize, StoreError>;
}

/// Process-local session store
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of stored sessions, expired or not
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user: UserView) -> Result<Session, StoreError> {
        let now = Utc::now();
        let session = Session {
            id: generate_secure_token(),
            user,
            created_at: now,
            expires_at: self.expiry_from(now),
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);

        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        Ok(sessions
            .get(session_id)
            .filter(|s| !s.is_expired_at(now))
            .cloned())
    }

    async fn destroy(&self, session_id: &str) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id).is_some();
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        Ok(removed)
    }

    async fn cleanup_expired(&self) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        let before_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired_at(now));

        let after_count = sessions.len();
        let removed = before_count - after_count;

        if removed > 0 {
            counter!(keys::SESSION_EXPIRED).increment(removed as u64);
            gauge!(keys::SESSION_ACTIVE).set(after_count as f64);
        }

        Ok(removed)
    }
}

/// Periodically sweep expired sessions until the returned handle is aborted
pub fn spawn_cleanup_task(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // the first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match store.cleanup_expired().await {
                Ok(0) => {},
                Ok(removed) => tracing::debug!(removed, "expired sessions swept"),
                Err(e) => tracing::warn!("session cleanup failed: {e}"),
            }
        }
    })
}
