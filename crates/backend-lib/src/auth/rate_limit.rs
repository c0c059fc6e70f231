// ============================
// sessionauth-backend/src/auth/rate_limit.rs
// ============================
//! Lockout of usernames after repeated failed logins.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of failed attempts before lockout
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (5 minutes)
const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Longest lockout the limiter will impose (30 days)
pub const MAX_LOCKOUT_DURATION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Entries idle for this long are dropped by `cleanup`
const ENTRY_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Entry in the rate limit map
#[derive(Debug, Clone)]
struct RateLimitEntry {
    /// Number of failed attempts
    failed_attempts: u32,
    /// Time of the last failed attempt
    last_failure: Instant,
    /// When the lockout expires, if locked out
    lockout_expiry: Option<Instant>,
}

/// Rate limiter for login attempts, keyed by username
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    attempts: Arc<DashMap<String, RateLimitEntry>>,
    max_attempts: u32,
    lockout_duration: Duration,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_DURATION)
    }
}

impl AuthRateLimiter {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration: lockout_duration.min(MAX_LOCKOUT_DURATION),
        }
    }

    /// Record a failed login for `username`
    pub fn record_failed_attempt(&self, username: &str) {
        let now = Instant::now();

        let mut entry = self
            .attempts
            .entry(username.to_string())
            .or_insert_with(|| RateLimitEntry {
                failed_attempts: 0,
                last_failure: now,
                lockout_expiry: None,
            });

        // an expired lockout starts a fresh count
        if entry.lockout_expiry.is_some_and(|expiry| now >= expiry) {
            entry.failed_attempts = 0;
            entry.lockout_expiry = None;
        }

        entry.failed_attempts += 1;
        entry.last_failure = now;

        if entry.failed_attempts >= self.max_attempts && entry.lockout_expiry.is_none() {
            entry.lockout_expiry = Some(
                now.checked_add(self.lockout_duration)
                    .unwrap_or_else(|| now + ENTRY_RETENTION),
            );
            tracing::warn!(
                username,
                attempts = entry.failed_attempts,
                "login locked out after repeated failures"
            );
        }
    }

    /// Record a successful login
    pub fn record_success(&self, username: &str) {
        self.attempts.remove(username);
    }

    /// Check if `username` is allowed to attempt a login
    pub fn check_rate_limit(&self, username: &str) -> bool {
        match self.attempts.get(username) {
            Some(entry) => match entry.lockout_expiry {
                Some(expiry) => Instant::now() >= expiry,
                None => true,
            },
            None => true,
        }
    }

    /// Clean up expired lockouts and stale counters
    pub fn cleanup(&self) {
        let now = Instant::now();

        self.attempts.retain(|_, entry| match entry.lockout_expiry {
            Some(expiry) => now < expiry,
            None => now.duration_since(entry.last_failure) < ENTRY_RETENTION,
        });
    }

    /// Number of usernames currently tracked
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }
}
