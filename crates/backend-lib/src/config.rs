// ============================
// sessionauth-backend/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! environment variables prefixed with `SESSIONAUTH_` (nested keys are
//! separated by `__`, e.g. `SESSIONAUTH_SESSION__TTL_SECS=600`).
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{DEFAULT_WORK_FACTOR, MAX_LOCKOUT_DURATION, MIN_PASSWORD_LENGTH};


/// Default config file looked up by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SESSIONAUTH_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub password: PasswordSettings,
    pub login_limit: LoginLimitSettings,
    pub log: LogSettings,
}

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which user store to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Data directory, used by the file backend
    pub path: PathBuf,
    pub backend: StorageBackend,
}

/// Session cookie and lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl_secs: u64,
    /// Mark the cookie `Secure` (HTTPS only)
    pub secure_cookie: bool,
    pub cleanup_interval_secs: u64,
}

/// Password policy and hashing cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    pub min_length: usize,
    /// scrypt `log2(N)`
    pub work_factor: u8,
}

/// Failed-login lockout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginLimitSettings {
    pub max_attempts: u32,
    pub lockout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
            backend: StorageBackend::Memory,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "sid".to_string(),
            ttl_secs: 60 * 60 * 24, // 24 hours
            secure_cookie: false,
            cleanup_interval_secs: 15 * 60,
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            work_factor: DEFAULT_WORK_FACTOR,
        }
    }
}

impl Default for LoginLimitSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_secs: 5 * 60,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::extract(Figment::new().merge(Toml::file(DEFAULT_CONFIG_FILE)), ENV_PREFIX)
    }

    /// Load from an explicit config file, which must exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        Self::extract(Figment::new().merge(Toml::file_exact(path)), ENV_PREFIX)
    }

    fn extract(files: Figment, env_prefix: &str) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(files)
            .merge(Env::prefixed(env_prefix).split("__"))
            .extract()
            .context("failed to read settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log.level);
        }
        if self.session.ttl_secs == 0 {
            bail!("session.ttl_secs must be greater than 0");
        }
        if self.session.cleanup_interval_secs == 0 {
            bail!("session.cleanup_interval_secs must be greater than 0");
        }
        if self.session.cookie_name.trim().is_empty() {
            bail!("session.cookie_name must not be empty");
        }
        if self.password.min_length == 0 {
            bail!("password.min_length must be at least 1");
        }
        if !(1..=20).contains(&self.password.work_factor) {
            bail!("password.work_factor must be between 1 and 20");
        }
        if self.login_limit.max_attempts == 0 {
            bail!("login_limit.max_attempts must be greater than 0");
        }
        if self.login_limit.lockout_secs > MAX_LOCKOUT_DURATION.as_secs() {
            bail!(
                "login_limit.lockout_secs must be at most {}",
                MAX_LOCKOUT_DURATION.as_secs()
            );
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Socket address the server listens on
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("invalid server address {}:{}", self.server.host, self.server.port))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.session.cleanup_interval_secs)
    }

    pub fn lockout_duration(&self) -> Duration {
        Duration::from_secs(self.login_limit.lockout_secs)
    }
}
