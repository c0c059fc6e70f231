// ============================
// sessionauth-backend/src/storage.rs
// ============================
//! User store abstraction with in-memory and flat-file implementations.
use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sessionauth_common::{UserId, UserView};
use thiserror::Error;
use tokio::{fs as tokio_fs, sync::Mutex};

const USERS_FILE: &str = "users.json";

/// Errors raised by user and session stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username already exists: {0}")]
    UsernameTaken(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A persisted user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

impl User {
    /// Public projection, safe to return to clients
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// A user that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Trait for user store backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, rejecting the insert if the username already exists.
    /// The check and the insert happen atomically.
    async fn add(&self, user: NewUser) -> Result<User, StoreError>;

    /// Look up a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Table shared by both backends; ids start at 1 and never repeat.
#[derive(Debug, Serialize, Deserialize)]
struct UserTable {
    next_id: UserId,
    users: Vec<User>,
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            users: Vec::new(),
        }
    }
}

impl UserTable {
    fn by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    fn insert(&mut self, new_user: NewUser) -> Result<User, StoreError> {
        if self.by_username(&new_user.username).is_some() {
            return Err(StoreError::UsernameTaken(new_user.username));
        }
        let user = User {
            id: self.next_id,
            username: new_user.username,
            password_hash: new_user.password_hash,
        };
        self.next_id += 1;
        self.users.push(user.clone());
        Ok(user)
    }
}

/// Process-local user store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.table.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn add(&self, user: NewUser) -> Result<User, StoreError> {
        self.table.write().insert(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.table.read().by_username(username).cloned())
    }
}

/// Flat-file implementation: every user lives in `<root>/users.json`.
/// The whole table is cached in memory and rewritten on each insert.
#[derive(Debug)]
pub struct FlatFileUserStore {
    path: PathBuf,
    table: Mutex<UserTable>,
}

impl FlatFileUserStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let path = root.join(USERS_FILE);
        let table = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            UserTable::default()
        };

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    /// Write to a sibling temp file, then rename over the real one.
    async fn persist(&self, table: &UserTable) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn add(&self, user: NewUser) -> Result<User, StoreError> {
        let mut table = self.table.lock().await;
        let created = table.insert(user)?;

        if let Err(e) = self.persist(&table).await {
            // roll back so the cache matches the file
            table.users.pop();
            table.next_id -= 1;
            return Err(e);
        }

        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.table.lock().await.by_username(username).cloned())
    }
}
