//! Durable two-slot session snapshot: the adopted user (JSON) and the bearer
//! token. Restore reads these before any network traffic happens.

use std::io::ErrorKind;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::User;

/// Storage failures carry the cause as text so results stay cloneable across
/// actor channels.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
    #[error("Session snapshot corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupt(e.to_string())
    }
}

/// The two named slots the session manager persists itself into. A missing
/// slot reads as `None`, never as an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_user(&self) -> Result<Option<User>, StorageError>;
    async fn save_user(&self, user: &User) -> Result<(), StorageError>;
    async fn load_token(&self) -> Result<Option<String>, StorageError>;
    async fn save_token(&self, token: &str) -> Result<(), StorageError>;
    async fn clear_token(&self) -> Result<(), StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}

/// File-backed store: `user.json` and `token` under one directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join("user.json")
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join("token")
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load_user(&self) -> Result<Option<User>, StorageError> {
        let bytes = match tokio::fs::read(self.user_path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let user = serde_json::from_slice(&bytes)?;
        Ok(Some(user))
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec_pretty(user)?;
        tokio::fs::write(self.user_path(), bytes).await?;
        Ok(())
    }

    async fn load_token(&self) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.token_path()).await {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(token.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.token_path(), token).await?;
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.token_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.clear_token().await?;
        match tokio::fs::remove_file(self.user_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[derive(Default)]
struct Slots {
    user: Option<User>,
    token: Option<String>,
}

/// In-memory store for tests. Lock is never held across an await.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySessionStore {
    slots: Mutex<Slots>,
}

#[cfg(test)]
#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load_user(&self) -> Result<Option<User>, StorageError> {
        Ok(self.slots.lock().expect("store lock").user.clone())
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.slots.lock().expect("store lock").user = Some(user.clone());
        Ok(())
    }

    async fn load_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slots.lock().expect("store lock").token.clone())
    }

    async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.slots.lock().expect("store lock").token = Some(token.to_string());
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        self.slots.lock().expect("store lock").token = None;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().expect("store lock");
        slots.user = None;
        slots.token = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[tokio::test]
    async fn file_store_round_trips_both_slots() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path());

        assert_eq!(store.load_user().await.unwrap(), None);
        assert_eq!(store.load_token().await.unwrap(), None);

        let user = User::new("user_7", Role::Ngo, "City Harvest", "ops@harvest.example");
        store.save_user(&user).await.unwrap();
        store.save_token("tok-123").await.unwrap();

        assert_eq!(store.load_user().await.unwrap(), Some(user));
        assert_eq!(store.load_token().await.unwrap(), Some("tok-123".to_string()));
    }

    #[tokio::test]
    async fn clear_token_keeps_the_user_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path());

        let user = User::new("user_1", Role::Consumer, "Dana", "dana@example.com");
        store.save_user(&user).await.unwrap();
        store.save_token("tok-9").await.unwrap();

        store.clear_token().await.unwrap();
        assert_eq!(store.load_token().await.unwrap(), None);
        assert_eq!(store.load_user().await.unwrap(), Some(user));

        // Clearing an already-empty slot stays Ok.
        store.clear_token().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unparseable_user_snapshot_reads_as_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        tokio::fs::write(dir.path().join("user.json"), b"{ not json")
            .await
            .expect("write");
        let store = FileSessionStore::new(dir.path());

        let err = store.load_user().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
