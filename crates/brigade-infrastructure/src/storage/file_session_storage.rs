//! File-backed session storage.
//!
//! Each key lives in its own file under one directory:
//!
//! ```text
//! ~/.config/brigade/session/
//! ├── user          # JSON user record
//! ├── business      # JSON business record
//! ├── token         # opaque token
//! └── currentRole   # role id, absent when no role is selected
//! ```

use super::atomic_file::AtomicFile;
use brigade_core::error::{BrigadeError, Result};
use brigade_core::{SessionStorage, StorageKey};
use std::path::PathBuf;

/// Session storage that survives process restarts.
///
/// File I/O runs on the blocking pool so callers on the async runtime are
/// never stalled by a slow disk.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file(&self, key: StorageKey) -> AtomicFile {
        AtomicFile::new(self.dir.join(key.as_str()))
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BrigadeError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait::async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let file = self.file(key);
        tracing::debug!(%key, path = %file.path().display(), "reading session value");
        blocking(move || Ok(file.load()?)).await
    }

    async fn set(&self, key: StorageKey, value: String) -> Result<()> {
        let file = self.file(key);
        tracing::debug!(%key, path = %file.path().display(), "writing session value");
        blocking(move || Ok(file.save(&value)?)).await
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        let file = self.file(key);
        tracing::debug!(%key, path = %file.path().display(), "removing session value");
        blocking(move || Ok(file.remove()?)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path().join("session"));

        assert!(storage.get(StorageKey::Token).await.unwrap().is_none());

        storage
            .set(StorageKey::Token, "mock-abc".to_string())
            .await
            .unwrap();
        assert_eq!(
            storage.get(StorageKey::Token).await.unwrap().as_deref(),
            Some("mock-abc")
        );
        assert!(temp_dir.path().join("session").join("token").exists());

        storage.remove(StorageKey::Token).await.unwrap();
        assert!(storage.get(StorageKey::Token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path().to_path_buf());

        storage
            .set(StorageKey::CurrentRole, "chef".to_string())
            .await
            .unwrap();
        storage.remove(StorageKey::User).await.unwrap();

        assert_eq!(
            storage.get(StorageKey::CurrentRole).await.unwrap().as_deref(),
            Some("chef")
        );
        assert!(storage.get(StorageKey::User).await.unwrap().is_none());
        assert!(temp_dir.path().join("currentRole").exists());
    }

    #[tokio::test]
    async fn test_unreadable_value_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        // a directory where the file should be
        std::fs::create_dir_all(temp_dir.path().join("user")).unwrap();
        let storage = FileSessionStorage::new(temp_dir.path().to_path_buf());

        let err = storage.get(StorageKey::User).await.unwrap_err();
        assert!(err.is_persistence());
    }
}
