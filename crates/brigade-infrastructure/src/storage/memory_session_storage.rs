//! In-process session storage.

use brigade_core::error::{BrigadeError, Result};
use brigade_core::{SessionStorage, StorageKey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Session storage that lives only as long as the process.
///
/// Used for ephemeral sessions (`--ephemeral` in the CLI) and in tests, where
/// the failure switches simulate an unavailable device store.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: Mutex<HashMap<StorageKey, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get` fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set`/`remove` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `set`/`remove` calls so far, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn is_empty(&self) -> bool {
        self.values.lock().await.is_empty()
    }

    fn record_write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BrigadeError::persistence("storage is read-only"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get(&self, key: StorageKey) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BrigadeError::persistence("storage is unavailable"));
        }
        Ok(self.values.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: String) -> Result<()> {
        self.record_write()?;
        self.values.lock().await.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        self.record_write()?;
        self.values.lock().await.remove(&key);
        Ok(())
    }
}
