//! Session storage trait.
//!
//! Defines the key-value interface the session manager persists through.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// The keys the session manager owns. Each field gets its own key so a
/// partially written session can be detected on the next start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    User,
    Business,
    Token,
    CurrentRole,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::User,
        StorageKey::Business,
        StorageKey::Token,
        StorageKey::CurrentRole,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::User => "user",
            StorageKey::Business => "business",
            StorageKey::Token => "token",
            StorageKey::CurrentRole => "currentRole",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An abstract key-value store for the persisted session.
///
/// Values are opaque strings; the manager decides their encoding (JSON for
/// records, raw strings for the token and role).
///
/// # Implementation Notes
///
/// - `get` returns `Ok(None)` for a key that was never written or was removed.
/// - `remove` on a missing key is not an error.
/// - No other component should read or write these keys directly.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: StorageKey) -> Result<Option<String>>;

    async fn set(&self, key: StorageKey, value: String) -> Result<()>;

    async fn remove(&self, key: StorageKey) -> Result<()>;
}
