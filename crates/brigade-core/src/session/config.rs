use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for [`SessionManager`](super::SessionManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on a credential check before login fails with a timeout.
    pub login_timeout_ms: u64,
    /// Extra attempts made when purging storage on logout fails.
    pub purge_retries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_timeout_ms: 30_000,
            purge_retries: 2,
        }
    }
}

impl SessionConfig {
    pub fn login_timeout(&self) -> Duration {
        Duration::from_millis(self.login_timeout_ms)
    }
}
