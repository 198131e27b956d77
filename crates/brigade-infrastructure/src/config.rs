//! Application configuration loaded from `~/.config/brigade/config.toml`.
//!
//! ```toml
//! [session]
//! login_timeout_ms = 30000
//! purge_retries = 2
//!
//! [storage]
//! dir = "/var/lib/brigade/session"   # optional
//!
//! [auth]
//! api_base_url = "https://api.example.com/v1"   # optional, mock table when absent
//! request_timeout_ms = 10000
//! mock_latency_ms = 0
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every section and field is optional; missing ones take their defaults.

use crate::http_authenticator::HttpAuthenticator;
use crate::mock_authenticator::MockAuthenticator;
use crate::paths::BrigadePaths;
use crate::storage::AtomicFile;
use brigade_core::error::{BrigadeError, Result};
use brigade_core::{Authenticator, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session directory; `~/.config/brigade/session` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// REST API base URL. Without one the demo account table is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    pub request_timeout_ms: u64,
    /// Artificial delay for the demo accounts.
    pub mock_latency_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_ms: 10_000,
            mock_latency_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parses the file at `path`. A missing or blank file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(content) = AtomicFile::new(path.to_path_buf()).load()? else {
            return Ok(Self::default());
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but writes the defaults out when the file
    /// does not exist yet. The flag is `true` when the file was created.
    ///
    /// Runs before logging is set up, so reporting the creation is left to
    /// the caller.
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            return Ok((Self::load(path)?, false));
        }
        let config = Self::default();
        config.save(path)?;
        Ok((config, true))
    }

    /// `~/.config/brigade/config.toml`, or under `$BRIGADE_HOME`.
    pub fn default_path() -> Result<PathBuf> {
        BrigadePaths::config_file().map_err(|e| BrigadeError::config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        AtomicFile::new(path.to_path_buf()).save(&content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.session.login_timeout_ms == 0 {
            errors.push(BrigadeError::config("session.login_timeout_ms must be positive"));
        }
        if self.auth.request_timeout_ms == 0 {
            errors.push(BrigadeError::config("auth.request_timeout_ms must be positive"));
        }
        if let Some(url) = &self.auth.api_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(BrigadeError::config(format!(
                    "auth.api_base_url must be an http(s) URL, got '{url}'"
                )));
            }
        }
        BrigadeError::from_many(errors)
    }

    /// The configured session directory, or the default one.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage.dir {
            Some(dir) => Ok(dir.clone()),
            None => BrigadePaths::session_dir().map_err(|e| BrigadeError::config(e.to_string())),
        }
    }

    /// The HTTP authenticator when a base URL is configured, the demo
    /// accounts otherwise.
    pub fn build_authenticator(&self) -> Result<Arc<dyn Authenticator>> {
        match &self.auth.api_base_url {
            Some(url) => {
                tracing::debug!(%url, "using HTTP authenticator");
                let timeout = Duration::from_millis(self.auth.request_timeout_ms);
                Ok(Arc::new(HttpAuthenticator::new(url.clone(), timeout)?))
            }
            None => {
                tracing::debug!("using demo account authenticator");
                Ok(Arc::new(MockAuthenticator::with_latency(Duration::from_millis(
                    self.auth.mock_latency_ms,
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load(&temp_dir.path().join("config.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.session.login_timeout_ms, 30_000);
        assert_eq!(config.logging.level, "info");
        assert!(config.auth.api_base_url.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[session]\nlogin_timeout_ms = 5000\n\n[storage]\ndir = \"/tmp/brigade\"\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.session.login_timeout_ms, 5000);
        assert_eq!(config.session.purge_retries, 2);
        assert_eq!(config.storage_dir().unwrap(), PathBuf::from("/tmp/brigade"));
        assert_eq!(config.auth.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("brigade").join("config.toml");

        let (created, was_created) = AppConfig::load_or_create(&path).unwrap();
        assert!(was_created);
        assert!(path.exists());

        let reloaded = AppConfig::load(&path).unwrap();
        assert_eq!(created, reloaded);

        let (again, was_created) = AppConfig::load_or_create(&path).unwrap();
        assert!(!was_created);
        assert_eq!(again, created);
    }

    #[test]
    fn test_invalid_toml_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[session\nlogin_timeout_ms = ").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, BrigadeError::Serialization { ref format, .. } if format == "TOML"));
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[session]\nlogin_timeout_ms = 0\n\n[auth]\napi_base_url = \"ftp://nope\"\n",
        )
        .unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, BrigadeError::Multiple(ref e) if e.len() == 2));
    }

    #[tokio::test]
    async fn test_build_authenticator_defaults_to_demo_accounts() {
        let auth = AppConfig::default().build_authenticator().unwrap();
        let seed = auth
            .verify_credentials(&brigade_core::Credentials::new("waiter", "123"))
            .await
            .unwrap();
        assert!(seed.token.starts_with("mock-"));
    }
}
