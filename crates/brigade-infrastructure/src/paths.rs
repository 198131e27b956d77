//! Unified path management for brigade files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/brigade/           # Config directory ($BRIGADE_HOME overrides)
//! ├── config.toml              # Application configuration
//! └── session/                 # Persisted session keys (FileSessionStorage)
//! ```

use std::path::PathBuf;

/// Environment variable that relocates the whole brigade directory.
pub const HOME_ENV: &str = "BRIGADE_HOME";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct BrigadePaths;

impl BrigadePaths {
    /// Returns the brigade configuration directory.
    ///
    /// `$BRIGADE_HOME` when set, otherwise the platform config directory
    /// with `brigade` appended (e.g. `~/.config/brigade/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        dirs::config_dir()
            .map(|dir| dir.join("brigade"))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory holding one file per persisted session key.
    pub fn session_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let Ok(config_dir) = BrigadePaths::config_dir() else {
            // no home directory in this environment
            return;
        };
        let config_file = BrigadePaths::config_file().unwrap();
        let session_dir = BrigadePaths::session_dir().unwrap();

        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));
        assert!(session_dir.ends_with("session"));
        assert!(session_dir.starts_with(&config_dir));
    }
}
