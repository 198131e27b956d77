//! Error types for Brigade.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the session core and its collaborators.
///
/// Every variant renders a human-readable message through `Display`, so a
/// front end can show `err.to_string()` directly on the login screen.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrigadeError {
    /// Malformed or missing input, caught before any I/O
    #[error("{0}")]
    Validation(String),

    /// Credentials rejected by the authentication backend
    #[error("{0}")]
    Authentication(String),

    /// Session storage could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The signed-in user lacks the role an action requires
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("No user is signed in")]
    NotAuthenticated,

    /// An operation ran before `SessionManager::initialize` completed
    #[error("Session manager is not initialized")]
    NotInitialized,

    #[error("Login already in progress")]
    LoginInProgress,

    /// The authentication backend did not answer in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Multiple errors
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<BrigadeError>),
}

impl BrigadeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Collapses a list of errors: `Ok` when empty, the error itself when
    /// there is exactly one, `Multiple` otherwise.
    pub fn from_many(mut errors: Vec<BrigadeError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Check if this error came from the storage layer.
    pub fn is_persistence(&self) -> bool {
        match self {
            Self::Persistence(_) | Self::Io { .. } | Self::Serialization { .. } => true,
            Self::Multiple(errors) => errors.iter().all(Self::is_persistence),
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BrigadeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BrigadeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BrigadeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for BrigadeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, BrigadeError>`.
pub type Result<T> = std::result::Result<T, BrigadeError>;
