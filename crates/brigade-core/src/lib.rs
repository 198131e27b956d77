//! Domain layer for Brigade.
//!
//! Holds the staff role model, the session state machine and the traits its
//! collaborators implement. Storage and network code live in
//! `brigade-infrastructure`.

pub mod access;
pub mod auth;
pub mod error;
pub mod role;
pub mod session;
pub mod storage;
pub mod user;

// Re-export common types
pub use auth::Authenticator;
pub use error::BrigadeError;
pub use role::{RoleDescriptor, RoleId};
pub use session::{Route, SessionConfig, SessionManager, SessionPhase, SessionSnapshot};
pub use storage::{SessionStorage, StorageKey};
pub use user::{Business, Credentials, SessionSeed, User};
