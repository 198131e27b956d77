//! Session domain module.
//!
//! This module contains the session state machine and its observable state.
//!
//! # Module Structure
//!
//! - `state`: Snapshot of the session as observers see it (`SessionSnapshot`, `Route`)
//! - `config`: Manager tunables (`SessionConfig`)
//! - `manager`: Lifecycle operations (`SessionManager`)
//! - `writer`: Ordered background persistence used by the manager
//!
//! # Usage
//!
//! ```ignore
//! use brigade_core::session::{SessionManager, SessionSnapshot, Route};
//! ```

mod config;
mod manager;
mod state;
mod writer;

// Re-export public API
pub use config::SessionConfig;
pub use manager::SessionManager;
pub use state::{Route, SessionPhase, SessionSnapshot, resolve_active_role};
