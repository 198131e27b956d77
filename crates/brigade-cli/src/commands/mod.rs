pub mod accounts;
pub mod check;
pub mod login;
pub mod logout;
pub mod roles;
pub mod status;
pub mod switch_role;

use anyhow::{Context, Result, anyhow};
use brigade_core::{RoleId, SessionManager, SessionStorage};
use brigade_infrastructure::{AppConfig, FileSessionStorage, MemorySessionStorage};
use std::str::FromStr;
use std::sync::Arc;

/// Builds the session manager described by `config` and restores any
/// persisted session.
pub async fn open_session(config: &AppConfig, ephemeral: bool) -> Result<SessionManager> {
    let storage: Arc<dyn SessionStorage> = if ephemeral {
        Arc::new(MemorySessionStorage::new())
    } else {
        let dir = config
            .storage_dir()
            .context("Failed to resolve the session directory")?;
        tracing::debug!(dir = %dir.display(), "using file session storage");
        Arc::new(FileSessionStorage::new(dir))
    };
    let authenticator = config
        .build_authenticator()
        .context("Failed to set up authentication")?;

    let session = SessionManager::with_config(storage, authenticator, config.session.clone());
    session.initialize().await;
    Ok(session)
}

pub fn parse_role(raw: &str) -> Result<RoleId> {
    RoleId::from_str(raw.trim()).map_err(|_| {
        let known: Vec<&str> = RoleId::all().into_iter().map(RoleId::as_str).collect();
        anyhow!("Unknown role '{}' (expected one of: {})", raw, known.join(", "))
    })
}

pub fn describe(role: RoleId) -> String {
    let descriptor = role.descriptor();
    format!("{:<8} {:<14} [{}]", role.as_str(), descriptor.name, descriptor.badge)
}
