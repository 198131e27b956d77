use anyhow::Result;
use brigade_core::SessionManager;
use brigade_core::access::{require_any_active_role, require_any_role};
use colored::Colorize;

use super::parse_role;

/// Succeeds when the session may act under one of `raw_roles`. With
/// `active`, one of them must also be the active role.
pub fn run(session: &SessionManager, raw_roles: &[String], active: bool) -> Result<()> {
    let roles = raw_roles
        .iter()
        .map(|raw| parse_role(raw))
        .collect::<Result<Vec<_>>>()?;
    let snapshot = session.snapshot();

    if active {
        require_any_active_role(&snapshot, &roles)?;
    } else {
        require_any_role(&snapshot, &roles)?;
    }

    println!("{}", "allowed".green());
    Ok(())
}
