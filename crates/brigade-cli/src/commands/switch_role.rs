use anyhow::Result;
use brigade_core::{BrigadeError, SessionManager};
use colored::Colorize;

use super::{describe, parse_role};

pub fn run(session: &SessionManager, raw: &str) -> Result<()> {
    let role = parse_role(raw)?;
    if !session.is_authenticated() {
        return Err(BrigadeError::NotAuthenticated.into());
    }
    if !session.switch_role(role) {
        anyhow::bail!("You do not hold the {} role", role);
    }
    println!("{}", format!("Active role: {}", describe(role)).green());
    Ok(())
}
