use anyhow::{Context, Result};
use brigade_core::{Credentials, Route, SessionManager};
use colored::Colorize;
use std::io::BufRead;

use super::{describe, parse_role};

pub async fn run(
    session: &SessionManager,
    username: String,
    password: Option<String>,
    role: Option<String>,
) -> Result<()> {
    let role = role.as_deref().map(parse_role).transpose()?;
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    if let Some(previous) = session.user() {
        println!(
            "{}",
            format!("Replacing the session of {}", previous.username).yellow()
        );
    }

    let user = session.login(Credentials::new(username, password)).await?;
    println!(
        "{}",
        format!("✅ Signed in as {} ({})", user.full_name, user.username).green()
    );
    if let Some(business) = session.business() {
        println!("   Business: {}", business.name);
    }

    if let Some(role) = role {
        if !session.switch_role(role) {
            anyhow::bail!("{} does not hold the {} role", user.username, role);
        }
    }

    match session.route() {
        Route::Dashboard(role) => println!("   Active role: {}", describe(role).bold()),
        Route::RoleSelector => {
            println!("   Choose a role with `brigade switch-role <role>`:");
            for role in session.available_roles() {
                println!("     {}", describe(role));
            }
        }
        Route::Login | Route::Splash => {}
    }
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
