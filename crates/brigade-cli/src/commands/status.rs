use brigade_core::{SessionManager, SessionPhase};
use colored::Colorize;

use super::describe;

pub fn run(session: &SessionManager) {
    let snapshot = session.snapshot();
    let (Some(user), Some(business)) = (snapshot.user(), snapshot.business()) else {
        println!("{}", "Not signed in.".yellow());
        return;
    };

    println!("{}", "=== Session ===".bright_magenta().bold());
    println!("User:     {} ({}, id {})", user.full_name, user.username, user.id);
    println!("Business: {} ({})", business.name, business.id);
    if let Some(address) = &business.address {
        println!("Address:  {}", address);
    }
    if let Some(phone) = &business.phone {
        println!("Phone:    {}", phone);
    }

    let roles: Vec<&str> = user.roles.iter().map(|role| role.as_str()).collect();
    println!("Roles:    {}", roles.join(", "));

    match snapshot.phase() {
        SessionPhase::AuthenticatedRoleActive(role) => {
            println!("Active:   {}", describe(role).green())
        }
        _ => println!("Active:   {}", "none selected".yellow()),
    }
}
