use brigade_core::{RoleId, SessionManager};
use colored::Colorize;

use super::describe;

pub fn run(session: &SessionManager) {
    let roles = if session.is_authenticated() {
        session.available_roles()
    } else {
        RoleId::all()
    };
    let active = session.active_role();

    for role in roles {
        let line = describe(role);
        if Some(role) == active {
            println!("* {}", line.green().bold());
        } else {
            println!("  {}", line);
        }
    }
}
