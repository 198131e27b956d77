use brigade_core::SessionManager;
use colored::Colorize;

pub fn run(session: &SessionManager) {
    match session.user() {
        Some(user) => {
            session.logout();
            println!("{}", format!("👋 Signed out {}", user.username).green());
        }
        None => {
            // still purge whatever partial state may be on disk
            session.logout();
            println!("Not signed in.");
        }
    }
}
