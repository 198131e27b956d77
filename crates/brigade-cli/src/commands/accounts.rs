use brigade_infrastructure::AppConfig;
use brigade_infrastructure::mock_authenticator::{MOCK_PASSWORD, MockAuthenticator};
use colored::Colorize;

pub fn run(config: &AppConfig) {
    if let Some(url) = &config.auth.api_base_url {
        println!(
            "{}",
            format!("Signing in against {}; demo accounts are disabled.", url).yellow()
        );
        return;
    }

    println!("Demo accounts (password \"{}\"):", MOCK_PASSWORD);
    for username in MockAuthenticator::usernames() {
        println!("  {}", username);
    }
}
