use anyhow::Result;
use brigade_infrastructure::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser)]
#[command(name = "brigade")]
#[command(about = "Brigade CLI - staff sign-in and role selection", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/brigade/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep the session in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
        /// Role to activate right after signing in
        #[arg(long)]
        role: Option<String>,
    },
    /// Sign out and purge the persisted session
    Logout,
    /// Show the current session
    Status,
    /// Make one of your roles the active one
    SwitchRole { role: String },
    /// List roles (yours when signed in, all otherwise)
    Roles,
    /// Exit non-zero unless the session holds one of the given roles
    Check {
        #[arg(required = true)]
        roles: Vec<String>,
        /// Require one of the roles to be the active role
        #[arg(long)]
        active: bool,
    },
    /// List the demo accounts available without an API URL
    Accounts,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, created) = match &cli.config {
        Some(path) => (AppConfig::load(path)?, None),
        None => {
            let path = AppConfig::default_path()?;
            let (config, created) = AppConfig::load_or_create(&path)?;
            (config, created.then_some(path))
        }
    };
    init_logging(&config.logging.level);
    if let Some(path) = created {
        tracing::info!(path = %path.display(), "created default configuration");
    }

    let session = commands::open_session(&config, cli.ephemeral).await?;

    let outcome = match cli.command {
        Commands::Login {
            username,
            password,
            role,
        } => commands::login::run(&session, username, password, role).await,
        Commands::Logout => {
            commands::logout::run(&session);
            Ok(())
        }
        Commands::Status => {
            commands::status::run(&session);
            Ok(())
        }
        Commands::SwitchRole { role } => commands::switch_role::run(&session, &role),
        Commands::Roles => {
            commands::roles::run(&session);
            Ok(())
        }
        Commands::Check { roles, active } => commands::check::run(&session, &roles, active),
        Commands::Accounts => {
            commands::accounts::run(&config);
            Ok(())
        }
    };

    // background writes must land before the process exits
    session.flush().await;
    outcome
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
