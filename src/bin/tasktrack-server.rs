//! HTTP API server and account administration.
//!
//! Usage:
//!
//! ```text
//! tasktrack-server [serve]
//! tasktrack-server migrate
//! tasktrack-server create-user --handle alice --password s3cret
//! tasktrack-server set-password --handle alice --password n3w
//! ```
//!
//! Configuration comes from the environment, optionally seeded from a `.env`
//! file. The schema is applied before every subcommand.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tasktrack::{
    api::{self, ApiState},
    app::{Services, shutdown_signal},
    auth::TokenIssuer,
    config::AppConfig,
    logging,
    persistence::{build_pool, migrate},
    telegram::TelegramClient,
};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "tasktrack-server", version, about = "Task tracking HTTP API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Apply the database schema and exit.
    Migrate,
    /// Create a user that can log in with a password.
    CreateUser {
        /// Login handle.
        #[arg(long)]
        handle: String,
        /// Plain-text password.
        #[arg(long, env = "TASKTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Replace the password of an existing user.
    SetPassword {
        /// Login handle.
        #[arg(long)]
        handle: String,
        /// New plain-text password.
        #[arg(long, env = "TASKTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    logging::init(config.log_format)?;

    let pool = build_pool(&config.database_url, config.database_max_connections)?;
    migrate(&pool).await?;

    let transport = Arc::new(TelegramClient::new(config.telegram.clone())?);
    let services = Arc::new(Services::postgres(&pool, transport));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = ApiState::new(services, Arc::new(TokenIssuer::new(&config.jwt)));
            let listener = TcpListener::bind(config.http_bind_addr).await?;
            api::serve(listener, api::router(state), shutdown_signal()).await?;
        }
        Command::Migrate => {}
        Command::CreateUser { handle, password } => {
            let user = services.accounts.create_account(&handle, &password).await?;
            info!(user_id = %user.id(), handle = %user.handle(), "created user");
        }
        Command::SetPassword { handle, password } => {
            let user = services.accounts.set_password(&handle, &password).await?;
            info!(user_id = %user.id(), handle = %user.handle(), "password updated");
        }
    }
    Ok(())
}
