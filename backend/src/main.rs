//! Ticket backend entry-point: serve the REST API or provision accounts.

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::user::Role;
use backend::server::{self, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "backend", about = "Support ticket system backend")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a user account; there is no public signup endpoint.
    Provision {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        /// `normal` or `admin`.
        #[arg(long, default_value = "normal")]
        role: String,
        #[arg(long, env = "PROVISION_PASSWORD")]
        password: String,
    },
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Provision {
            email,
            username,
            role,
            password,
        }) => {
            let role: Role = role.parse().map_err(std::io::Error::other)?;
            server::provision_account(&cli.config.database_url, email, username, role, password)
                .await
        }
        None => server::run(cli.config).await,
    }
}
