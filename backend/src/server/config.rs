//! Runtime configuration for the two server binaries.
//!
//! Flags take precedence over environment variables; both secrets are read
//! from files so they stay out of process listings.

use std::path::PathBuf;

use clap::Parser;

/// Configuration for the ticket system backend.
#[derive(Debug, Clone, Parser)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3001")]
    pub bind: String,

    /// Path to the SQLite database file.
    #[arg(long, env = "DATABASE_URL", default_value = "tickets.db")]
    pub database_url: String,

    /// File holding the session cookie key material.
    ///
    /// Without it a fresh key is generated at startup and existing sessions
    /// do not survive a restart.
    #[arg(long, env = "SESSION_KEY_FILE")]
    pub session_key_file: Option<PathBuf>,

    /// File holding the delegation token secret shared with `estimationd`.
    #[arg(long, env = "TOKEN_SECRET_FILE")]
    pub token_secret_file: Option<PathBuf>,

    /// Drop the `Secure` attribute from the session cookie for plain-HTTP
    /// local development.
    #[arg(long, env = "SESSION_COOKIE_INSECURE")]
    pub insecure_cookies: bool,
}

/// Configuration for the estimation process.
///
/// Holds no database access; only the token secret shared with the backend.
#[derive(Debug, Clone, Parser)]
pub struct EstimationConfig {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3002")]
    pub bind: String,

    /// File holding the delegation token secret shared with the backend.
    #[arg(long, env = "TOKEN_SECRET_FILE")]
    pub token_secret_file: Option<PathBuf>,
}
