//! Server assembly: secrets, middleware, and the two HTTP processes.

pub mod config;

use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};

use crate::domain::auth::AuthService;
use crate::domain::ticket_service::TicketService;
use crate::domain::token::TokenSigner;
use crate::domain::user::Role;
use crate::inbound::http::{self, HttpState};
use crate::outbound::persistence::{
    run_migrations, DbPool, NewUserAccount, PoolConfig, SqliteCredentialStore,
    SqliteTicketRepository,
};

pub use config::{EstimationConfig, ServerConfig};

/// Build the session middleware shared by the server and integration tests.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Load the session cookie key, generating an ephemeral one if unset.
pub fn load_session_key(path: Option<&Path>) -> io::Result<Key> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            Ok(Key::derive_from(&bytes))
        }
        None => {
            warn!("no session key file configured; sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

/// Load the delegation token secret shared with the estimation process.
pub fn load_token_secret(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            warn!("no token secret file configured; tokens will not verify across processes");
            Ok(rand::random::<[u8; 32]>().to_vec())
        }
    }
}

fn open_store(database_url: &str) -> io::Result<DbPool> {
    let pool = DbPool::new(&PoolConfig::new(database_url)).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;
    Ok(pool)
}

fn build_state(pool: DbPool, signer: TokenSigner) -> HttpState {
    let credentials = Arc::new(SqliteCredentialStore::new(pool.clone()));
    let tickets = Arc::new(SqliteTicketRepository::new(pool));
    HttpState::new(
        AuthService::new(credentials),
        TicketService::new(tickets),
        signer,
    )
}

/// Run the ticket system backend until shutdown.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let pool = open_store(&config.database_url)?;
    let key = load_session_key(config.session_key_file.as_deref())?;
    let secret = load_token_secret(config.token_secret_file.as_deref())?;
    let state = build_state(pool, TokenSigner::new(secret));
    let cookie_secure = !config.insecure_cookies;

    info!(bind = %config.bind, database = %config.database_url, "ticket backend listening");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(session_middleware(key.clone(), cookie_secure))
            .configure(http::configure)
    })
    .bind(config.bind.as_str())?
    .run()
    .await
}

/// Run the estimation process until shutdown.
///
/// Deliberately opens no database: requests are authorised purely by
/// verifying the delegation token's signature and expiry.
pub async fn run_estimation(config: EstimationConfig) -> io::Result<()> {
    let secret = load_token_secret(config.token_secret_file.as_deref())?;
    let signer = TokenSigner::new(secret);

    info!(bind = %config.bind, "estimation service listening");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(signer.clone()))
            .configure(http::configure_estimation)
    })
    .bind(config.bind.as_str())?
    .run()
    .await
}

/// Provision a user account from the command line.
///
/// Accounts are never created through the public HTTP surface; this is the
/// administrative entry point for both roles.
pub async fn provision_account(
    database_url: &str,
    email: String,
    username: String,
    role: Role,
    password: String,
) -> io::Result<()> {
    let pool = open_store(database_url)?;
    let store = SqliteCredentialStore::new(pool);
    let user = store
        .provision(NewUserAccount {
            email,
            username,
            role,
            password,
        })
        .await
        .map_err(io::Error::other)?;
    info!(user = %user.id(), role = user.role().as_str(), "account provisioned");
    Ok(())
}
