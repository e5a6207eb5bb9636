//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::test;
use serde_json::json;

use crate::domain::auth::AuthService;
use crate::domain::ticket_service::TicketService;
use crate::domain::token::TokenSigner;
use crate::outbound::persistence::test_support::{seeded_pool, SEED_PASSWORD};
use crate::outbound::persistence::{SqliteCredentialStore, SqliteTicketRepository};

use super::state::HttpState;

/// Token-signing secret shared by handler tests.
pub const TEST_TOKEN_SECRET: [u8; 32] = *b"0123456789abcdef0123456789abcdef";

/// Handler state over a seeded in-memory store.
///
/// Seeds `alice` and `bob` (normal) and `root` (admin), all with
/// [`SEED_PASSWORD`].
pub fn seeded_state() -> HttpState {
    let store = seeded_pool();
    let credentials = Arc::new(SqliteCredentialStore::new(store.pool.clone()));
    let tickets = Arc::new(SqliteTicketRepository::new(store.pool));
    HttpState::new(
        AuthService::new(credentials),
        TicketService::new(tickets),
        TokenSigner::new(TEST_TOKEN_SECRET),
    )
}

/// Log a seeded user in and return the session cookie.
pub async fn login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
) -> actix_web::cookie::Cookie<'static> {
    let req = test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({ "email": email, "password": SEED_PASSWORD }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "seeded login must succeed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
