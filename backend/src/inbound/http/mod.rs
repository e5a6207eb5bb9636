//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod estimation;
pub mod session;
pub mod sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod text_blocks;
pub mod tickets;
pub mod token;

pub use error::ApiResult;
pub use state::HttpState;

use actix_web::web;

use crate::domain::Error;

/// JSON extractor configuration with the shared error schema.
///
/// Malformed bodies and unknown enum labels surface as `invalid_input`
/// instead of Actix's default plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| Error::invalid_input(err.to_string()).into())
}

/// Register the ticket system's endpoints under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api/v1")
            .service(sessions::login)
            .service(sessions::current_session)
            .service(sessions::logout)
            .service(token::issue_token)
            .service(tickets::list_tickets)
            .service(tickets::create_ticket)
            .service(tickets::update_ticket)
            .service(text_blocks::list_text_blocks)
            .service(text_blocks::append_text_block),
    );
}

/// Register the estimation process's endpoints under `/api/v1`.
///
/// Deliberately excludes everything session- or store-backed; the process
/// holds only the token-verification secret.
pub fn configure_estimation(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::scope("/api/v1").service(estimation::estimate_closing_time));
}
