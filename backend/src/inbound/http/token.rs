//! Delegation token endpoint.
//!
//! ```text
//! GET /api/v1/auth-token
//! ```
//!
//! Exchanges an active cookie session for a short-lived signed token the
//! estimation process can verify without access to the session store.

use actix_web::{get, web};
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::Role;

use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// Response body for `GET /api/v1/auth-token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub role: Role,
}

/// Mint a delegation token for the logged-in user.
#[get("/auth-token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<TokenResponse>> {
    let user = state.session_user(&session).await?;
    let token = state.signer().issue(user.id(), user.role(), Utc::now());
    Ok(web::Json(TokenResponse {
        token,
        role: user.role(),
    }))
}
