//! Session endpoints.
//!
//! ```text
//! POST   /api/v1/sessions          {"email":"a@example.com","password":"pw"}
//! GET    /api/v1/sessions/current
//! DELETE /api/v1/sessions/current
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::auth::{LoginCredentials, LoginValidationError};
use crate::domain::user::UserProfile;
use crate::domain::Error;

use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// Login request body for `POST /api/v1/sessions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_input(err.to_string()).with_details(json!({ "field": field }))
}

/// Authenticate and establish a cookie session.
///
/// Returns the minimal public profile; password material never leaves the
/// credential store.
#[post("/sessions")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(payload.email, payload.password)
        .map_err(map_login_validation_error)?;
    let user = state.auth().authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    tracing::info!(user = %user.id(), "session established");
    Ok(web::Json(UserProfile::from(&user)))
}

/// Profile of the logged-in user, re-validated against the store.
#[get("/sessions/current")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let user = state.session_user(&session).await?;
    Ok(web::Json(UserProfile::from(&user)))
}

/// Drop the session. Idempotent: logging out twice is not an error.
#[delete("/sessions/current")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
