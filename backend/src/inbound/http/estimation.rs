//! Closing-time estimation endpoint, served by the estimation process.
//!
//! ```text
//! POST /api/v1/estimation   Authorization: Bearer <token>
//!                           {"title":"Printer jam","category":"maintenance"}
//! ```
//!
//! Callers authenticate with a delegation token, never a cookie; the process
//! verifies it statelessly and reads the role from the claims.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{post, web, HttpRequest};
use chrono::Utc;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::domain::estimation::{estimate, Estimate, TicketSummary};
use crate::domain::ticket::{Category, TicketTitle};
use crate::domain::token::TokenSigner;
use crate::domain::Error;

use super::tickets::map_validation_error;
use super::ApiResult;

/// Request body for `POST /api/v1/estimation`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationRequest {
    pub title: String,
    pub category: Category,
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| Error::unauthenticated("missing bearer token"))
}

/// Estimate the closing time for a ticket summary.
///
/// The token is verified before the body is even parsed; an unauthenticated
/// caller learns nothing about payload validation.
#[post("/estimation")]
pub async fn estimate_closing_time(
    signer: web::Data<TokenSigner>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<Estimate>> {
    let claims = signer.verify(bearer_token(&req)?, Utc::now())?;
    let payload: EstimationRequest =
        serde_json::from_slice(&body).map_err(|err| Error::invalid_input(err.to_string()))?;
    let summary = TicketSummary {
        title: TicketTitle::new(payload.title).map_err(map_validation_error)?,
        category: payload.category,
    };

    let mut rng = SmallRng::from_entropy();
    Ok(web::Json(estimate(&summary, claims.role, &mut rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::Duration;
    use serde_json::{json, Value};

    use crate::domain::user::{Role, UserId};
    use crate::inbound::http::test_utils::TEST_TOKEN_SECRET;

    macro_rules! estimation_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(TokenSigner::new(TEST_TOKEN_SECRET)))
                    .configure(crate::inbound::http::configure_estimation),
            )
            .await
        };
    }

    fn fresh_token(role: Role) -> String {
        TokenSigner::new(TEST_TOKEN_SECRET).issue(UserId::new(1), role, Utc::now())
    }

    fn request_body() -> Value {
        json!({ "title": "Printer jam", "category": "maintenance" })
    }

    #[actix_web::test]
    async fn missing_bearer_token_is_unauthenticated() {
        let app = estimation_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/estimation")
                .set_json(request_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn missing_token_wins_over_a_malformed_body() {
        let app = estimation_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/estimation")
                .set_json(json!({ "category": "gardening" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthenticated");
    }

    #[actix_web::test]
    async fn authenticated_unknown_category_is_invalid_input() {
        let app = estimation_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/estimation")
                .insert_header((AUTHORIZATION, format!("Bearer {}", fresh_token(Role::Normal))))
                .set_json(json!({ "title": "Printer jam", "category": "gardening" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_input");
    }

    #[actix_web::test]
    async fn expired_token_is_rejected() {
        let app = estimation_app!();
        let expired = TokenSigner::new(TEST_TOKEN_SECRET).issue(
            UserId::new(1),
            Role::Normal,
            Utc::now() - Duration::seconds(301),
        );
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/estimation")
                .insert_header((AUTHORIZATION, format!("Bearer {expired}")))
                .set_json(request_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthenticated");
    }

    #[actix_web::test]
    async fn normal_tokens_get_whole_day_estimates() {
        let app = estimation_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/estimation")
                .insert_header((AUTHORIZATION, format!("Bearer {}", fresh_token(Role::Normal))))
                .set_json(request_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let estimation = body["estimation"].as_str().expect("estimation string");
        assert!(estimation.ends_with("days"));
    }

    #[actix_web::test]
    async fn admin_tokens_get_residual_hours() {
        let app = estimation_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/estimation")
                .insert_header((AUTHORIZATION, format!("Bearer {}", fresh_token(Role::Admin))))
                .set_json(request_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let estimation = body["estimation"].as_str().expect("estimation string");
        assert!(estimation.contains("days and"));
        assert!(estimation.ends_with("hours"));
    }
}
