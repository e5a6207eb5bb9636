//! Text block endpoints.
//!
//! ```text
//! GET  /api/v1/tickets/{id}/text-blocks
//! POST /api/v1/tickets/{id}/text-blocks   {"description":"..."}
//! ```

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ticket::{BlockDescription, TextBlockEntry, TextBlockId, TicketId};

use super::session::SessionContext;
use super::state::HttpState;
use super::tickets::{map_validation_error, CreatedResponse};
use super::ApiResult;

/// One text block in a ticket's history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlockDto {
    pub id: TextBlockId,
    pub description: String,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
}

impl From<TextBlockEntry> for TextBlockDto {
    fn from(entry: TextBlockEntry) -> Self {
        Self {
            id: entry.block.id,
            description: String::from(entry.block.description),
            author_username: entry.author_username,
            created_at: entry.block.created_at,
        }
    }
}

/// A ticket's text blocks, oldest first. Requires a session.
#[get("/tickets/{id}/text-blocks")]
pub async fn list_text_blocks(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<TextBlockDto>>> {
    state.session_user(&session).await?;
    let blocks = state
        .tickets()
        .list_text_blocks(TicketId::new(path.into_inner()))
        .await?;
    Ok(web::Json(blocks.into_iter().map(TextBlockDto::from).collect()))
}

/// Request body for `POST /api/v1/tickets/{id}/text-blocks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendTextBlockRequest {
    pub description: String,
}

/// Append a text block to an open ticket.
#[post("/tickets/{id}/text-blocks")]
pub async fn append_text_block(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<AppendTextBlockRequest>,
) -> ApiResult<HttpResponse> {
    let caller = state.session_user(&session).await?;
    let description =
        BlockDescription::new(payload.into_inner().description).map_err(map_validation_error)?;

    let id = state
        .tickets()
        .append_text_block(&caller, TicketId::new(path.into_inner()), description)
        .await?;
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::inbound::http::test_utils::{login, seeded_state, test_session_middleware};

    macro_rules! block_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(seeded_state()))
                    .wrap(test_session_middleware())
                    .configure(crate::inbound::http::configure),
            )
            .await
        };
    }

    async fn create_ticket(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
    ) -> i64 {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie.clone())
                .set_json(json!({
                    "title": "Printer jam",
                    "category": "maintenance",
                    "description": "Paper stuck in tray two"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        body["id"].as_i64().expect("numeric ticket id")
    }

    #[actix_web::test]
    async fn history_requires_a_session() {
        let app = block_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/tickets/1/text-blocks")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn blocks_accumulate_oldest_first_with_author_names() {
        let app = block_app!();
        let alice = login(&app, "alice@example.com").await;
        let bob = login(&app, "bob@example.com").await;
        let id = create_ticket(&app, &alice).await;
        let uri = format!("/api/v1/tickets/{id}/text-blocks");

        let append = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .cookie(bob.clone())
                .set_json(json!({ "description": "Tried turning it off and on" }))
                .to_request(),
        )
        .await;
        assert_eq!(append.status(), StatusCode::CREATED);

        let list = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&uri)
                .cookie(bob)
                .to_request(),
        )
        .await;
        assert_eq!(list.status(), StatusCode::OK);
        let body: Value = test::read_body_json(list).await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["description"], "Paper stuck in tray two");
        assert_eq!(body[0]["authorUsername"], "alice");
        assert_eq!(body[1]["authorUsername"], "bob");
    }

    #[actix_web::test]
    async fn closed_tickets_reject_appends() {
        let app = block_app!();
        let alice = login(&app, "alice@example.com").await;
        let id = create_ticket(&app, &alice).await;

        let close = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/tickets/{id}"))
                .cookie(alice.clone())
                .set_json(json!({ "state": "closed" }))
                .to_request(),
        )
        .await;
        assert_eq!(close.status(), StatusCode::NO_CONTENT);

        let append = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/tickets/{id}/text-blocks"))
                .cookie(alice)
                .set_json(json!({ "description": "one more thing" }))
                .to_request(),
        )
        .await;
        assert_eq!(append.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(append).await;
        assert_eq!(body["code"], "invalid_state");
    }

    #[actix_web::test]
    async fn missing_ticket_history_is_not_found() {
        let app = block_app!();
        let alice = login(&app, "alice@example.com").await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/tickets/9000/text-blocks")
                .cookie(alice)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
