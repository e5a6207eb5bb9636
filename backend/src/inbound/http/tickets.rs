//! Ticket endpoints.
//!
//! ```text
//! GET  /api/v1/tickets
//! POST /api/v1/tickets          {"title":"...","category":"inquiry","description":"..."}
//! PUT  /api/v1/tickets/{id}     {"id":1,"state":"closed","category":"payment"}
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ticket::{
    BlockDescription, Category, TicketId, TicketOverview, TicketState, TicketTitle,
    TicketValidationError,
};
use crate::domain::ticket_service::{CreateTicket, UpdateTicket};
use crate::domain::Error;

use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

pub(crate) fn map_validation_error(err: TicketValidationError) -> Error {
    let field = match err {
        TicketValidationError::EmptyTitle | TicketValidationError::TitleTooLong { .. } => "title",
        TicketValidationError::EmptyDescription
        | TicketValidationError::DescriptionTooLong { .. } => "description",
    };
    Error::invalid_input(err.to_string()).with_details(json!({ "field": field }))
}

/// One row of the anonymous ticket listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListEntry {
    pub id: TicketId,
    pub title: String,
    pub category: Category,
    pub state: TicketState,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
}

impl From<TicketOverview> for TicketListEntry {
    fn from(overview: TicketOverview) -> Self {
        Self {
            id: overview.ticket.id,
            title: overview.ticket.title.to_string(),
            category: overview.ticket.category,
            state: overview.ticket.state,
            owner_username: overview.owner_username,
            created_at: overview.ticket.created_at,
        }
    }
}

/// All tickets, newest first. Readable without a session.
#[get("/tickets")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TicketListEntry>>> {
    let overviews = state.tickets().list_tickets().await?;
    Ok(web::Json(
        overviews.into_iter().map(TicketListEntry::from).collect(),
    ))
}

/// Request body for `POST /api/v1/tickets`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: String,
    pub category: Category,
    pub description: String,
}

/// Id of a freshly created resource.
#[derive(Debug, Serialize)]
pub struct CreatedResponse<I: Serialize> {
    pub id: I,
}

/// Open a new ticket together with its mandatory first text block.
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let caller = state.session_user(&session).await?;
    let payload = payload.into_inner();
    let request = CreateTicket {
        title: TicketTitle::new(payload.title).map_err(map_validation_error)?,
        category: payload.category,
        initial_description: BlockDescription::new(payload.description)
            .map_err(map_validation_error)?,
    };

    let id = state.tickets().create_ticket(&caller, request).await?;
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// Request body for `PUT /api/v1/tickets/{id}`.
///
/// All fields are optional; the `id`, when present, must match the path.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub id: Option<TicketId>,
    pub state: Option<TicketState>,
    pub category: Option<Category>,
}

/// Change a ticket's state and/or category under the lifecycle rules.
#[put("/tickets/{id}")]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let caller = state.session_user(&session).await?;
    let payload = payload.into_inner();
    let request = UpdateTicket {
        body_id: payload.id,
        state: payload.state,
        category: payload.category,
    };

    state
        .tickets()
        .update_ticket(&caller, TicketId::new(path.into_inner()), request)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::inbound::http::test_utils::{login, seeded_state, test_session_middleware};

    macro_rules! ticket_app {
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

    fn printer_jam() -> Value {
        json!({
            "title": "Printer jam",
            "category": "maintenance",
            "description": "Paper stuck in tray two"
        })
    }

    #[actix_web::test]
    async fn listing_is_open_to_anonymous_callers() {
        let app = ticket_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/tickets").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn creating_requires_a_session() {
        let app = ticket_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/tickets")
                .set_json(printer_jam())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn created_ticket_appears_in_the_listing() {
        let app = ticket_app!();
        let cookie = login(&app, "alice@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie)
                .set_json(printer_jam())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;
        assert!(created["id"].is_i64());

        let list = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/tickets").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(list).await;
        assert_eq!(body[0]["title"], "Printer jam");
        assert_eq!(body[0]["state"], "open");
        assert_eq!(body[0]["ownerUsername"], "alice");
    }

    #[actix_web::test]
    async fn oversized_title_is_invalid_input() {
        let app = ticket_app!();
        let cookie = login(&app, "alice@example.com").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie)
                .set_json(json!({
                    "title": "t".repeat(81),
                    "category": "inquiry",
                    "description": "too long a title"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_input");
        assert_eq!(body["details"]["field"], "title");
    }

    #[actix_web::test]
    async fn unknown_category_is_rejected_at_the_boundary() {
        let app = ticket_app!();
        let cookie = login(&app, "alice@example.com").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie)
                .set_json(json!({
                    "title": "Printer jam",
                    "category": "gardening",
                    "description": "not a real category"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_input");
    }

    #[actix_web::test]
    async fn mismatched_body_id_conflicts_before_touching_the_store() {
        let app = ticket_app!();
        let cookie = login(&app, "alice@example.com").await;
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/tickets/1")
                .cookie(cookie)
                .set_json(json!({ "id": 2, "state": "closed" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn owner_can_close_but_not_reopen() {
        let app = ticket_app!();
        let cookie = login(&app, "alice@example.com").await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie.clone())
                .set_json(printer_jam())
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(created).await;
        let uri = format!("/api/v1/tickets/{}", created["id"]);

        let close = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .cookie(cookie.clone())
                .set_json(json!({ "state": "closed" }))
                .to_request(),
        )
        .await;
        assert_eq!(close.status(), StatusCode::NO_CONTENT);

        let reopen = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .cookie(cookie)
                .set_json(json!({ "state": "open" }))
                .to_request(),
        )
        .await;
        assert_eq!(reopen.status(), StatusCode::FORBIDDEN);

        let admin_cookie = login(&app, "root@example.com").await;
        let admin_reopen = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .cookie(admin_cookie)
                .set_json(json!({ "state": "open" }))
                .to_request(),
        )
        .await;
        assert_eq!(admin_reopen.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn updating_a_missing_ticket_is_not_found() {
        let app = ticket_app!();
        let cookie = login(&app, "alice@example.com").await;
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/tickets/9000")
                .cookie(cookie)
                .set_json(json!({ "state": "closed" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
