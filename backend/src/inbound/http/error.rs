//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent JSON responses and status codes.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidCredentials | ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::InvalidState => StatusCode::BAD_REQUEST,
        ErrorCode::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_storage(err: &Error) -> Error {
    if matches!(err.code(), ErrorCode::StorageFailure) {
        error!(message = err.message(), "storage failure");
        Error::storage("internal server error")
    } else {
        err.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(redact_if_storage(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(Error::invalid_credentials("incorrect email or password"), StatusCode::UNAUTHORIZED)]
    #[case(Error::unauthenticated("login required"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("admin only"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("ticket 9 not found"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("id mismatch"), StatusCode::CONFLICT)]
    #[case(Error::invalid_input("title too long"), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(Error::invalid_state("ticket is closed"), StatusCode::BAD_REQUEST)]
    #[case(Error::storage("disk on fire"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_stable_statuses(#[case] err: Error, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[actix_web::test]
    async fn storage_failures_are_redacted() {
        let response = Error::storage("could not open tickets.db").error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["code"], "storage_failure");
        assert_eq!(value["message"], "internal server error");
    }

    #[actix_web::test]
    async fn client_errors_keep_their_message_and_details() {
        let response = Error::invalid_input("title must be at most 80 characters")
            .with_details(serde_json::json!({ "field": "title" }))
            .error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["code"], "invalid_input");
        assert_eq!(value["details"]["field"], "title");
    }
}
