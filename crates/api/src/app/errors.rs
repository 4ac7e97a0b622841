use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use facilityhub_admin::{AdminError, ValidationErrors};
use facilityhub_auth::AuthzError;
use facilityhub_core::DomainError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 422 with the per-field messages.
pub fn validation_error(errors: &ValidationErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": "validation_error",
            "errors": errors,
        })),
    )
        .into_response()
}

pub fn admin_error_to_response(err: AdminError) -> Response {
    match err {
        AdminError::Validation(errors) => validation_error(&errors),
        AdminError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        AdminError::Malformed(msg) => json_error(StatusCode::BAD_REQUEST, "malformed_payload", msg),
        AdminError::Domain(err) => domain_error_to_response(err),
    }
}

pub fn authz_error_to_response(err: AuthzError) -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}
