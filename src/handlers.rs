pub mod auth_handlers;
pub mod expense_handlers;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::ValidationError;

/// Error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "invalid_title",
    "message": "Title must be at least 3 characters"
}))]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(ErrorResponse::new(error, message))).into_response()
}

pub(crate) fn validation_response(err: &ValidationError) -> Response {
    error_response(StatusCode::BAD_REQUEST, err.code(), &err.to_string())
}

/// Undecodable bodies are reported the same way as field validation failures
pub(crate) fn json_rejection_response(rejection: JsonRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_error",
        &rejection.body_text(),
    )
}

pub(crate) fn query_rejection_response(rejection: QueryRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_error",
        &rejection.body_text(),
    )
}

/// Fixed 500 body; the cause is only logged
pub(crate) fn internal_error_response(detail: &str) -> Response {
    tracing::error!(error = %detail, "request failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Internal server error",
    )
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "health"
)]
pub async fn health_check() -> &'static str {
    "OK"
}
