//! Conversion of `AppError` into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::domain::{AppError, DatabaseError, ErrorDetail, ErrorResponse};

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Client-facing view of an error: status, `type` tag and message.
///
/// Server errors never carry their detail; it is logged instead.
pub(crate) fn public_error(err: &AppError) -> (StatusCode, &'static str, String) {
    match err {
        AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error", err.to_string()),
        AppError::Authentication(message) => (
            StatusCode::UNAUTHORIZED,
            "authentication_error",
            message.clone(),
        ),
        AppError::Authorization(message) => {
            (StatusCode::FORBIDDEN, "authorization_error", message.clone())
        }
        AppError::Database(DatabaseError::NotFound(message)) => {
            (StatusCode::NOT_FOUND, "not_found", message.clone())
        }
        AppError::Database(DatabaseError::Duplicate(message)) => {
            (StatusCode::CONFLICT, "conflict", message.clone())
        }
        AppError::Database(DatabaseError::ForeignKey(_)) => (
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Referenced record does not exist or is still in use".to_string(),
        ),
        AppError::Database(_)
        | AppError::ExternalService(_)
        | AppError::Config(_)
        | AppError::Serialization(_)
        | AppError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = public_error(&self);

        if status.is_server_error() {
            error!(error = %self, error_type = %error_type, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
