use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbErr;
use thiserror::Error;
use utils::response::ApiResponse;

const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Failures that leave the handler through the HTTP status line. Validation
/// and lookup outcomes never use this type; they are 200 responses carrying
/// an `error` key.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        // Server-side detail stays in the logs.
        let error_message = match &self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Database(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
