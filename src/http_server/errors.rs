//! # API Errors
//!
//! Every failed request answers `{success: false, message, code}` with the
//! matching HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::observability::{log_event_with_fields, Event};
use crate::records::{RecordError, StoreError};

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("{0}")]
    Validation(#[from] RecordError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unknown data source: {0}")]
    UnknownSource(String),

    // ==================
    // Auth Errors
    // ==================
    #[error("{0}")]
    Auth(#[from] AuthError),

    // ==================
    // Store Errors
    // ==================
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            ApiError::Validation(e) => e.status_code(),
            ApiError::BadRequest(_) => 400,
            ApiError::UnknownSource(_) => 404,
            ApiError::Auth(e) => e.status_code(),
            ApiError::Store(e) => e.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            ApiError::Validation(_) => {
                log_event_with_fields(Event::RecordRejected, &[("reason", message.as_str())]);
            }
            ApiError::Store(_) if status.is_server_error() => {
                log_event_with_fields(Event::StoreFailure, &[("error", message.as_str())]);
            }
            _ => {}
        }

        let body = ErrorResponse {
            success: false,
            message,
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(RecordError::MissingField("crop")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::NotFound(Uuid::new_v4())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::LockPoisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::UsernameTaken).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_message_is_inner_message() {
        let err = ApiError::from(RecordError::MissingField("region"));
        assert_eq!(err.to_string(), "Missing required field: region");
    }

    #[tokio::test]
    async fn test_response_body() {
        let response = ApiError::from(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Incorrect username or password");
        assert_eq!(json["code"], 401);
    }
}
