//! HTTP Error Handling
//!
//! 业务错误统一放进 `{errno, error, data}` 信封，HTTP 状态码保持 200

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ApplicationError, RepositoryError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const UNAUTHORIZED: i32 = 401;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::Unauthorized => errno::UNAUTHORIZED,
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::BadGateway(_) => errno::BAD_GATEWAY,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let msg = self.message().to_string();

        match &self {
            ApiError::Unauthorized => {
                tracing::warn!(errno, "Unauthorized request");
            }
            ApiError::NotFound(_) => {
                tracing::warn!(errno, error = %msg, "Resource not found");
            }
            ApiError::BadRequest(_) => {
                tracing::warn!(errno, error = %msg, "Bad request");
            }
            ApiError::Conflict(_) => {
                tracing::warn!(errno, error = %msg, "Resource conflict");
            }
            ApiError::BadGateway(_) => {
                tracing::error!(errno, error = %msg, "Upstream generation failed");
            }
            ApiError::Internal(_) => {
                tracing::error!(errno, error = %msg, "Internal server error");
            }
        }

        (StatusCode::OK, Json(ErrorResponse::new(errno, msg))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Duplicate(msg) => ApiError::Conflict(msg),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::Unauthorized => ApiError::Unauthorized,
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::InvalidState(msg) => ApiError::BadRequest(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            ApplicationError::GenerationFailed(msg) => ApiError::BadGateway(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::Unauthorized, errno::UNAUTHORIZED),
            (ApplicationError::not_found("Chapter", Uuid::nil()), errno::NOT_FOUND),
            (ApplicationError::validation("empty title"), errno::BAD_REQUEST),
            (ApplicationError::invalid_state("no summary"), errno::BAD_REQUEST),
            (ApplicationError::conflict("generating"), errno::CONFLICT),
            (
                ApplicationError::GenerationFailed("content generation failed".into()),
                errno::BAD_GATEWAY,
            ),
            (ApplicationError::RepositoryError("disk".into()), errno::INTERNAL_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).errno(), expected);
        }
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = ApiError::from(RepositoryError::Duplicate("chapter 1".into()));
        assert_eq!(err.errno(), errno::CONFLICT);
    }

    #[tokio::test]
    async fn test_error_envelope_keeps_http_ok() {
        let response = ApiError::Conflict("busy".into()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errno"], 409);
        assert_eq!(json["error"], "busy");
        assert!(json["data"].is_null());
    }
}
