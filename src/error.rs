use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Database call exceeded {}ms", .0.as_millis())]
    Timeout(Duration),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorData {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Database(err) => tracing::error!(error = %err, "database error"),
            AppError::Timeout(limit) => {
                tracing::error!(limit_ms = %limit.as_millis(), "database deadline exceeded")
            }
            _ => tracing::debug!(status = %status, error = %self, "request rejected"),
        }

        let message = status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string();
        let error = match &self {
            AppError::Timeout(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        let body = ApiResponse {
            message,
            data: Some(ErrorData { error }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn assert_error(
        error: AppError,
        expected_status: StatusCode,
        expected_message: &str,
        expected_error: &str,
    ) {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], expected_message);
        assert_eq!(json["data"]["error"], expected_error);
    }

    #[tokio::test]
    async fn bad_request_maps_to_400() {
        assert_error(
            AppError::BadRequest("Invalid request payload".into()),
            StatusCode::BAD_REQUEST,
            "Bad Request",
            "Invalid request payload",
        )
        .await;
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        assert_error(
            AppError::NotFound("User not found".into()),
            StatusCode::NOT_FOUND,
            "Not Found",
            "User not found",
        )
        .await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401() {
        assert_error(
            AppError::Unauthorized("Invalid username or password".into()),
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Invalid username or password",
        )
        .await;
    }

    #[tokio::test]
    async fn database_error_maps_to_500_without_details() {
        assert_error(
            AppError::Database(sqlx::Error::PoolTimedOut),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Database error",
        )
        .await;
    }

    #[tokio::test]
    async fn timeout_maps_to_500() {
        assert_error(
            AppError::Timeout(Duration::from_secs(5)),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Database error",
        )
        .await;
    }
}
