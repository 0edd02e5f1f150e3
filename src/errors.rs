use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"error": "Material not found"}))]
pub struct ErrorResponse {
    /// Human-readable error description
    #[schema(example = "Material not found")]
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Maps a failed insert to `Conflict` when the store rejected it over a
    /// uniqueness constraint, preserving any other database error as-is.
    pub fn from_insert_err(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ServiceError::Conflict(conflict_message.to_string())
            }
            _ => ServiceError::DatabaseError(err),
        }
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    ///
    /// Uniqueness conflicts answer 400 rather than 409; the admin frontend
    /// treats every 4xx other than 404 as a form-level validation failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal admin tool: store errors surface their message to the
        // client instead of a generic placeholder.
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn error_body_is_flat_error_object() {
        let response = ServiceError::NotFound("Order not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.error, "Order not found");
    }

    #[test]
    fn non_unique_insert_error_stays_database_error() {
        let err = ServiceError::from_insert_err(DbErr::Custom("boom".into()), "duplicate");
        assert!(matches!(err, ServiceError::DatabaseError(_)));
    }
}
