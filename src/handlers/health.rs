use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy"; the process answering is the signal.
    #[schema(example = "healthy")]
    pub status: String,
    /// RFC 3339 timestamp of the check
    pub timestamp: String,
}

/// Health check endpoint. Answers independently of store state.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Response {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
    .into_response()
}
