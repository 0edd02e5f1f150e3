use axum::{extract::State, response::Response};

use super::common::success_response;
use crate::{errors::ServiceError, AppState};

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Fresh counters", body = crate::services::stats::StatsResponse),
        (status = 500, description = "Store failure", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let stats = state.services.stats.get_stats().await?;
    Ok(success_response(stats))
}
