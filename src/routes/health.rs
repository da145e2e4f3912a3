//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, state::SharedState};

/// Health route.
pub fn router() -> Router<SharedState> {
    Router::new().route("/healthcheck", get(healthcheck))
}

/// Health report body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` when the response is produced.
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/healthcheck",
    responses(
        (status = 200, description = "Backend and storage are reachable", body = HealthResponse),
        (status = 503, description = "Storage is unavailable"),
    ),
    tag = "health",
)]
pub(crate) async fn healthcheck(State(state): State<SharedState>) -> Result<Json<HealthResponse>, AppError> {
    state
        .store()
        .health_check()
        .await
        .map_err(|err| AppError::ServiceUnavailable(err.to_string()))?;
    Ok(Json(HealthResponse { status: "ok" }))
}
