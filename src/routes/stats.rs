//! Statistics endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::{
        broadcast::ScoreboardUpdate,
        stats::{CareerStatsDto, GameStatsSummaryDto, PlayerGameStatsDto, PlayerStatsDto},
    },
    error::AppError,
    services::{game_service, stats},
    state::SharedState,
};

/// Stats routes, all public reads.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/games/{game_id}/stats", get(game_stats))
        .route("/api/games/{game_id}/stats/summary", get(game_summary))
        .route(
            "/api/games/{game_id}/players/{player_id}/stats",
            get(live_player_stats),
        )
        .route("/api/players/{player_id}/stats", get(player_game_stats))
        .route("/api/players/{player_id}/stats/career", get(career_stats))
}

#[utoipa::path(
    get,
    path = "/api/games/{game_id}/players/{player_id}/stats",
    params(
        ("game_id" = i64, Path, description = "Game identifier"),
        ("player_id" = i64, Path, description = "Player's user identifier"),
    ),
    responses(
        (status = 200, description = "Live box-score line", body = PlayerStatsDto),
        (status = 404, description = "Unknown game or player not rostered"),
    ),
    tag = "stats",
)]
pub(crate) async fn live_player_stats(
    State(state): State<SharedState>,
    Path((game_id, player_id)): Path<(i64, i64)>,
) -> Result<Json<PlayerStatsDto>, AppError> {
    let line = stats::live_player_stats(&state, game_id, player_id).await?;
    Ok(Json(line))
}

#[utoipa::path(
    get,
    path = "/api/games/{game_id}/stats",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Live box score for both teams", body = ScoreboardUpdate),
        (status = 404, description = "Unknown game"),
    ),
    tag = "stats",
)]
pub(crate) async fn game_stats(
    State(state): State<SharedState>,
    Path(game_id): Path<i64>,
) -> Result<Json<ScoreboardUpdate>, AppError> {
    let update = game_service::scoreboard(&state, game_id).await?;
    Ok(Json(update))
}

#[utoipa::path(
    get,
    path = "/api/games/{game_id}/stats/summary",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Top scorers and foul leaders", body = GameStatsSummaryDto),
        (status = 404, description = "Unknown game"),
    ),
    tag = "stats",
)]
pub(crate) async fn game_summary(
    State(state): State<SharedState>,
    Path(game_id): Path<i64>,
) -> Result<Json<GameStatsSummaryDto>, AppError> {
    let summary = stats::game_summary(&state, game_id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/players/{player_id}/stats",
    params(("player_id" = i64, Path, description = "Player's user identifier")),
    responses(
        (status = 200, description = "Finalized per-game snapshots", body = [PlayerGameStatsDto]),
        (status = 404, description = "Unknown player"),
    ),
    tag = "stats",
)]
pub(crate) async fn player_game_stats(
    State(state): State<SharedState>,
    Path(player_id): Path<i64>,
) -> Result<Json<Vec<PlayerGameStatsDto>>, AppError> {
    let snapshots = stats::player_game_stats(&state, player_id).await?;
    Ok(Json(snapshots))
}

#[utoipa::path(
    get,
    path = "/api/players/{player_id}/stats/career",
    params(("player_id" = i64, Path, description = "Player's user identifier")),
    responses(
        (status = 200, description = "Career aggregate", body = CareerStatsDto),
        (status = 404, description = "Unknown player"),
    ),
    tag = "stats",
)]
pub(crate) async fn career_stats(
    State(state): State<SharedState>,
    Path(player_id): Path<i64>,
) -> Result<Json<CareerStatsDto>, AppError> {
    let career = stats::career(&state, player_id).await?;
    Ok(Json(career))
}
