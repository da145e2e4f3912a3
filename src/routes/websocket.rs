//! Spectator WebSocket and room-presence endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, WebSocketUpgrade},
    response::Response,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    services::websocket_service,
    state::SharedState,
};

/// WebSocket and presence routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/ws/games/{game_id}", get(spectate))
        .route("/api/games/{game_id}/spectators", get(spectators))
        .route("/api/active-games", get(active_games))
}

/// Query parameters for the spectator socket.
///
/// Browsers cannot set headers on WebSocket upgrades, so the token travels in
/// the query string here.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SpectateQuery {
    /// Bearer token.
    token: String,
}

#[utoipa::path(
    get,
    path = "/ws/games/{game_id}",
    params(
        ("game_id" = i64, Path, description = "Game identifier"),
        SpectateQuery,
    ),
    responses((status = 101, description = "Switching to the spectator protocol")),
    tag = "realtime",
)]
pub(crate) async fn spectate(
    State(state): State<SharedState>,
    Path(game_id): Path<i64>,
    Query(query): Query<SpectateQuery>,
    upgrade: WebSocketUpgrade,
) -> Response {
    upgrade.on_upgrade(move |socket| {
        websocket_service::handle_socket(state, socket, game_id, query.token)
    })
}

/// Spectator presence for one game room.
#[derive(Debug, Serialize, ToSchema)]
pub struct SpectatorsResponse {
    /// Game the room serves.
    pub game_id: i64,
    /// Number of attached spectators.
    pub count: usize,
    /// Display handles of attached spectators.
    pub usernames: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/games/{game_id}/spectators",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses((status = 200, description = "Current room presence", body = SpectatorsResponse)),
    tag = "realtime",
)]
pub(crate) async fn spectators(
    State(state): State<SharedState>,
    Path(game_id): Path<i64>,
) -> Result<Json<SpectatorsResponse>, AppError> {
    let (count, usernames) = state
        .rooms()
        .get(game_id)
        .map(|room| (room.spectator_count(), room.spectator_names()))
        .unwrap_or_default();
    Ok(Json(SpectatorsResponse {
        game_id,
        count,
        usernames,
    }))
}

/// One entry in the active-games listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveGameEntry {
    /// Game with at least one spectator.
    pub game_id: i64,
    /// Number of attached spectators.
    pub spectators: usize,
}

#[utoipa::path(
    get,
    path = "/api/active-games",
    responses((status = 200, description = "Games with spectators", body = [ActiveGameEntry])),
    tag = "realtime",
)]
pub(crate) async fn active_games(State(state): State<SharedState>) -> Json<Vec<ActiveGameEntry>> {
    let mut entries: Vec<ActiveGameEntry> = state
        .rooms()
        .active_games()
        .into_iter()
        .map(|(game_id, spectators)| ActiveGameEntry {
            game_id,
            spectators,
        })
        .collect();
    entries.sort_by_key(|entry| entry.game_id);
    Json(entries)
}
