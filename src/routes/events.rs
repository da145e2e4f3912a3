//! Ledger endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use validator::Validate;

use crate::{
    dto::game::{EventDto, GameEventRequest},
    error::AppError,
    routes::AuthedUser,
    services::{ledger, validation::ProposedEvent},
    state::SharedState,
};

/// Ledger routes. Writes require a bearer token via [`AuthedUser`]; the
/// ledger itself is readable by anyone.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/games/{game_id}/events",
            post(record_event).get(list_events),
        )
        .route(
            "/api/games/{game_id}/events/{event_id}",
            delete(delete_event),
        )
}

#[utoipa::path(
    post,
    path = "/api/games/{game_id}/events",
    params(("game_id" = i64, Path, description = "Game identifier")),
    request_body = GameEventRequest,
    responses(
        (status = 201, description = "Event accepted into the ledger", body = EventDto),
        (status = 400, description = "Event rejected by the validation gate"),
        (status = 404, description = "Unknown game"),
    ),
    tag = "events",
)]
pub(crate) async fn record_event(
    State(state): State<SharedState>,
    AuthedUser(_scorekeeper): AuthedUser,
    Path(game_id): Path<i64>,
    Json(request): Json<GameEventRequest>,
) -> Result<(StatusCode, Json<EventDto>), AppError> {
    request.validate()?;
    let event = ledger::append_event(
        &state,
        game_id,
        ProposedEvent {
            user_id: request.user_id,
            team_id: request.team_id,
            event_type: request.event_type,
            period: request.period,
            timestamp: request.timestamp,
            outcome: request.outcome,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(EventDto::from(&event))))
}

#[utoipa::path(
    get,
    path = "/api/games/{game_id}/events",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Ledger in game-clock order", body = [EventDto]),
        (status = 404, description = "Unknown game"),
    ),
    tag = "events",
)]
pub(crate) async fn list_events(
    State(state): State<SharedState>,
    Path(game_id): Path<i64>,
) -> Result<Json<Vec<EventDto>>, AppError> {
    let events = ledger::list_events(&state, game_id).await?;
    Ok(Json(events.iter().map(EventDto::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/api/games/{game_id}/events/{event_id}",
    params(
        ("game_id" = i64, Path, description = "Game identifier"),
        ("event_id" = i64, Path, description = "Event identifier"),
    ),
    responses(
        (status = 204, description = "Event removed"),
        (status = 403, description = "Caller is not a game admin"),
        (status = 404, description = "Unknown game or event"),
    ),
    tag = "events",
)]
pub(crate) async fn delete_event(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Path((game_id, event_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    ledger::delete_event(&state, user_id, game_id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
