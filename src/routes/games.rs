//! Game, team and user endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    dto::game::{
        CreateGameRequest, CreateTeamRequest, CreateUserRequest, CreatedUserResponse,
        GameDetailsResponse, GameSummary, RosterAddRequest, ScoreUpdateRequest, TeamDto,
        TimeoutRequest,
    },
    error::AppError,
    routes::AuthedUser,
    services::game_service,
    state::{SharedState, lifecycle::GameStatus},
};

/// Game, team and user routes. Mutations require a bearer token via the
/// [`AuthedUser`] extractor; reads are open.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/{game_id}", get(get_game).delete(cancel_game))
        .route("/api/games/{game_id}/start", post(start_game))
        .route("/api/games/{game_id}/finalize", post(finalize_game))
        .route("/api/games/{game_id}/timeout", post(set_timeout))
        .route("/api/games/{game_id}/score", post(update_score))
        .route("/api/games/{game_id}/roster", post(add_roster_player))
        .route("/api/teams", post(create_team))
        .route("/api/teams/{team_id}", get(get_team))
        .route("/api/users", post(create_user))
}

/// Query parameters for listing games.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListGamesQuery {
    /// Optional status filter: `scheduled`, `in_progress`, `completed` or `cancelled`.
    status: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameDetailsResponse),
        (status = 400, description = "Invalid teams or roster"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "games",
)]
pub(crate) async fn create_game(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameDetailsResponse>), AppError> {
    request.validate()?;
    let details = game_service::create_game(&state, user_id, request).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

#[utoipa::path(
    get,
    path = "/api/games",
    params(ListGamesQuery),
    responses(
        (status = 200, description = "Games, newest first", body = [GameSummary]),
        (status = 400, description = "Unknown status filter"),
    ),
    tag = "games",
)]
pub(crate) async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            GameStatus::from_wire(raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown status filter: {raw}")))?,
        ),
        None => None,
    };
    let games = game_service::list_games(&state, status).await?;
    Ok(Json(games))
}

#[utoipa::path(
    get,
    path = "/api/games/{game_id}",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game details", body = GameDetailsResponse),
        (status = 404, description = "Unknown game"),
    ),
    tag = "games",
)]
pub(crate) async fn get_game(
    State(state): State<SharedState>,
    Path(game_id): Path<i64>,
) -> Result<Json<GameDetailsResponse>, AppError> {
    let details = game_service::get_game(&state, game_id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/games/{game_id}/start",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game is now live", body = GameDetailsResponse),
        (status = 403, description = "Caller is not a game admin"),
        (status = 409, description = "Game is not startable"),
    ),
    tag = "games",
)]
pub(crate) async fn start_game(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Path(game_id): Path<i64>,
) -> Result<Json<GameDetailsResponse>, AppError> {
    game_service::start_game(&state, user_id, game_id).await?;
    Ok(Json(game_service::get_game(&state, game_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/games/{game_id}/finalize",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game finalized", body = GameDetailsResponse),
        (status = 403, description = "Caller is not a game admin"),
        (status = 409, description = "Game is not live"),
    ),
    tag = "games",
)]
pub(crate) async fn finalize_game(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Path(game_id): Path<i64>,
) -> Result<Json<GameDetailsResponse>, AppError> {
    game_service::finalize_game(&state, user_id, game_id).await?;
    Ok(Json(game_service::get_game(&state, game_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/games/{game_id}",
    params(("game_id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game cancelled", body = GameDetailsResponse),
        (status = 403, description = "Caller is not a game admin"),
        (status = 409, description = "Game already finished"),
    ),
    tag = "games",
)]
pub(crate) async fn cancel_game(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Path(game_id): Path<i64>,
) -> Result<Json<GameDetailsResponse>, AppError> {
    game_service::cancel_game(&state, user_id, game_id).await?;
    Ok(Json(game_service::get_game(&state, game_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/games/{game_id}/timeout",
    params(("game_id" = i64, Path, description = "Game identifier")),
    request_body = TimeoutRequest,
    responses(
        (status = 200, description = "Timeout state changed", body = GameDetailsResponse),
        (status = 409, description = "Game is not live"),
    ),
    tag = "games",
)]
pub(crate) async fn set_timeout(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Path(game_id): Path<i64>,
    Json(request): Json<TimeoutRequest>,
) -> Result<Json<GameDetailsResponse>, AppError> {
    game_service::set_timeout(&state, user_id, game_id, request.action).await?;
    Ok(Json(game_service::get_game(&state, game_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/games/{game_id}/score",
    params(("game_id" = i64, Path, description = "Game identifier")),
    request_body = ScoreUpdateRequest,
    responses(
        (status = 200, description = "Score updated", body = GameDetailsResponse),
        (status = 409, description = "Game not live or timeout active"),
    ),
    tag = "games",
)]
pub(crate) async fn update_score(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Path(game_id): Path<i64>,
    Json(request): Json<ScoreUpdateRequest>,
) -> Result<Json<GameDetailsResponse>, AppError> {
    game_service::update_score(&state, user_id, game_id, request).await?;
    Ok(Json(game_service::get_game(&state, game_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/games/{game_id}/roster",
    params(("game_id" = i64, Path, description = "Game identifier")),
    request_body = RosterAddRequest,
    responses(
        (status = 200, description = "Player added", body = GameDetailsResponse),
        (status = 400, description = "Unknown user or foreign team"),
        (status = 409, description = "Game already finished"),
    ),
    tag = "games",
)]
pub(crate) async fn add_roster_player(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Path(game_id): Path<i64>,
    Json(request): Json<RosterAddRequest>,
) -> Result<Json<GameDetailsResponse>, AppError> {
    request.validate()?;
    game_service::add_roster_player(&state, user_id, game_id, request).await?;
    Ok(Json(game_service::get_game(&state, game_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamDto),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "teams",
)]
pub(crate) async fn create_team(
    State(state): State<SharedState>,
    AuthedUser(user_id): AuthedUser,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamDto>), AppError> {
    request.validate()?;
    let team = game_service::create_team(&state, user_id, request).await?;
    Ok((StatusCode::CREATED, Json(team.into())))
}

#[utoipa::path(
    get,
    path = "/api/teams/{team_id}",
    params(("team_id" = i64, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Team", body = TeamDto),
        (status = 404, description = "Unknown team"),
    ),
    tag = "teams",
)]
pub(crate) async fn get_team(
    State(state): State<SharedState>,
    Path(team_id): Path<i64>,
) -> Result<Json<TeamDto>, AppError> {
    let team = game_service::get_team(&state, team_id).await?;
    Ok(Json(team.into()))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created with a bearer token", body = CreatedUserResponse),
        (status = 400, description = "Invalid username"),
    ),
    tag = "users",
)]
pub(crate) async fn create_user(
    State(state): State<SharedState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), AppError> {
    request.validate()?;
    let created = game_service::create_user(&state, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
