//! Game lifecycle, roster and score operations.

use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::info;

use crate::{
    dao::models::{GameRecord, NewGame, RosterEntry, TeamRecord},
    dto::{
        broadcast::ScoreboardUpdate,
        game::{
            CreateGameRequest, CreateTeamRequest, CreateUserRequest, CreatedUserResponse,
            GameDetailsResponse, GameSummary, RosterAddRequest, RosterPlayerInput,
            ScoreUpdateRequest, TimeoutAction,
        },
    },
    error::ServiceError,
    services::{broadcast, stats},
    state::{
        AppState,
        lifecycle::{self, GameStatus, LifecycleAction},
    },
};

async fn find_game_or_404(state: &AppState, game_id: i64) -> Result<GameRecord, ServiceError> {
    state
        .store()
        .find_game(game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game {game_id}")))
}

async fn game_teams(
    state: &AppState,
    game: &GameRecord,
) -> Result<(TeamRecord, TeamRecord), ServiceError> {
    let home = state
        .store()
        .find_team(game.home_team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team {}", game.home_team_id)))?;
    let away = state
        .store()
        .find_team(game.away_team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team {}", game.away_team_id)))?;
    Ok((home, away))
}

/// Reject callers without an admin relationship to the game.
pub async fn require_admin(
    state: &AppState,
    game: &GameRecord,
    user_id: i64,
) -> Result<(), ServiceError> {
    let (home, away) = game_teams(state, game).await?;
    if lifecycle::is_game_admin(game, &home, &away, user_id) {
        return Ok(());
    }
    Err(ServiceError::Forbidden(
        "only the game creator or a team owner may do this".into(),
    ))
}

pub(crate) async fn roster_names(
    state: &AppState,
    roster: &[RosterEntry],
) -> Result<HashMap<i64, String>, ServiceError> {
    let mut names = HashMap::new();
    for entry in roster {
        if let Some(user) = state.store().find_user(entry.user_id).await? {
            names.insert(user.id, user.username);
        }
    }
    Ok(names)
}

/// Build the current scoreboard snapshot for a game from its ledger.
pub async fn scoreboard(state: &AppState, game_id: i64) -> Result<ScoreboardUpdate, ServiceError> {
    let game = find_game_or_404(state, game_id).await?;
    let (home, away) = game_teams(state, &game).await?;
    let roster = state.store().list_roster(game_id).await?;
    let events = state.store().list_events(game_id).await?;
    let names = roster_names(state, &roster).await?;
    Ok(stats::build_scoreboard(
        &game, &home, &away, &roster, &events, &names,
    ))
}

async fn add_players(
    state: &AppState,
    game_id: i64,
    team_id: i64,
    players: &[RosterPlayerInput],
) -> Result<(), ServiceError> {
    for player in players {
        state
            .store()
            .find_user(player.user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("user {} does not exist", player.user_id))
            })?;
        state
            .store()
            .add_roster_entry(RosterEntry {
                game_id,
                user_id: player.user_id,
                team_id,
                jersey_number: player.jersey_number,
                position: player.position.clone(),
                is_starter: player.is_starter,
            })
            .await?;
    }
    Ok(())
}

/// Create a game in `scheduled` status with its initial rosters.
pub async fn create_game(
    state: &AppState,
    user_id: i64,
    request: CreateGameRequest,
) -> Result<GameDetailsResponse, ServiceError> {
    if request.home_team_id == request.away_team_id {
        return Err(ServiceError::InvalidInput(
            "a team cannot play against itself".into(),
        ));
    }
    for team_id in [request.home_team_id, request.away_team_id] {
        state
            .store()
            .find_team(team_id)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput(format!("team {team_id} does not exist")))?;
    }

    let game = state
        .store()
        .create_game(NewGame {
            title: request.title,
            location: request.location,
            home_team_id: request.home_team_id,
            away_team_id: request.away_team_id,
            created_by: user_id,
            tournament_id: request.tournament_id,
        })
        .await?;

    add_players(state, game.id, game.home_team_id, &request.home_players).await?;
    add_players(state, game.id, game.away_team_id, &request.away_players).await?;

    info!(game_id = game.id, created_by = user_id, "game created");
    get_game(state, game.id).await
}

/// Full details of one game.
pub async fn get_game(state: &AppState, game_id: i64) -> Result<GameDetailsResponse, ServiceError> {
    let game = find_game_or_404(state, game_id).await?;
    let (home, away) = game_teams(state, &game).await?;
    let roster = state.store().list_roster(game_id).await?;
    Ok(GameDetailsResponse::assemble(game, home, away, roster))
}

/// List games, optionally filtered by status.
pub async fn list_games(
    state: &AppState,
    status: Option<GameStatus>,
) -> Result<Vec<GameSummary>, ServiceError> {
    let games = state.store().list_games(status).await?;
    Ok(games.iter().map(GameSummary::from).collect())
}

/// Transition a scheduled game into live play.
pub async fn start_game(
    state: &AppState,
    user_id: i64,
    game_id: i64,
) -> Result<GameRecord, ServiceError> {
    let game = {
        let _guard = state.store().game_lock(game_id).await;

        let mut game = find_game_or_404(state, game_id).await?;
        require_admin(state, &game, user_id).await?;

        let roster = state.store().list_roster(game_id).await?;
        for team_id in [game.home_team_id, game.away_team_id] {
            if !roster.iter().any(|entry| entry.team_id == team_id) {
                return Err(ServiceError::InvalidState(format!(
                    "team {team_id} has no rostered players"
                )));
            }
        }

        game.status = lifecycle::transition(game.status, LifecycleAction::Start)?;
        game.started_at = Some(OffsetDateTime::now_utc());
        state.store().update_game(game).await?
    };

    info!(game_id, "game started");
    broadcast::notify_status(state, &game);
    if let Ok(update) = scoreboard(state, game_id).await {
        broadcast::notify_scoreboard(state, update);
    }
    Ok(game)
}

/// Abandon a game before or during play.
pub async fn cancel_game(
    state: &AppState,
    user_id: i64,
    game_id: i64,
) -> Result<GameRecord, ServiceError> {
    let game = {
        let _guard = state.store().game_lock(game_id).await;

        let mut game = find_game_or_404(state, game_id).await?;
        require_admin(state, &game, user_id).await?;

        game.status = lifecycle::transition(game.status, LifecycleAction::Cancel)?;
        game.ended_at = Some(OffsetDateTime::now_utc());
        game.timeout_active = false;
        game.timeout_started_at = None;
        state.store().update_game(game).await?
    };

    info!(game_id, "game cancelled");
    broadcast::notify_status(state, &game);
    Ok(game)
}

/// Finalize a live game: persist per-player snapshots, set the final score
/// from the ledger and complete the lifecycle.
///
/// Re-finalizing a completed game recomputes and overwrites the snapshots
/// without touching the lifecycle, so a post-hoc ledger correction can be
/// folded into the durable record.
pub async fn finalize_game(
    state: &AppState,
    user_id: i64,
    game_id: i64,
) -> Result<GameRecord, ServiceError> {
    let (game, already_complete) = {
        let _guard = state.store().game_lock(game_id).await;

        let mut game = find_game_or_404(state, game_id).await?;
        require_admin(state, &game, user_id).await?;

        let already_complete = game.status == GameStatus::Completed;
        if !already_complete {
            game.status = lifecycle::transition(game.status, LifecycleAction::Finish)?;
        }

        let roster = state.store().list_roster(game_id).await?;
        let events = state.store().list_events(game_id).await?;
        let totals = stats::compute_player_totals(&events);

        let mut home_points = 0u32;
        let mut away_points = 0u32;
        for (player_id, line) in &totals {
            if let Some(entry) = roster.iter().find(|entry| entry.user_id == *player_id) {
                if entry.team_id == game.home_team_id {
                    home_points += line.points;
                } else {
                    away_points += line.points;
                }
            }
            state
                .store()
                .upsert_player_game_stats(*player_id, game_id, line.clone())
                .await?;
        }

        game.home_score = home_points;
        game.away_score = away_points;
        if !already_complete {
            game.ended_at = Some(OffsetDateTime::now_utc());
            game.timeout_active = false;
            game.timeout_started_at = None;
        }
        (state.store().update_game(game).await?, already_complete)
    };

    info!(game_id, recomputed = already_complete, "game finalized");
    if !already_complete {
        broadcast::notify_status(state, &game);
    }
    Ok(game)
}

/// Start or revoke a timeout on a live game.
pub async fn set_timeout(
    state: &AppState,
    user_id: i64,
    game_id: i64,
    action: TimeoutAction,
) -> Result<GameRecord, ServiceError> {
    let _guard = state.store().game_lock(game_id).await;

    let mut game = find_game_or_404(state, game_id).await?;
    require_admin(state, &game, user_id).await?;

    if game.status != GameStatus::InProgress {
        return Err(ServiceError::InvalidState(format!(
            "cannot manage timeouts on a game that is {}",
            game.status
        )));
    }

    match action {
        TimeoutAction::Start => {
            game.timeout_active = true;
            game.timeout_started_at = Some(OffsetDateTime::now_utc());
        }
        TimeoutAction::Revoke => {
            game.timeout_active = false;
            game.timeout_started_at = None;
        }
    }

    let game = state.store().update_game(game).await?;
    info!(game_id, timeout_active = game.timeout_active, "timeout state changed");
    Ok(game)
}

/// Overwrite the authoritative score of a live game.
///
/// Hard-gated while a timeout is active; the gate is released only by an
/// explicit revoke.
pub async fn update_score(
    state: &AppState,
    user_id: i64,
    game_id: i64,
    request: ScoreUpdateRequest,
) -> Result<GameRecord, ServiceError> {
    let game = {
        let _guard = state.store().game_lock(game_id).await;

        let mut game = find_game_or_404(state, game_id).await?;
        require_admin(state, &game, user_id).await?;

        if game.status != GameStatus::InProgress {
            return Err(ServiceError::InvalidState(format!(
                "cannot update the score of a game that is {}",
                game.status
            )));
        }
        if game.timeout_active {
            return Err(ServiceError::InvalidState(
                "scoring is disabled during timeout".into(),
            ));
        }

        game.home_score = request.home_score;
        game.away_score = request.away_score;
        state.store().update_game(game).await?
    };

    info!(
        game_id,
        home_score = game.home_score,
        away_score = game.away_score,
        "score updated"
    );
    if let Ok(update) = scoreboard(state, game_id).await {
        broadcast::notify_scoreboard(state, update);
    }
    Ok(game)
}

/// Add one player to a game's roster.
pub async fn add_roster_player(
    state: &AppState,
    user_id: i64,
    game_id: i64,
    request: RosterAddRequest,
) -> Result<(), ServiceError> {
    {
        let _guard = state.store().game_lock(game_id).await;

        let game = find_game_or_404(state, game_id).await?;
        require_admin(state, &game, user_id).await?;

        if game.status.is_terminal() {
            return Err(ServiceError::InvalidState(format!(
                "cannot change the roster of a game that is {}",
                game.status
            )));
        }
        if request.team_id != game.home_team_id && request.team_id != game.away_team_id {
            return Err(ServiceError::InvalidInput(format!(
                "team {} is not playing in this game",
                request.team_id
            )));
        }
        state
            .store()
            .find_user(request.user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("user {} does not exist", request.user_id))
            })?;

        let roster = state.store().list_roster(game_id).await?;
        if roster.iter().any(|entry| entry.user_id == request.user_id) {
            return Err(ServiceError::InvalidInput(format!(
                "user {} is already on this game's roster",
                request.user_id
            )));
        }

        state
            .store()
            .add_roster_entry(RosterEntry {
                game_id,
                user_id: request.user_id,
                team_id: request.team_id,
                jersey_number: request.jersey_number,
                position: request.position,
                is_starter: request.is_starter,
            })
            .await?;
    }

    info!(game_id, player_id = request.user_id, "roster player added");
    broadcast::notify_roster(state, game_id, request.user_id, request.team_id);
    Ok(())
}

/// Create a team owned by the caller.
pub async fn create_team(
    state: &AppState,
    user_id: i64,
    request: CreateTeamRequest,
) -> Result<TeamRecord, ServiceError> {
    let team = state
        .store()
        .create_team(request.name, user_id, request.city)
        .await?;
    info!(team_id = team.id, owner_id = user_id, "team created");
    Ok(team)
}

/// Fetch one team.
pub async fn get_team(state: &AppState, team_id: i64) -> Result<TeamRecord, ServiceError> {
    state
        .store()
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team {team_id}")))
}

/// Create a user and issue them a bearer token.
pub async fn create_user(
    state: &AppState,
    request: CreateUserRequest,
) -> Result<CreatedUserResponse, ServiceError> {
    let user = state.store().create_user(request.username).await?;
    let token = state.identity().issue(user.id).await;
    info!(user_id = user.id, "user created");
    Ok(CreatedUserResponse {
        id: user.id,
        username: user.username,
        token,
    })
}
