//! Ledger operations: appending, listing and correcting game events.

use tracing::info;

use crate::{
    dao::models::{EventRecord, NewEvent},
    error::ServiceError,
    services::{
        broadcast, game_service,
        validation::{ProposedEvent, validate_event, validate_shot_outcome},
    },
    state::AppState,
};

/// Validate and append one event to a game's ledger.
///
/// The per-game lock spans the read of the current ledger and the append so
/// two concurrent proposals cannot both pass a check only one should survive,
/// such as a player's final allowed foul.
pub async fn append_event(
    state: &AppState,
    game_id: i64,
    proposed: ProposedEvent,
) -> Result<EventRecord, ServiceError> {
    let event = {
        let _guard = state.store().game_lock(game_id).await;

        let game = state
            .store()
            .find_game(game_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("game {game_id}")))?;
        let roster = state.store().list_roster(game_id).await?;
        let events = state.store().list_events(game_id).await?;

        let event_type = validate_event(&game, &roster, &events, &proposed)?;
        let outcome = validate_shot_outcome(event_type, proposed.outcome.as_deref())?;

        state
            .store()
            .append_event(NewEvent {
                game_id,
                user_id: proposed.user_id,
                team_id: proposed.team_id,
                event_type,
                period: proposed.period,
                timestamp: proposed.timestamp,
                outcome,
            })
            .await?
    };

    info!(
        game_id,
        event_id = event.id,
        event_type = event.event_type.as_wire(),
        "ledger event accepted"
    );

    broadcast::notify_event_created(state, &event);
    if let Ok(update) = game_service::scoreboard(state, game_id).await {
        broadcast::notify_scoreboard(state, update);
    }

    Ok(event)
}

/// List a game's ledger in game-clock order.
pub async fn list_events(state: &AppState, game_id: i64) -> Result<Vec<EventRecord>, ServiceError> {
    state
        .store()
        .find_game(game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game {game_id}")))?;
    Ok(state.store().list_events(game_id).await?)
}

/// Remove one erroneous event from the ledger. Admin-only correction.
pub async fn delete_event(
    state: &AppState,
    user_id: i64,
    game_id: i64,
    event_id: i64,
) -> Result<(), ServiceError> {
    let removed = {
        let _guard = state.store().game_lock(game_id).await;

        let game = state
            .store()
            .find_game(game_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("game {game_id}")))?;
        game_service::require_admin(state, &game, user_id).await?;

        let events = state.store().list_events(game_id).await?;
        let target = events
            .into_iter()
            .find(|event| event.id == event_id)
            .ok_or_else(|| ServiceError::NotFound(format!("event {event_id}")))?;

        state
            .store()
            .delete_event(game_id, event_id)
            .await?
            .then_some(target)
            .ok_or_else(|| ServiceError::NotFound(format!("event {event_id}")))?
    };

    info!(game_id, event_id, "ledger event removed");

    broadcast::notify_event_deleted(state, &removed);
    if let Ok(update) = game_service::scoreboard(state, game_id).await {
        broadcast::notify_scoreboard(state, update);
    }

    Ok(())
}
