//! Fan-out of mutation notifications to game rooms.
//!
//! Every helper here is fire-and-forget: broadcasting never fails the write
//! that triggered it, and rooms that no spectator has opened are skipped.

use crate::{
    dao::models::{EventRecord, GameRecord},
    dto::{
        broadcast::{EventMessage, GameStatusUpdate, RoomMessage, RosterUpdate, ScoreboardUpdate},
        format_timestamp, now_timestamp,
    },
    state::AppState,
};

fn event_message(event: &EventRecord) -> EventMessage {
    EventMessage {
        game_id: event.game_id,
        event_id: event.id,
        event_type: event.event_type.as_wire().to_string(),
        period: event.period,
        timestamp: event.timestamp,
        outcome: event.outcome.map(|outcome| {
            match outcome {
                crate::dao::models::Outcome::Made => "made",
                crate::dao::models::Outcome::Miss => "miss",
            }
            .to_string()
        }),
        created_at: format_timestamp(event.created_at),
    }
}

/// Announce a newly accepted ledger event.
pub fn notify_event_created(state: &AppState, event: &EventRecord) {
    if let Some(room) = state.rooms().get(event.game_id) {
        room.broadcast(&RoomMessage::EventCreated(event_message(event)));
    }
}

/// Announce a removed ledger event.
pub fn notify_event_deleted(state: &AppState, event: &EventRecord) {
    if let Some(room) = state.rooms().get(event.game_id) {
        room.broadcast(&RoomMessage::EventDeleted(event_message(event)));
    }
}

/// Push a fresh scoreboard snapshot to the game's room.
///
/// The snapshot is also recorded on the room so late joiners receive it even
/// when they attach between broadcasts.
pub fn notify_scoreboard(state: &AppState, update: ScoreboardUpdate) {
    if let Some(room) = state.rooms().get(update.game_id) {
        room.broadcast(&RoomMessage::ScoreboardUpdate(update));
    }
}

/// Announce a lifecycle transition.
pub fn notify_status(state: &AppState, game: &GameRecord) {
    if let Some(room) = state.rooms().get(game.id) {
        room.broadcast(&RoomMessage::GameStatusUpdate(GameStatusUpdate {
            game_id: game.id,
            status: game.status,
            started_at: game.started_at.map(format_timestamp),
            ended_at: game.ended_at.map(format_timestamp),
            timestamp: now_timestamp(),
        }));
    }
}

/// Announce a roster addition.
pub fn notify_roster(state: &AppState, game_id: i64, user_id: i64, team_id: i64) {
    if let Some(room) = state.rooms().get(game_id) {
        room.broadcast(&RoomMessage::RosterUpdate(RosterUpdate {
            game_id,
            user_id,
            team_id,
            timestamp: now_timestamp(),
        }));
    }
}
