//! Messages fanned out to game-room spectators.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::game::EventDto, dto::stats::TeamScoreDto, state::lifecycle::GameStatus};

/// Scoreboard snapshot pushed after every ledger or score mutation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoreboardUpdate {
    /// Game the scoreboard belongs to.
    pub game_id: i64,
    /// Current lifecycle status.
    pub game_status: GameStatus,
    /// Current period, derived from the latest `PERIOD_START` marker.
    pub period: u8,
    /// Home team line.
    pub home_team: TeamScoreDto,
    /// Away team line.
    pub away_team: TeamScoreDto,
    /// Most recent ledger event, if any.
    pub latest_event: Option<EventDto>,
    /// RFC 3339 instant the snapshot was built.
    pub timestamp: String,
}

/// Notification about one ledger event.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventMessage {
    /// Game the event belongs to.
    pub game_id: i64,
    /// Event id.
    pub event_id: i64,
    /// Scoreboard spelling of the event type.
    pub event_type: String,
    /// Period of play.
    pub period: u8,
    /// Seconds elapsed on the game clock.
    pub timestamp: i64,
    /// `made` or `miss` for shots.
    pub outcome: Option<String>,
    /// RFC 3339 instant the ledger accepted the event.
    pub created_at: String,
}

/// Notification about a lifecycle transition.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameStatusUpdate {
    /// Game the transition applies to.
    pub game_id: i64,
    /// New lifecycle status.
    pub status: GameStatus,
    /// RFC 3339 start instant, if started.
    pub started_at: Option<String>,
    /// RFC 3339 end instant, if finalized or cancelled.
    pub ended_at: Option<String>,
    /// RFC 3339 instant the notification was built.
    pub timestamp: String,
}

/// Notification about a roster change.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterUpdate {
    /// Game the roster belongs to.
    pub game_id: i64,
    /// Player added.
    pub user_id: i64,
    /// Team the player joined.
    pub team_id: i64,
    /// RFC 3339 instant the notification was built.
    pub timestamp: String,
}

/// Spectator presence change.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpectatorPresence {
    /// Game room the spectator joined or left.
    pub game_id: i64,
    /// The spectator's user id.
    pub user_id: i64,
    /// The spectator's display handle.
    pub username: String,
    /// Spectator count after the change.
    pub spectators: usize,
    /// RFC 3339 instant of the change.
    pub timestamp: String,
}

/// A chat line relayed between spectators of one room.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatMessage {
    /// Game room the chat belongs to.
    pub game_id: i64,
    /// Sender's user id.
    pub user_id: i64,
    /// Sender's display handle.
    pub username: String,
    /// Message text.
    pub message: String,
    /// RFC 3339 instant the relay accepted the message.
    pub timestamp: String,
}

/// Envelope for every message a game room fans out.
///
/// Tagged with `type` so clients can dispatch without trying each shape.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomMessage {
    /// Full scoreboard snapshot.
    ScoreboardUpdate(ScoreboardUpdate),
    /// A ledger event was accepted.
    EventCreated(EventMessage),
    /// A ledger event was removed.
    EventDeleted(EventMessage),
    /// Lifecycle transition.
    GameStatusUpdate(GameStatusUpdate),
    /// Roster change.
    RosterUpdate(RosterUpdate),
    /// A spectator joined the room.
    SpectatorJoined(SpectatorPresence),
    /// A spectator left the room.
    SpectatorLeft(SpectatorPresence),
    /// Spectator chat line.
    Chat(ChatMessage),
}

impl RoomMessage {
    /// Serialize to the wire JSON, logging instead of failing on error.
    pub fn json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize room message");
                None
            }
        }
    }
}

/// Snapshot of a room handed to a newly connected spectator.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomState {
    /// Game the room belongs to.
    pub game_id: i64,
    /// Current spectator count.
    pub spectators: usize,
    /// Last scoreboard snapshot broadcast in the room, if any.
    pub scoreboard: Option<ScoreboardUpdate>,
    /// Recent broadcast history, oldest first.
    pub recent_events: Vec<serde_json::Value>,
}
