//! Request and response bodies for the game and ledger endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{EventRecord, GameRecord, RosterEntry, TeamRecord, UserRecord},
    dto::format_timestamp,
    state::lifecycle::GameStatus,
};

/// One player named when creating a game roster.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RosterPlayerInput {
    /// Player's user id.
    pub user_id: i64,
    /// Optional jersey number.
    #[validate(range(max = 99))]
    pub jersey_number: Option<u8>,
    /// Optional position label.
    #[validate(length(max = 8))]
    pub position: Option<String>,
    /// Whether the player starts.
    #[serde(default)]
    pub is_starter: bool,
}

/// Body for `POST /api/games`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGameRequest {
    /// Title of the game.
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    /// Optional venue description.
    #[validate(length(max = 256))]
    pub location: Option<String>,
    /// Home team id.
    pub home_team_id: i64,
    /// Away team id.
    pub away_team_id: i64,
    /// Optional tournament the game belongs to.
    pub tournament_id: Option<i64>,
    /// Home roster.
    #[serde(default)]
    #[validate(nested)]
    pub home_players: Vec<RosterPlayerInput>,
    /// Away roster.
    #[serde(default)]
    #[validate(nested)]
    pub away_players: Vec<RosterPlayerInput>,
}

/// Body for `POST /api/games/{id}/events`.
///
/// `event_type` and `outcome` stay raw strings here: the validation gate owns
/// the vocabulary and turns unknown spellings into structured rejections
/// rather than deserialization failures.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GameEventRequest {
    /// Acting player, when the event type names one.
    pub user_id: Option<i64>,
    /// Team the event is attributed to.
    pub team_id: i64,
    /// Scoreboard spelling of the event type, e.g. `2PT`.
    #[validate(length(min = 1, max = 32))]
    pub event_type: String,
    /// Period of play.
    pub period: u8,
    /// Seconds elapsed on the game clock.
    #[validate(range(min = 0))]
    pub timestamp: i64,
    /// `made` or `miss` for shot events.
    pub outcome: Option<String>,
}

/// Body for `POST /api/games/{id}/score`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreUpdateRequest {
    /// New home score.
    pub home_score: u32,
    /// New away score.
    pub away_score: u32,
}

/// Timeout actions accepted by `POST /api/games/{id}/timeout`.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutAction {
    /// Begin a timeout, suspending score mutations.
    Start,
    /// End the active timeout.
    Revoke,
}

/// Body for `POST /api/games/{id}/timeout`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TimeoutRequest {
    /// Whether to start or revoke the timeout.
    pub action: TimeoutAction,
}

/// Body for `POST /api/games/{id}/roster`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RosterAddRequest {
    /// Player to add.
    pub user_id: i64,
    /// Team to add the player to.
    pub team_id: i64,
    /// Optional jersey number.
    #[validate(range(max = 99))]
    pub jersey_number: Option<u8>,
    /// Optional position label.
    #[validate(length(max = 8))]
    pub position: Option<String>,
    /// Whether the player starts.
    #[serde(default)]
    pub is_starter: bool,
}

/// Body for `POST /api/teams`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRequest {
    /// Team display name.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Optional home city.
    #[validate(length(max = 64))]
    pub city: Option<String>,
}

/// Body for `POST /api/users`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Unique display handle.
    #[validate(length(min = 1, max = 32))]
    pub username: String,
}

/// Response for `POST /api/users`: the created user plus a bearer token.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    /// Assigned user id.
    pub id: i64,
    /// Display handle.
    pub username: String,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// A team as exposed on the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamDto {
    /// Team id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Owning user.
    pub owner_id: i64,
    /// Optional home city.
    pub city: Option<String>,
}

impl From<TeamRecord> for TeamDto {
    fn from(team: TeamRecord) -> Self {
        Self {
            id: team.id,
            name: team.name,
            owner_id: team.owner_id,
            city: team.city,
        }
    }
}

/// A roster entry as exposed on the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntryDto {
    /// Rostered player.
    pub user_id: i64,
    /// Team the player plays for.
    pub team_id: i64,
    /// Optional jersey number.
    pub jersey_number: Option<u8>,
    /// Optional position label.
    pub position: Option<String>,
    /// Whether the player starts.
    pub is_starter: bool,
}

impl From<RosterEntry> for RosterEntryDto {
    fn from(entry: RosterEntry) -> Self {
        Self {
            user_id: entry.user_id,
            team_id: entry.team_id,
            jersey_number: entry.jersey_number,
            position: entry.position,
            is_starter: entry.is_starter,
        }
    }
}

/// One ledger event as exposed on the wire.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// Event id.
    pub id: i64,
    /// Game the event belongs to.
    pub game_id: i64,
    /// Acting player, if any.
    pub user_id: Option<i64>,
    /// Team attribution.
    pub team_id: i64,
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

impl From<&EventRecord> for EventDto {
    fn from(event: &EventRecord) -> Self {
        Self {
            id: event.id,
            game_id: event.game_id,
            user_id: event.user_id,
            team_id: event.team_id,
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
}

/// Compact game listing entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Game id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Home team id.
    pub home_team_id: i64,
    /// Away team id.
    pub away_team_id: i64,
    /// Home score.
    pub home_score: u32,
    /// Away score.
    pub away_score: u32,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Whether a timeout is active.
    pub timeout_active: bool,
    /// RFC 3339 creation instant.
    pub created_at: String,
}

impl From<&GameRecord> for GameSummary {
    fn from(game: &GameRecord) -> Self {
        Self {
            id: game.id,
            title: game.title.clone(),
            home_team_id: game.home_team_id,
            away_team_id: game.away_team_id,
            home_score: game.home_score,
            away_score: game.away_score,
            status: game.status,
            timeout_active: game.timeout_active,
            created_at: format_timestamp(game.created_at),
        }
    }
}

/// Full game detail returned by `GET /api/games/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameDetailsResponse {
    /// Game id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Optional venue.
    pub location: Option<String>,
    /// Home team.
    pub home_team: TeamDto,
    /// Away team.
    pub away_team: TeamDto,
    /// Home score.
    pub home_score: u32,
    /// Away score.
    pub away_score: u32,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Whether a timeout is active.
    pub timeout_active: bool,
    /// Creating user.
    pub created_by: i64,
    /// Optional tournament link.
    pub tournament_id: Option<i64>,
    /// RFC 3339 start instant, if started.
    pub started_at: Option<String>,
    /// RFC 3339 end instant, if finalized or cancelled.
    pub ended_at: Option<String>,
    /// Full roster, both teams.
    pub roster: Vec<RosterEntryDto>,
}

impl GameDetailsResponse {
    /// Assemble the response from the storage records.
    pub fn assemble(
        game: GameRecord,
        home_team: TeamRecord,
        away_team: TeamRecord,
        roster: Vec<RosterEntry>,
    ) -> Self {
        Self {
            id: game.id,
            title: game.title,
            location: game.location,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score: game.home_score,
            away_score: game.away_score,
            status: game.status,
            timeout_active: game.timeout_active,
            created_by: game.created_by,
            tournament_id: game.tournament_id,
            started_at: game.started_at.map(format_timestamp),
            ended_at: game.ended_at.map(format_timestamp),
            roster: roster.into_iter().map(Into::into).collect(),
        }
    }
}

/// A user as exposed on the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    /// User id.
    pub id: i64,
    /// Display handle.
    pub username: String,
}

impl From<UserRecord> for UserDto {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}
