//! Core data model records shared by the storage layer and the services.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::state::lifecycle::GameStatus;

/// A scheduled or played game between two teams.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Human-readable title, e.g. "Semifinal 2".
    pub title: String,
    /// Optional venue description.
    pub location: Option<String>,
    /// Team credited as home side.
    pub home_team_id: i64,
    /// Team credited as away side.
    pub away_team_id: i64,
    /// Authoritative home score. Mutated by score updates and finalization.
    pub home_score: u32,
    /// Authoritative away score.
    pub away_score: u32,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Whether a timeout currently suspends score mutations.
    pub timeout_active: bool,
    /// When the active timeout began, if one is active.
    pub timeout_started_at: Option<OffsetDateTime>,
    /// User that created the game; an admin-equivalent for it.
    pub created_by: i64,
    /// Optional tournament the game belongs to.
    pub tournament_id: Option<i64>,
    /// When play started.
    pub started_at: Option<OffsetDateTime>,
    /// When the game was finalized or cancelled.
    pub ended_at: Option<OffsetDateTime>,
    /// Record creation instant.
    pub created_at: OffsetDateTime,
    /// Last mutation instant.
    pub updated_at: OffsetDateTime,
}

/// Input for creating a game record.
#[derive(Debug, Clone)]
pub struct NewGame {
    /// Title of the game.
    pub title: String,
    /// Optional venue.
    pub location: Option<String>,
    /// Home team identifier.
    pub home_team_id: i64,
    /// Away team identifier.
    pub away_team_id: i64,
    /// Creating user.
    pub created_by: i64,
    /// Optional tournament link.
    pub tournament_id: Option<i64>,
}

/// One immutable entry in a game's event ledger.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// Storage-assigned identifier, strictly increasing per store.
    pub id: i64,
    /// Game the event belongs to.
    pub game_id: i64,
    /// Acting player, when the event type names one.
    pub user_id: Option<i64>,
    /// Team the event is attributed to.
    pub team_id: i64,
    /// Classified event type.
    pub event_type: EventType,
    /// Period of play, 1 through 5 (5 = overtime).
    pub period: u8,
    /// Seconds elapsed on the game clock when the event occurred.
    pub timestamp: i64,
    /// Shot outcome, present only for shot events.
    pub outcome: Option<Outcome>,
    /// Wall-clock instant the ledger accepted the event.
    pub created_at: OffsetDateTime,
}

/// Input for appending a ledger event. Carries already-validated fields.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Game to append to.
    pub game_id: i64,
    /// Acting player, if any.
    pub user_id: Option<i64>,
    /// Team attribution.
    pub team_id: i64,
    /// Classified event type.
    pub event_type: EventType,
    /// Period of play.
    pub period: u8,
    /// Game-clock seconds.
    pub timestamp: i64,
    /// Shot outcome for shot events.
    pub outcome: Option<Outcome>,
}

/// Vocabulary of ledger event types.
///
/// The wire spellings are the scoreboard shorthand the clients send; the
/// long-form foul and violation spellings coexist with the `FLS` catch-all
/// and all count toward the same foul and violation tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EventType {
    /// Two-point field goal attempt.
    #[serde(rename = "2PT")]
    TwoPoint,
    /// Three-point field goal attempt.
    #[serde(rename = "3PT")]
    ThreePoint,
    /// Free-throw attempt.
    #[serde(rename = "FT")]
    FreeThrow,
    /// Assist.
    #[serde(rename = "AST")]
    Assist,
    /// Rebound.
    #[serde(rename = "REB")]
    Rebound,
    /// Personal foul, unspecified kind.
    #[serde(rename = "FLS")]
    Foul,
    /// Blocking foul.
    #[serde(rename = "FOUL_BLOCKING")]
    FoulBlocking,
    /// Charging foul.
    #[serde(rename = "FOUL_CHARGING")]
    FoulCharging,
    /// Holding foul.
    #[serde(rename = "FOUL_HOLDING")]
    FoulHolding,
    /// Pushing foul.
    #[serde(rename = "FOUL_PUSHING")]
    FoulPushing,
    /// Hand-checking foul.
    #[serde(rename = "FOUL_HAND_CHECKING")]
    FoulHandChecking,
    /// Illegal screen foul.
    #[serde(rename = "FOUL_ILLEGAL_SCREEN")]
    FoulIllegalScreen,
    /// Elbowing foul.
    #[serde(rename = "FOUL_ELBOWING")]
    FoulElbowing,
    /// Foul on a shooter.
    #[serde(rename = "FOUL_SHOOTING")]
    FoulShooting,
    /// Traveling violation.
    #[serde(rename = "VIOLATION_TRAVELING")]
    ViolationTraveling,
    /// Double-dribble violation.
    #[serde(rename = "VIOLATION_DOUBLE_DRIBBLE")]
    ViolationDoubleDribble,
    /// Player substitution.
    #[serde(rename = "SUB")]
    Substitution,
    /// Team timeout taken.
    #[serde(rename = "TO")]
    Timeout,
    /// Start-of-period marker.
    #[serde(rename = "PERIOD_START")]
    PeriodStart,
    /// End-of-period marker.
    #[serde(rename = "PERIOD_END")]
    PeriodEnd,
}

impl EventType {
    /// Parse the scoreboard wire spelling into the enum.
    pub fn from_wire(value: &str) -> Option<Self> {
        let parsed = match value {
            "2PT" => EventType::TwoPoint,
            "3PT" => EventType::ThreePoint,
            "FT" => EventType::FreeThrow,
            "AST" => EventType::Assist,
            "REB" => EventType::Rebound,
            "FLS" => EventType::Foul,
            "FOUL_BLOCKING" => EventType::FoulBlocking,
            "FOUL_CHARGING" => EventType::FoulCharging,
            "FOUL_HOLDING" => EventType::FoulHolding,
            "FOUL_PUSHING" => EventType::FoulPushing,
            "FOUL_HAND_CHECKING" => EventType::FoulHandChecking,
            "FOUL_ILLEGAL_SCREEN" => EventType::FoulIllegalScreen,
            "FOUL_ELBOWING" => EventType::FoulElbowing,
            "FOUL_SHOOTING" => EventType::FoulShooting,
            "VIOLATION_TRAVELING" => EventType::ViolationTraveling,
            "VIOLATION_DOUBLE_DRIBBLE" => EventType::ViolationDoubleDribble,
            "SUB" => EventType::Substitution,
            "TO" => EventType::Timeout,
            "PERIOD_START" => EventType::PeriodStart,
            "PERIOD_END" => EventType::PeriodEnd,
            _ => return None,
        };
        Some(parsed)
    }

    /// The scoreboard wire spelling.
    pub fn as_wire(self) -> &'static str {
        match self {
            EventType::TwoPoint => "2PT",
            EventType::ThreePoint => "3PT",
            EventType::FreeThrow => "FT",
            EventType::Assist => "AST",
            EventType::Rebound => "REB",
            EventType::Foul => "FLS",
            EventType::FoulBlocking => "FOUL_BLOCKING",
            EventType::FoulCharging => "FOUL_CHARGING",
            EventType::FoulHolding => "FOUL_HOLDING",
            EventType::FoulPushing => "FOUL_PUSHING",
            EventType::FoulHandChecking => "FOUL_HAND_CHECKING",
            EventType::FoulIllegalScreen => "FOUL_ILLEGAL_SCREEN",
            EventType::FoulElbowing => "FOUL_ELBOWING",
            EventType::FoulShooting => "FOUL_SHOOTING",
            EventType::ViolationTraveling => "VIOLATION_TRAVELING",
            EventType::ViolationDoubleDribble => "VIOLATION_DOUBLE_DRIBBLE",
            EventType::Substitution => "SUB",
            EventType::Timeout => "TO",
            EventType::PeriodStart => "PERIOD_START",
            EventType::PeriodEnd => "PERIOD_END",
        }
    }

    /// Whether this event is a field goal or free-throw attempt.
    pub fn is_shot(self) -> bool {
        matches!(
            self,
            EventType::TwoPoint | EventType::ThreePoint | EventType::FreeThrow
        )
    }

    /// Whether this event counts toward a player's foul tally.
    pub fn is_foul(self) -> bool {
        matches!(
            self,
            EventType::Foul
                | EventType::FoulBlocking
                | EventType::FoulCharging
                | EventType::FoulHolding
                | EventType::FoulPushing
                | EventType::FoulHandChecking
                | EventType::FoulIllegalScreen
                | EventType::FoulElbowing
                | EventType::FoulShooting
        )
    }

    /// Whether this event counts toward a player's violation tally.
    pub fn is_violation(self) -> bool {
        matches!(
            self,
            EventType::ViolationTraveling | EventType::ViolationDoubleDribble
        )
    }

    /// Whether this event must name an acting player.
    ///
    /// Long-form fouls inherit the actor requirement of their `FLS`
    /// shorthand. Violations and team-level events (`TO`, period markers)
    /// may omit the actor; actor-less ones just carry no player stats.
    pub fn requires_actor(self) -> bool {
        self.is_shot()
            || self.is_foul()
            || matches!(
                self,
                EventType::Assist | EventType::Rebound | EventType::Substitution
            )
    }
}

/// Outcome of a shot event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The shot went in.
    Made,
    /// The shot missed.
    Miss,
}

impl Outcome {
    /// Parse the wire spelling (`made` / `miss`).
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "made" => Some(Outcome::Made),
            "miss" => Some(Outcome::Miss),
            _ => None,
        }
    }
}

/// Accumulated statistic counters for one player in one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatTotals {
    /// Points scored.
    pub points: u32,
    /// Assists.
    pub assists: u32,
    /// Rebounds.
    pub rebounds: u32,
    /// Fouls of any kind.
    pub fouls: u32,
    /// Violations of any kind.
    pub violations: u32,
    /// Field goals made, two- and three-pointers combined. Free throws
    /// count only in their own buckets.
    pub shots_made: u32,
    /// Field goals attempted, two- and three-pointers combined.
    pub shots_attempted: u32,
    /// Two-point field goals made.
    pub two_pointers_made: u32,
    /// Two-point field goals attempted.
    pub two_pointers_attempted: u32,
    /// Three-point field goals made.
    pub three_pointers_made: u32,
    /// Three-point field goals attempted.
    pub three_pointers_attempted: u32,
    /// Free throws made.
    pub free_throws_made: u32,
    /// Free throws attempted.
    pub free_throws_attempted: u32,
}

/// Durable per-player per-game statistics snapshot written at finalization.
#[derive(Debug, Clone)]
pub struct PlayerGameStatsRecord {
    /// The player the snapshot belongs to.
    pub player_id: i64,
    /// The game it was computed from.
    pub game_id: i64,
    /// Accumulated counters.
    pub totals: StatTotals,
    /// First write instant.
    pub created_at: OffsetDateTime,
    /// Last write instant. Re-finalization overwrites in place.
    pub updated_at: OffsetDateTime,
}

/// One player's membership on a team for a particular game.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    /// Game the entry applies to.
    pub game_id: i64,
    /// Rostered player.
    pub user_id: i64,
    /// Team the player plays for in this game.
    pub team_id: i64,
    /// Optional jersey number.
    pub jersey_number: Option<u8>,
    /// Optional position label, e.g. "PG".
    pub position: Option<String>,
    /// Whether the player starts the game.
    pub is_starter: bool,
}

/// A team.
#[derive(Debug, Clone)]
pub struct TeamRecord {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Owning user; an admin-equivalent for the team's games.
    pub owner_id: i64,
    /// Optional home city.
    pub city: Option<String>,
}

/// A user. Players, scorekeepers and team owners are all users.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Unique display handle.
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_spellings_round_trip() {
        for wire in [
            "2PT",
            "3PT",
            "FT",
            "AST",
            "REB",
            "FLS",
            "FOUL_BLOCKING",
            "FOUL_CHARGING",
            "FOUL_HOLDING",
            "FOUL_PUSHING",
            "FOUL_HAND_CHECKING",
            "FOUL_ILLEGAL_SCREEN",
            "FOUL_ELBOWING",
            "FOUL_SHOOTING",
            "VIOLATION_TRAVELING",
            "VIOLATION_DOUBLE_DRIBBLE",
            "SUB",
            "TO",
            "PERIOD_START",
            "PERIOD_END",
        ] {
            let parsed = EventType::from_wire(wire).unwrap();
            assert_eq!(parsed.as_wire(), wire);
        }
        assert!(EventType::from_wire("DUNK").is_none());
    }

    #[test]
    fn actor_requirement_matches_vocabulary() {
        assert!(EventType::TwoPoint.requires_actor());
        assert!(EventType::FoulElbowing.requires_actor());
        assert!(EventType::Substitution.requires_actor());
        assert!(!EventType::ViolationTraveling.requires_actor());
        assert!(!EventType::Timeout.requires_actor());
        assert!(!EventType::PeriodStart.requires_actor());
        assert!(!EventType::PeriodEnd.requires_actor());
    }

    #[test]
    fn foul_kinds_all_count_as_fouls() {
        for wire in [
            "FLS",
            "FOUL_BLOCKING",
            "FOUL_CHARGING",
            "FOUL_HOLDING",
            "FOUL_PUSHING",
            "FOUL_HAND_CHECKING",
            "FOUL_ILLEGAL_SCREEN",
            "FOUL_ELBOWING",
            "FOUL_SHOOTING",
        ] {
            assert!(EventType::from_wire(wire).unwrap().is_foul(), "{wire}");
        }
        assert!(!EventType::ViolationTraveling.is_foul());
    }

    #[test]
    fn shot_serialization_uses_scoreboard_shorthand() {
        let json = serde_json::to_string(&EventType::TwoPoint).unwrap();
        assert_eq!(json, "\"2PT\"");
        let back: EventType = serde_json::from_str("\"FT\"").unwrap();
        assert_eq!(back, EventType::FreeThrow);
    }

    #[test]
    fn outcome_parses_lowercase_only() {
        assert_eq!(Outcome::from_wire("made"), Some(Outcome::Made));
        assert_eq!(Outcome::from_wire("miss"), Some(Outcome::Miss));
        assert_eq!(Outcome::from_wire("MADE"), None);
    }
}
