//! Game lifecycle state machine gating ledger writes and score mutations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::dao::models::{GameRecord, TeamRecord};

/// Lifecycle status of a game.
///
/// `Completed` and `Cancelled` are terminal: no further transitions and no
/// further ledger writes are admitted. There is no pause edge back to
/// `scheduled`; a live game either finishes or is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created but not yet started; roster can still be assembled.
    Scheduled,
    /// Live play; the ledger accepts events.
    InProgress,
    /// Finalized; scores and per-player snapshots are authoritative.
    Completed,
    /// Abandoned before or during play.
    Cancelled,
}

impl GameStatus {
    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Completed | GameStatus::Cancelled)
    }

    /// Parse the wire spelling used in query parameters.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(GameStatus::Scheduled),
            "in_progress" => Some(GameStatus::InProgress),
            "completed" => Some(GameStatus::Completed),
            "cancelled" => Some(GameStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "in_progress",
            GameStatus::Completed => "completed",
            GameStatus::Cancelled => "cancelled",
        };
        f.write_str(value)
    }
}

/// Actions that can be applied to the lifecycle machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Begin live play.
    Start,
    /// Finalize the game.
    Finish,
    /// Abandon the game.
    Cancel,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            LifecycleAction::Start => "start",
            LifecycleAction::Finish => "finish",
            LifecycleAction::Cancel => "cancel",
        };
        f.write_str(value)
    }
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} a game that is {from}")]
pub struct InvalidTransition {
    /// The status the game was in when the invalid action was requested.
    pub from: GameStatus,
    /// The action that cannot be applied from this status.
    pub action: LifecycleAction,
}

/// Compute the status a game moves to when `action` is applied in `from`.
pub fn transition(from: GameStatus, action: LifecycleAction) -> Result<GameStatus, InvalidTransition> {
    let next = match (from, action) {
        (GameStatus::Scheduled, LifecycleAction::Start) => GameStatus::InProgress,
        (GameStatus::InProgress, LifecycleAction::Finish) => GameStatus::Completed,
        (GameStatus::Scheduled, LifecycleAction::Cancel)
        | (GameStatus::InProgress, LifecycleAction::Cancel) => GameStatus::Cancelled,
        (from, action) => return Err(InvalidTransition { from, action }),
    };

    Ok(next)
}

/// Whether `user_id` is an admin-equivalent for the game: its creator, or the
/// owning user of either participating team.
pub fn is_game_admin(game: &GameRecord, home: &TeamRecord, away: &TeamRecord, user_id: i64) -> bool {
    game.created_by == user_id || home.owner_id == user_id || away.owner_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_scheduled_to_completed() {
        let live = transition(GameStatus::Scheduled, LifecycleAction::Start).unwrap();
        assert_eq!(live, GameStatus::InProgress);
        let done = transition(live, LifecycleAction::Finish).unwrap();
        assert_eq!(done, GameStatus::Completed);
        assert!(done.is_terminal());
    }

    #[test]
    fn cancel_allowed_before_and_during_play() {
        assert_eq!(
            transition(GameStatus::Scheduled, LifecycleAction::Cancel).unwrap(),
            GameStatus::Cancelled
        );
        assert_eq!(
            transition(GameStatus::InProgress, LifecycleAction::Cancel).unwrap(),
            GameStatus::Cancelled
        );
    }

    #[test]
    fn terminal_states_admit_no_exits() {
        for terminal in [GameStatus::Completed, GameStatus::Cancelled] {
            for action in [
                LifecycleAction::Start,
                LifecycleAction::Finish,
                LifecycleAction::Cancel,
            ] {
                let err = transition(terminal, action).unwrap_err();
                assert_eq!(err.from, terminal);
                assert_eq!(err.action, action);
            }
        }
    }

    #[test]
    fn no_pause_edge_back_to_scheduled() {
        // Finishing is the only non-cancel exit from live play.
        assert!(transition(GameStatus::InProgress, LifecycleAction::Start).is_err());
        assert!(transition(GameStatus::Scheduled, LifecycleAction::Finish).is_err());
    }

    #[test]
    fn wire_spellings_round_trip() {
        for status in [
            GameStatus::Scheduled,
            GameStatus::InProgress,
            GameStatus::Completed,
            GameStatus::Cancelled,
        ] {
            assert_eq!(GameStatus::from_wire(&status.to_string()), Some(status));
        }
        assert_eq!(GameStatus::from_wire("paused"), None);
    }
}
