//! Storage abstraction over games, ledgers, rosters, teams and users.

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

use crate::{
    dao::models::{
        EventRecord, GameRecord, NewEvent, NewGame, PlayerGameStatsRecord, RosterEntry, StatTotals,
        TeamRecord, UserRecord,
    },
    state::lifecycle::GameStatus,
};

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not execute the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failure.
        message: String,
        /// Underlying driver error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Build an [`StorageError::Unavailable`] without an underlying source.
    pub fn unavailable(message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            source: None,
        }
    }
}

/// Convenience alias for storage operation results.
pub type StorageResult<T> = Result<T, StorageError>;

/// Behavior expected from a storage backend.
///
/// All reads return owned snapshots so callers never hold references into the
/// backend across await points. `game_lock` hands out a per-game mutex guard
/// that serializes check-then-append sequences on that game's ledger.
pub trait GameStore: Send + Sync {
    /// Create a game in `scheduled` status with zeroed scores.
    fn create_game(&self, input: NewGame) -> BoxFuture<'static, StorageResult<GameRecord>>;

    /// Fetch a game by id.
    fn find_game(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Option<GameRecord>>>;

    /// Persist a mutated game record, replacing the stored copy.
    fn update_game(&self, game: GameRecord) -> BoxFuture<'static, StorageResult<GameRecord>>;

    /// List games, optionally filtered by status, newest first.
    fn list_games(
        &self,
        status: Option<GameStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecord>>>;

    /// Append an event to a game's ledger and assign it an id.
    fn append_event(&self, input: NewEvent) -> BoxFuture<'static, StorageResult<EventRecord>>;

    /// List a game's ledger ordered by game clock, then by insertion id.
    fn list_events(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Vec<EventRecord>>>;

    /// Delete one event from a game's ledger. Returns whether it existed.
    fn delete_event(
        &self,
        game_id: i64,
        event_id: i64,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Write or overwrite the per-player per-game statistics snapshot.
    fn upsert_player_game_stats(
        &self,
        player_id: i64,
        game_id: i64,
        totals: StatTotals,
    ) -> BoxFuture<'static, StorageResult<PlayerGameStatsRecord>>;

    /// List all finalized snapshots for one player across games.
    fn list_player_game_stats(
        &self,
        player_id: i64,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerGameStatsRecord>>>;

    /// Fetch the finalized snapshot for one player in one game, if any.
    fn find_player_game_stats(
        &self,
        player_id: i64,
        game_id: i64,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerGameStatsRecord>>>;

    /// Add a player to a game roster.
    fn add_roster_entry(&self, entry: RosterEntry) -> BoxFuture<'static, StorageResult<()>>;

    /// List the full roster of a game, both teams.
    fn list_roster(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Vec<RosterEntry>>>;

    /// Create a team.
    fn create_team(
        &self,
        name: String,
        owner_id: i64,
        city: Option<String>,
    ) -> BoxFuture<'static, StorageResult<TeamRecord>>;

    /// Fetch a team by id.
    fn find_team(&self, team_id: i64) -> BoxFuture<'static, StorageResult<Option<TeamRecord>>>;

    /// Create a user.
    fn create_user(&self, username: String) -> BoxFuture<'static, StorageResult<UserRecord>>;

    /// Fetch a user by id.
    fn find_user(&self, user_id: i64) -> BoxFuture<'static, StorageResult<Option<UserRecord>>>;

    /// Acquire the per-game mutex serializing writes to one game.
    fn game_lock(&self, game_id: i64) -> BoxFuture<'static, OwnedMutexGuard<()>>;

    /// Report whether the backend can serve requests.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
