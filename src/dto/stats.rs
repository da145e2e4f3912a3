//! Statistics response bodies.

use serde::Serialize;
use utoipa::ToSchema;

/// Live box-score line for one player in one game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerStatsDto {
    /// Player's user id.
    pub player_id: i64,
    /// Display handle, when known.
    pub name: Option<String>,
    /// Points scored.
    pub points: u32,
    /// Field goals attempted (2PT and 3PT).
    pub fga: u32,
    /// Field goals made.
    pub fgm: u32,
    /// Field-goal percentage, one decimal.
    pub fg_pct: f64,
    /// Three-pointers attempted.
    pub three_pa: u32,
    /// Three-pointers made.
    pub three_pm: u32,
    /// Three-point percentage, one decimal.
    pub three_pct: f64,
    /// Free throws attempted.
    pub fta: u32,
    /// Free throws made.
    pub ftm: u32,
    /// Free-throw percentage, one decimal.
    pub ft_pct: f64,
    /// Assists.
    pub ast: u32,
    /// Rebounds.
    pub reb: u32,
    /// Fouls.
    pub fls: u32,
    /// Violations.
    pub violations: u32,
}

/// Aggregated live line for one team in one game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamScoreDto {
    /// Team id.
    pub team_id: i64,
    /// Team display name.
    pub team_name: String,
    /// Points, summed from player totals.
    pub points: u32,
    /// Fouls, summed from player totals.
    pub fouls: u32,
    /// Timeouts taken, counted from `TO` events.
    pub timeouts: u32,
    /// Per-player lines.
    pub players: Vec<PlayerStatsDto>,
}

/// A finalized per-game snapshot for one player.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerGameStatsDto {
    /// Game the snapshot was computed from.
    pub game_id: i64,
    /// Points.
    pub points: u32,
    /// Assists.
    pub assists: u32,
    /// Rebounds.
    pub rebounds: u32,
    /// Fouls.
    pub fouls: u32,
    /// Violations.
    pub violations: u32,
    /// Field goals made, two- and three-pointers combined.
    pub shots_made: u32,
    /// Field goals attempted, two- and three-pointers combined.
    pub shots_attempted: u32,
    /// Two-pointers made.
    pub two_pointers_made: u32,
    /// Two-pointers attempted.
    pub two_pointers_attempted: u32,
    /// Three-pointers made.
    pub three_pointers_made: u32,
    /// Three-pointers attempted.
    pub three_pointers_attempted: u32,
    /// Free throws made.
    pub free_throws_made: u32,
    /// Free throws attempted.
    pub free_throws_attempted: u32,
}

/// Career aggregate across all finalized games.
#[derive(Debug, Serialize, ToSchema)]
pub struct CareerStatsDto {
    /// Player's user id.
    pub user_id: i64,
    /// Number of finalized games with a snapshot.
    pub total_games: u32,
    /// Points across all snapshots.
    pub total_points: u32,
    /// Average points per game, two decimals, 0.0 with no games.
    pub average_points_per_game: f64,
    /// Assists across all snapshots.
    pub total_assists: u32,
    /// Rebounds across all snapshots.
    pub total_rebounds: u32,
    /// Fouls across all snapshots.
    pub total_fouls: u32,
    /// Violations across all snapshots.
    pub total_violations: u32,
    /// Field goals made across all snapshots.
    pub total_shots_made: u32,
    /// Field goals attempted across all snapshots.
    pub total_shots_attempted: u32,
    /// Career field-goal percentage, two decimals, 0.0 with no attempts.
    pub career_shooting_percentage: f64,
}

/// A leader line inside the game summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderDto {
    /// Player's user id.
    pub player_id: i64,
    /// Display handle, when known.
    pub name: Option<String>,
    /// Team the player plays for.
    pub team_id: i64,
    /// The leading value (points or fouls).
    pub value: u32,
}

/// Post-hoc narrative summary of a game.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameStatsSummaryDto {
    /// Game id.
    pub game_id: i64,
    /// Top scorers of the home team, at most two.
    pub home_top_scorers: Vec<LeaderDto>,
    /// Top scorers of the away team, at most two.
    pub away_top_scorers: Vec<LeaderDto>,
    /// Players with the most fouls, both teams, at most two.
    pub most_fouls: Vec<LeaderDto>,
}
