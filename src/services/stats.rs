//! Statistics aggregation: live box scores, finalized snapshots and careers.

use std::collections::HashMap;

use crate::{
    dao::models::{
        EventRecord, EventType, GameRecord, Outcome, PlayerGameStatsRecord, RosterEntry,
        StatTotals, TeamRecord,
    },
    dto::{
        broadcast::ScoreboardUpdate,
        game::EventDto,
        now_timestamp,
        stats::{CareerStatsDto, GameStatsSummaryDto, LeaderDto, PlayerStatsDto, TeamScoreDto},
    },
};

/// Fold one ledger event into a player's running totals.
///
/// Bookkeeping events (`SUB`, `TO`, period markers) contribute nothing.
fn fold_event(totals: &mut StatTotals, event: &EventRecord) {
    let made = event.outcome == Some(Outcome::Made);
    match event.event_type {
        EventType::TwoPoint => {
            totals.shots_attempted += 1;
            totals.two_pointers_attempted += 1;
            if made {
                totals.shots_made += 1;
                totals.two_pointers_made += 1;
                totals.points += 2;
            }
        }
        EventType::ThreePoint => {
            totals.shots_attempted += 1;
            totals.three_pointers_attempted += 1;
            if made {
                totals.shots_made += 1;
                totals.three_pointers_made += 1;
                totals.points += 3;
            }
        }
        // Free throws never touch the combined field-goal buckets; those
        // feed the shooting percentage and cover 2PT + 3PT only.
        EventType::FreeThrow => {
            totals.free_throws_attempted += 1;
            if made {
                totals.free_throws_made += 1;
                totals.points += 1;
            }
        }
        EventType::Assist => totals.assists += 1,
        EventType::Rebound => totals.rebounds += 1,
        kind if kind.is_foul() => totals.fouls += 1,
        kind if kind.is_violation() => totals.violations += 1,
        _ => {}
    }
}

/// Compute per-player totals from a game's ledger.
///
/// Events without an acting player are skipped; they carry no player stats.
pub fn compute_player_totals(events: &[EventRecord]) -> HashMap<i64, StatTotals> {
    let mut totals: HashMap<i64, StatTotals> = HashMap::new();
    for event in events {
        let Some(user_id) = event.user_id else {
            continue;
        };
        fold_event(totals.entry(user_id).or_default(), event);
    }
    totals
}

/// `made / attempted * 100` rounded to one decimal, 0.0 when nothing was attempted.
pub fn shooting_percentage(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    let pct = f64::from(made) / f64::from(attempted) * 100.0;
    (pct * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render one player's totals as a live box-score line.
pub fn player_stats_line(player_id: i64, name: Option<String>, totals: &StatTotals) -> PlayerStatsDto {
    let fga = totals.two_pointers_attempted + totals.three_pointers_attempted;
    let fgm = totals.two_pointers_made + totals.three_pointers_made;
    PlayerStatsDto {
        player_id,
        name,
        points: totals.points,
        fga,
        fgm,
        fg_pct: shooting_percentage(fgm, fga),
        three_pa: totals.three_pointers_attempted,
        three_pm: totals.three_pointers_made,
        three_pct: shooting_percentage(totals.three_pointers_made, totals.three_pointers_attempted),
        fta: totals.free_throws_attempted,
        ftm: totals.free_throws_made,
        ft_pct: shooting_percentage(totals.free_throws_made, totals.free_throws_attempted),
        ast: totals.assists,
        reb: totals.rebounds,
        fls: totals.fouls,
        violations: totals.violations,
    }
}

/// Build one team's live line: player lines plus team points, fouls and
/// timeouts. Team points are the sum of its players' points; timeouts are
/// counted from the team's `TO` events.
pub fn team_score(
    team: &TeamRecord,
    roster: &[RosterEntry],
    events: &[EventRecord],
    names: &HashMap<i64, String>,
) -> TeamScoreDto {
    let totals = compute_player_totals(events);
    let mut players: Vec<PlayerStatsDto> = roster
        .iter()
        .filter(|entry| entry.team_id == team.id)
        .map(|entry| {
            let line = totals.get(&entry.user_id).cloned().unwrap_or_default();
            player_stats_line(entry.user_id, names.get(&entry.user_id).cloned(), &line)
        })
        .collect();
    players.sort_by(|a, b| b.points.cmp(&a.points).then(a.player_id.cmp(&b.player_id)));

    let timeouts = events
        .iter()
        .filter(|event| event.team_id == team.id && event.event_type == EventType::Timeout)
        .count() as u32;

    TeamScoreDto {
        team_id: team.id,
        team_name: team.name.clone(),
        points: players.iter().map(|line| line.points).sum(),
        fouls: players.iter().map(|line| line.fls).sum(),
        timeouts,
        players,
    }
}

/// Current period of a game: the latest `PERIOD_START` marker, else 1.
pub fn current_period(events: &[EventRecord]) -> u8 {
    events
        .iter()
        .filter(|event| event.event_type == EventType::PeriodStart)
        .map(|event| event.period)
        .max()
        .unwrap_or(1)
}

/// Build the full scoreboard snapshot broadcast after every mutation.
pub fn build_scoreboard(
    game: &GameRecord,
    home_team: &TeamRecord,
    away_team: &TeamRecord,
    roster: &[RosterEntry],
    events: &[EventRecord],
    names: &HashMap<i64, String>,
) -> ScoreboardUpdate {
    let latest_event = events
        .iter()
        .max_by_key(|event| (event.timestamp, event.id))
        .map(EventDto::from);
    ScoreboardUpdate {
        game_id: game.id,
        game_status: game.status,
        period: current_period(events),
        home_team: team_score(home_team, roster, events, names),
        away_team: team_score(away_team, roster, events, names),
        latest_event,
        timestamp: now_timestamp(),
    }
}

/// Aggregate a player's finalized snapshots into career totals.
///
/// Averages use two decimals and degrade to 0.0 when the player has no games
/// or no attempts.
pub fn career_stats(user_id: i64, snapshots: &[PlayerGameStatsRecord]) -> CareerStatsDto {
    let total_games = snapshots.len() as u32;
    let mut career = StatTotals::default();
    for snapshot in snapshots {
        let t = &snapshot.totals;
        career.points += t.points;
        career.assists += t.assists;
        career.rebounds += t.rebounds;
        career.fouls += t.fouls;
        career.violations += t.violations;
        career.shots_made += t.shots_made;
        career.shots_attempted += t.shots_attempted;
    }

    let average_points_per_game = if total_games == 0 {
        0.0
    } else {
        round2(f64::from(career.points) / f64::from(total_games))
    };
    let career_shooting_percentage = if career.shots_attempted == 0 {
        0.0
    } else {
        round2(f64::from(career.shots_made) / f64::from(career.shots_attempted) * 100.0)
    };

    CareerStatsDto {
        user_id,
        total_games,
        total_points: career.points,
        average_points_per_game,
        total_assists: career.assists,
        total_rebounds: career.rebounds,
        total_fouls: career.fouls,
        total_violations: career.violations,
        total_shots_made: career.shots_made,
        total_shots_attempted: career.shots_attempted,
        career_shooting_percentage,
    }
}

fn leaders<F>(
    roster: &[RosterEntry],
    totals: &HashMap<i64, StatTotals>,
    names: &HashMap<i64, String>,
    team_filter: Option<i64>,
    value: F,
) -> Vec<LeaderDto>
where
    F: Fn(&StatTotals) -> u32,
{
    let mut lines: Vec<LeaderDto> = roster
        .iter()
        .filter(|entry| team_filter.is_none_or(|team_id| entry.team_id == team_id))
        .map(|entry| {
            let stat = totals.get(&entry.user_id).map(&value).unwrap_or(0);
            LeaderDto {
                player_id: entry.user_id,
                name: names.get(&entry.user_id).cloned(),
                team_id: entry.team_id,
                value: stat,
            }
        })
        .filter(|leader| leader.value > 0)
        .collect();
    lines.sort_by(|a, b| b.value.cmp(&a.value).then(a.player_id.cmp(&b.player_id)));
    lines.truncate(2);
    lines
}

/// Build the narrative summary: top scorers per team and the foul leaders.
pub fn game_stats_summary(
    game: &GameRecord,
    roster: &[RosterEntry],
    events: &[EventRecord],
    names: &HashMap<i64, String>,
) -> GameStatsSummaryDto {
    let totals = compute_player_totals(events);
    GameStatsSummaryDto {
        game_id: game.id,
        home_top_scorers: leaders(roster, &totals, names, Some(game.home_team_id), |t| t.points),
        away_top_scorers: leaders(roster, &totals, names, Some(game.away_team_id), |t| t.points),
        most_fouls: leaders(roster, &totals, names, None, |t| t.fouls),
    }
}

/// Live box-score line for one rostered player, folded from the current
/// ledger on every call.
pub async fn live_player_stats(
    state: &crate::state::AppState,
    game_id: i64,
    player_id: i64,
) -> Result<PlayerStatsDto, crate::error::ServiceError> {
    use crate::error::ServiceError;

    state
        .store()
        .find_game(game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game {game_id}")))?;
    let roster = state.store().list_roster(game_id).await?;
    if !roster.iter().any(|entry| entry.user_id == player_id) {
        return Err(ServiceError::NotFound(format!(
            "player {player_id} is not on this game's roster"
        )));
    }

    let events = state.store().list_events(game_id).await?;
    let totals = compute_player_totals(&events);
    let line = totals.get(&player_id).cloned().unwrap_or_default();
    let name = state
        .store()
        .find_user(player_id)
        .await?
        .map(|user| user.username);
    Ok(player_stats_line(player_id, name, &line))
}

/// Post-hoc summary of a game's leaders.
pub async fn game_summary(
    state: &crate::state::AppState,
    game_id: i64,
) -> Result<GameStatsSummaryDto, crate::error::ServiceError> {
    use crate::{error::ServiceError, services::game_service};

    let game = state
        .store()
        .find_game(game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game {game_id}")))?;
    let roster = state.store().list_roster(game_id).await?;
    let events = state.store().list_events(game_id).await?;
    let names = game_service::roster_names(state, &roster).await?;
    Ok(game_stats_summary(&game, &roster, &events, &names))
}

/// All finalized per-game snapshots for one player.
pub async fn player_game_stats(
    state: &crate::state::AppState,
    player_id: i64,
) -> Result<Vec<crate::dto::stats::PlayerGameStatsDto>, crate::error::ServiceError> {
    use crate::{dto::stats::PlayerGameStatsDto, error::ServiceError};

    state
        .store()
        .find_user(player_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user {player_id}")))?;
    let snapshots = state.store().list_player_game_stats(player_id).await?;
    Ok(snapshots
        .into_iter()
        .map(|snapshot| PlayerGameStatsDto {
            game_id: snapshot.game_id,
            points: snapshot.totals.points,
            assists: snapshot.totals.assists,
            rebounds: snapshot.totals.rebounds,
            fouls: snapshot.totals.fouls,
            violations: snapshot.totals.violations,
            shots_made: snapshot.totals.shots_made,
            shots_attempted: snapshot.totals.shots_attempted,
            two_pointers_made: snapshot.totals.two_pointers_made,
            two_pointers_attempted: snapshot.totals.two_pointers_attempted,
            three_pointers_made: snapshot.totals.three_pointers_made,
            three_pointers_attempted: snapshot.totals.three_pointers_attempted,
            free_throws_made: snapshot.totals.free_throws_made,
            free_throws_attempted: snapshot.totals.free_throws_attempted,
        })
        .collect())
}

/// Career aggregate over every finalized snapshot of one player.
pub async fn career(
    state: &crate::state::AppState,
    player_id: i64,
) -> Result<CareerStatsDto, crate::error::ServiceError> {
    use crate::error::ServiceError;

    state
        .store()
        .find_user(player_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user {player_id}")))?;
    let snapshots = state.store().list_player_game_stats(player_id).await?;
    Ok(career_stats(player_id, &snapshots))
}
