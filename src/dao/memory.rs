//! In-memory reference implementation of [`GameStore`].

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    dao::{
        models::{
            EventRecord, GameRecord, NewEvent, NewGame, PlayerGameStatsRecord, RosterEntry,
            StatTotals, TeamRecord, UserRecord,
        },
        store::{GameStore, StorageResult},
    },
    state::lifecycle::GameStatus,
};

/// Concurrent in-memory store backing development deployments and tests.
///
/// Sharded maps keep reads cheap; the per-game mutexes handed out by
/// [`GameStore::game_lock`] are what serialize ledger writes, not the maps.
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<i64, GameRecord>,
    events: DashMap<i64, Vec<EventRecord>>,
    stats: DashMap<(i64, i64), PlayerGameStatsRecord>,
    rosters: DashMap<i64, Vec<RosterEntry>>,
    teams: DashMap<i64, TeamRecord>,
    users: DashMap<i64, UserRecord>,
    locks: DashMap<i64, Arc<Mutex<()>>>,
    game_seq: AtomicI64,
    event_seq: AtomicI64,
    team_seq: AtomicI64,
    user_seq: AtomicI64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next(seq: &AtomicI64) -> i64 {
        seq.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl GameStore for MemoryStore {
    fn create_game(&self, input: NewGame) -> BoxFuture<'static, StorageResult<GameRecord>> {
        let now = OffsetDateTime::now_utc();
        let game = GameRecord {
            id: Self::next(&self.game_seq),
            title: input.title,
            location: input.location,
            home_team_id: input.home_team_id,
            away_team_id: input.away_team_id,
            home_score: 0,
            away_score: 0,
            status: GameStatus::Scheduled,
            timeout_active: false,
            timeout_started_at: None,
            created_by: input.created_by,
            tournament_id: input.tournament_id,
            started_at: None,
            ended_at: None,
            created_at: now,
            updated_at: now,
        };
        self.games.insert(game.id, game.clone());
        self.events.insert(game.id, Vec::new());
        self.rosters.insert(game.id, Vec::new());
        Box::pin(async move { Ok(game) })
    }

    fn find_game(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Option<GameRecord>>> {
        let found = self.games.get(&game_id).map(|entry| entry.clone());
        Box::pin(async move { Ok(found) })
    }

    fn update_game(&self, mut game: GameRecord) -> BoxFuture<'static, StorageResult<GameRecord>> {
        game.updated_at = OffsetDateTime::now_utc();
        self.games.insert(game.id, game.clone());
        Box::pin(async move { Ok(game) })
    }

    fn list_games(
        &self,
        status: Option<GameStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecord>>> {
        let mut games: Vec<GameRecord> = self
            .games
            .iter()
            .map(|entry| entry.clone())
            .filter(|game| status.is_none_or(|wanted| game.status == wanted))
            .collect();
        games.sort_by(|a, b| b.id.cmp(&a.id));
        Box::pin(async move { Ok(games) })
    }

    fn append_event(&self, input: NewEvent) -> BoxFuture<'static, StorageResult<EventRecord>> {
        let event = EventRecord {
            id: Self::next(&self.event_seq),
            game_id: input.game_id,
            user_id: input.user_id,
            team_id: input.team_id,
            event_type: input.event_type,
            period: input.period,
            timestamp: input.timestamp,
            outcome: input.outcome,
            created_at: OffsetDateTime::now_utc(),
        };
        self.events
            .entry(input.game_id)
            .or_default()
            .push(event.clone());
        Box::pin(async move { Ok(event) })
    }

    fn list_events(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Vec<EventRecord>>> {
        let mut events = self
            .events
            .get(&game_id)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        events.sort_by_key(|event| (event.timestamp, event.id));
        Box::pin(async move { Ok(events) })
    }

    fn delete_event(
        &self,
        game_id: i64,
        event_id: i64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let removed = match self.events.get_mut(&game_id) {
            Some(mut entry) => {
                let before = entry.len();
                entry.retain(|event| event.id != event_id);
                entry.len() != before
            }
            None => false,
        };
        Box::pin(async move { Ok(removed) })
    }

    fn upsert_player_game_stats(
        &self,
        player_id: i64,
        game_id: i64,
        totals: StatTotals,
    ) -> BoxFuture<'static, StorageResult<PlayerGameStatsRecord>> {
        let now = OffsetDateTime::now_utc();
        let record = self
            .stats
            .entry((player_id, game_id))
            .and_modify(|existing| {
                existing.totals = totals.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| PlayerGameStatsRecord {
                player_id,
                game_id,
                totals,
                created_at: now,
                updated_at: now,
            })
            .clone();
        Box::pin(async move { Ok(record) })
    }

    fn list_player_game_stats(
        &self,
        player_id: i64,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerGameStatsRecord>>> {
        let mut snapshots: Vec<PlayerGameStatsRecord> = self
            .stats
            .iter()
            .filter(|entry| entry.key().0 == player_id)
            .map(|entry| entry.clone())
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.game_id);
        Box::pin(async move { Ok(snapshots) })
    }

    fn find_player_game_stats(
        &self,
        player_id: i64,
        game_id: i64,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerGameStatsRecord>>> {
        let found = self
            .stats
            .get(&(player_id, game_id))
            .map(|entry| entry.clone());
        Box::pin(async move { Ok(found) })
    }

    fn add_roster_entry(&self, entry: RosterEntry) -> BoxFuture<'static, StorageResult<()>> {
        self.rosters.entry(entry.game_id).or_default().push(entry);
        Box::pin(async move { Ok(()) })
    }

    fn list_roster(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Vec<RosterEntry>>> {
        let roster = self
            .rosters
            .get(&game_id)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        Box::pin(async move { Ok(roster) })
    }

    fn create_team(
        &self,
        name: String,
        owner_id: i64,
        city: Option<String>,
    ) -> BoxFuture<'static, StorageResult<TeamRecord>> {
        let team = TeamRecord {
            id: Self::next(&self.team_seq),
            name,
            owner_id,
            city,
        };
        self.teams.insert(team.id, team.clone());
        Box::pin(async move { Ok(team) })
    }

    fn find_team(&self, team_id: i64) -> BoxFuture<'static, StorageResult<Option<TeamRecord>>> {
        let found = self.teams.get(&team_id).map(|entry| entry.clone());
        Box::pin(async move { Ok(found) })
    }

    fn create_user(&self, username: String) -> BoxFuture<'static, StorageResult<UserRecord>> {
        let user = UserRecord {
            id: Self::next(&self.user_seq),
            username,
        };
        self.users.insert(user.id, user.clone());
        Box::pin(async move { Ok(user) })
    }

    fn find_user(&self, user_id: i64) -> BoxFuture<'static, StorageResult<Option<UserRecord>>> {
        let found = self.users.get(&user_id).map(|entry| entry.clone());
        Box::pin(async move { Ok(found) })
    }

    fn game_lock(&self, game_id: i64) -> BoxFuture<'static, OwnedMutexGuard<()>> {
        let lock = self
            .locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Box::pin(async move { lock.lock_owned().await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{EventType, Outcome};

    fn new_game(store: &MemoryStore) -> BoxFuture<'static, StorageResult<GameRecord>> {
        store.create_game(NewGame {
            title: "Test Game".into(),
            location: None,
            home_team_id: 1,
            away_team_id: 2,
            created_by: 1,
            tournament_id: None,
        })
    }

    #[tokio::test]
    async fn created_game_starts_scheduled_with_zero_scores() {
        let store = MemoryStore::new();
        let game = new_game(&store).await.unwrap();
        assert_eq!(game.status, GameStatus::Scheduled);
        assert_eq!((game.home_score, game.away_score), (0, 0));
        assert!(store.find_game(game.id).await.unwrap().is_some());
        assert!(store.find_game(game.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn events_list_in_clock_order_with_insertion_tiebreak() {
        let store = MemoryStore::new();
        let game = new_game(&store).await.unwrap();
        for (timestamp, event_type) in [
            (30, EventType::Rebound),
            (10, EventType::TwoPoint),
            (10, EventType::Assist),
        ] {
            store
                .append_event(NewEvent {
                    game_id: game.id,
                    user_id: Some(5),
                    team_id: 1,
                    event_type,
                    period: 1,
                    timestamp,
                    outcome: (event_type == EventType::TwoPoint).then_some(Outcome::Made),
                })
                .await
                .unwrap();
        }

        let events = store.list_events(game.id).await.unwrap();
        let order: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            order,
            vec![EventType::TwoPoint, EventType::Assist, EventType::Rebound]
        );
    }

    #[tokio::test]
    async fn delete_event_reports_existence() {
        let store = MemoryStore::new();
        let game = new_game(&store).await.unwrap();
        let event = store
            .append_event(NewEvent {
                game_id: game.id,
                user_id: Some(5),
                team_id: 1,
                event_type: EventType::Assist,
                period: 1,
                timestamp: 12,
                outcome: None,
            })
            .await
            .unwrap();

        assert!(store.delete_event(game.id, event.id).await.unwrap());
        assert!(!store.delete_event(game.id, event.id).await.unwrap());
        assert!(store.list_events(game.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_upsert_overwrites_in_place() {
        let store = MemoryStore::new();
        let first = StatTotals {
            points: 4,
            ..StatTotals::default()
        };
        let second = StatTotals {
            points: 9,
            ..StatTotals::default()
        };

        store.upsert_player_game_stats(7, 1, first).await.unwrap();
        let updated = store.upsert_player_game_stats(7, 1, second).await.unwrap();
        assert_eq!(updated.totals.points, 9);

        let snapshots = store.list_player_game_stats(7).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].totals.points, 9);

        let found = store.find_player_game_stats(7, 1).await.unwrap();
        assert_eq!(found.unwrap().totals.points, 9);
        assert!(store.find_player_game_stats(7, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_games_filters_by_status() {
        let store = MemoryStore::new();
        let scheduled = new_game(&store).await.unwrap();
        let mut live = new_game(&store).await.unwrap();
        live.status = GameStatus::InProgress;
        store.update_game(live.clone()).await.unwrap();

        let all = store.list_games(None).await.unwrap();
        assert_eq!(all.len(), 2);
        // Newest first.
        assert_eq!(all[0].id, live.id);

        let only_live = store
            .list_games(Some(GameStatus::InProgress))
            .await
            .unwrap();
        assert_eq!(only_live.len(), 1);
        assert_eq!(only_live[0].id, live.id);
        let _ = scheduled;
    }

    #[tokio::test]
    async fn game_lock_serializes_same_game_only() {
        let store = Arc::new(MemoryStore::new());
        let guard = store.game_lock(1).await;
        // A different game's lock is free while game 1 is held.
        let other = store.game_lock(2).await;
        drop(other);
        drop(guard);
        // Reacquisition after drop succeeds.
        let _again = store.game_lock(1).await;
    }
}
