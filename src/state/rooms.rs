//! Per-game broadcast rooms and their registry.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::dto::broadcast::{RoomMessage, ScoreboardUpdate};

/// One spectator attached to a game room.
#[derive(Debug, Clone)]
pub struct SpectatorConnection {
    /// Server-assigned connection identifier.
    pub id: String,
    /// The spectator's user id.
    pub user_id: i64,
    /// The spectator's display handle.
    pub username: String,
    /// Channel feeding the connection's socket writer task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Fan-out hub for one game.
///
/// History is capped; the scoreboard slot keeps only the latest snapshot so a
/// late joiner can render immediately without replaying the ledger.
pub struct GameRoom {
    game_id: i64,
    spectators: DashMap<String, SpectatorConnection>,
    history: Mutex<VecDeque<serde_json::Value>>,
    history_limit: usize,
    scoreboard: Mutex<Option<ScoreboardUpdate>>,
    last_activity: Mutex<Instant>,
}

impl GameRoom {
    fn new(game_id: i64, history_limit: usize) -> Self {
        Self {
            game_id,
            spectators: DashMap::new(),
            history: Mutex::new(VecDeque::with_capacity(history_limit)),
            history_limit,
            scoreboard: Mutex::new(None),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    /// The game this room serves.
    pub fn game_id(&self) -> i64 {
        self.game_id
    }

    /// Attach a spectator.
    pub fn join(&self, connection: SpectatorConnection) {
        self.touch();
        self.spectators.insert(connection.id.clone(), connection);
    }

    /// Detach a spectator by connection id.
    pub fn leave(&self, connection_id: &str) {
        self.touch();
        self.spectators.remove(connection_id);
    }

    /// Number of currently attached spectators.
    pub fn spectator_count(&self) -> usize {
        self.spectators.len()
    }

    /// Usernames of currently attached spectators.
    pub fn spectator_names(&self) -> Vec<String> {
        self.spectators
            .iter()
            .map(|entry| entry.username.clone())
            .collect()
    }

    /// Serialize the message once, record it in history and push it to every
    /// attached spectator. Dead senders are dropped on the spot.
    pub fn broadcast(&self, message: &RoomMessage) {
        let Some(json) = message.json() else {
            return;
        };
        self.touch();

        if let RoomMessage::ScoreboardUpdate(update) = message
            && let Ok(mut slot) = self.scoreboard.lock()
        {
            *slot = Some(update.clone());
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&json)
            && let Ok(mut history) = self.history.lock()
        {
            if history.len() == self.history_limit {
                history.pop_front();
            }
            history.push_back(value);
        }

        let mut dead = Vec::new();
        for entry in self.spectators.iter() {
            if entry.tx.send(Message::Text(json.clone().into())).is_err() {
                dead.push(entry.id.clone());
            }
        }
        for id in dead {
            warn!(game_id = self.game_id, connection_id = %id, "dropping dead spectator sender");
            self.spectators.remove(&id);
        }
    }

    /// Recent broadcast history, oldest first.
    pub fn recent_events(&self) -> Vec<serde_json::Value> {
        self.history
            .lock()
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Latest scoreboard snapshot broadcast in this room, if any.
    pub fn scoreboard(&self) -> Option<ScoreboardUpdate> {
        self.scoreboard.lock().ok().and_then(|slot| slot.clone())
    }

    /// Whether the room has sat empty for at least `window`.
    pub fn idle_for(&self, window: Duration) -> bool {
        if !self.spectators.is_empty() {
            return false;
        }
        self.last_activity
            .lock()
            .map(|at| at.elapsed() >= window)
            .unwrap_or(false)
    }

    fn touch(&self) {
        if let Ok(mut at) = self.last_activity.lock() {
            *at = Instant::now();
        }
    }
}

/// Registry of live game rooms.
pub struct RoomRegistry {
    rooms: DashMap<i64, Arc<GameRoom>>,
    history_limit: usize,
}

impl RoomRegistry {
    /// Create a registry whose rooms retain `history_limit` messages.
    pub fn new(history_limit: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            history_limit,
        }
    }

    /// Fetch or lazily create the room for a game.
    pub fn room(&self, game_id: i64) -> Arc<GameRoom> {
        self.rooms
            .entry(game_id)
            .or_insert_with(|| Arc::new(GameRoom::new(game_id, self.history_limit)))
            .clone()
    }

    /// Fetch the room for a game only if one already exists.
    pub fn get(&self, game_id: i64) -> Option<Arc<GameRoom>> {
        self.rooms.get(&game_id).map(|entry| entry.clone())
    }

    /// Ids of games with at least one attached spectator.
    pub fn active_games(&self) -> Vec<(i64, usize)> {
        self.rooms
            .iter()
            .filter(|entry| entry.spectator_count() > 0)
            .map(|entry| (*entry.key(), entry.spectator_count()))
            .collect()
    }

    /// Evict rooms that have sat empty for at least `window`. Returns the
    /// number evicted.
    pub fn evict_idle(&self, window: Duration) -> usize {
        let stale: Vec<i64> = self
            .rooms
            .iter()
            .filter(|entry| entry.idle_for(window))
            .map(|entry| *entry.key())
            .collect();
        for game_id in &stale {
            debug!(game_id, "evicting idle game room");
            self.rooms.remove(game_id);
        }
        stale.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::broadcast::ChatMessage;

    fn chat(text: &str) -> RoomMessage {
        RoomMessage::Chat(ChatMessage {
            game_id: 1,
            user_id: 2,
            username: "fan".into(),
            message: text.into(),
            timestamp: "2026-01-01T00:00:00Z".into(),
        })
    }

    fn spectator(id: &str) -> (SpectatorConnection, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            SpectatorConnection {
                id: id.into(),
                user_id: 2,
                username: "fan".into(),
                tx,
            },
            rx,
        )
    }

    #[tokio::test]
    async fn broadcast_reaches_all_spectators() {
        let registry = RoomRegistry::new(10);
        let room = registry.room(1);
        let (a, mut rx_a) = spectator("a");
        let (b, mut rx_b) = spectator("b");
        room.join(a);
        room.join(b);

        room.broadcast(&chat("hello"));
        assert!(matches!(rx_a.recv().await, Some(Message::Text(_))));
        assert!(matches!(rx_b.recv().await, Some(Message::Text(_))));
    }

    #[tokio::test]
    async fn history_is_capped_at_limit() {
        let registry = RoomRegistry::new(3);
        let room = registry.room(1);
        for i in 0..5 {
            room.broadcast(&chat(&format!("m{i}")));
        }

        let history = room.recent_events();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0]["message"], "m2");
        assert_eq!(history[2]["message"], "m4");
    }

    #[tokio::test]
    async fn dead_senders_are_pruned_on_broadcast() {
        let registry = RoomRegistry::new(10);
        let room = registry.room(1);
        let (a, rx_a) = spectator("a");
        room.join(a);
        drop(rx_a);

        room.broadcast(&chat("anyone there"));
        assert_eq!(room.spectator_count(), 0);
    }

    #[tokio::test]
    async fn idle_rooms_are_evicted_and_occupied_ones_kept() {
        let registry = RoomRegistry::new(10);
        let occupied = registry.room(1);
        let (a, _rx) = spectator("a");
        occupied.join(a);
        let _empty = registry.room(2);

        // Zero window makes the empty room immediately stale.
        let evicted = registry.evict_idle(Duration::ZERO);
        assert_eq!(evicted, 1);
        assert!(registry.get(1).is_some());
        assert!(registry.get(2).is_none());
    }

    #[tokio::test]
    async fn active_games_lists_only_occupied_rooms() {
        let registry = RoomRegistry::new(10);
        let room = registry.room(7);
        let (a, _rx) = spectator("a");
        room.join(a);
        let _empty = registry.room(8);

        let active = registry.active_games();
        assert_eq!(active, vec![(7, 1)]);
    }
}
