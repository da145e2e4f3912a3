//! Shared application state and the game lifecycle machine.

pub mod lifecycle;
pub mod rooms;

use std::sync::Arc;

use crate::{auth::Identity, config::AppConfig, dao::store::GameStore, state::rooms::RoomRegistry};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Dependencies every handler and service reaches through.
pub struct AppState {
    store: Arc<dyn GameStore>,
    identity: Arc<dyn Identity>,
    rooms: RoomRegistry,
    config: AppConfig,
}

impl AppState {
    /// Assemble the state from its collaborators.
    pub fn new(store: Arc<dyn GameStore>, identity: Arc<dyn Identity>, config: AppConfig) -> Self {
        let rooms = RoomRegistry::new(config.room_history_limit());
        Self {
            store,
            identity,
            rooms,
            config,
        }
    }

    /// Storage backend.
    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    /// Identity collaborator.
    pub fn identity(&self) -> &Arc<dyn Identity> {
        &self.identity
    }

    /// Live game rooms.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
