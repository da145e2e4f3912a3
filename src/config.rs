//! Application-level configuration loading for the realtime hub tuning knobs.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COURTSIDE_BACK_CONFIG_PATH";

/// Number of broadcast messages a game room retains for late joiners.
const DEFAULT_ROOM_HISTORY_LIMIT: usize = 100;
/// Seconds a room may sit with zero spectators before the sweeper evicts it.
const DEFAULT_ROOM_IDLE_EVICTION_SECS: u64 = 30 * 60;
/// Seconds between two idle-room sweep passes.
const DEFAULT_ROOM_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    room_history_limit: usize,
    room_idle_eviction: Duration,
    room_sweep_interval: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), ?config, "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Maximum number of broadcast messages retained per game room.
    pub fn room_history_limit(&self) -> usize {
        self.room_history_limit
    }

    /// How long a room may stay empty before it is evicted.
    pub fn room_idle_eviction(&self) -> Duration {
        self.room_idle_eviction
    }

    /// Interval between idle-room sweep passes.
    pub fn room_sweep_interval(&self) -> Duration {
        self.room_sweep_interval
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            room_history_limit: DEFAULT_ROOM_HISTORY_LIMIT,
            room_idle_eviction: Duration::from_secs(DEFAULT_ROOM_IDLE_EVICTION_SECS),
            room_sweep_interval: Duration::from_secs(DEFAULT_ROOM_SWEEP_INTERVAL_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    room_history_limit: Option<usize>,
    room_idle_eviction_secs: Option<u64>,
    room_sweep_interval_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            room_history_limit: raw.room_history_limit.unwrap_or(defaults.room_history_limit),
            room_idle_eviction: raw
                .room_idle_eviction_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.room_idle_eviction),
            room_sweep_interval: raw
                .room_sweep_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.room_sweep_interval),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
