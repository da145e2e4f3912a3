//! Domain services: validation, ledger, statistics, lifecycle and fan-out.

pub mod broadcast;
pub mod game_service;
pub mod ledger;
pub mod stats;
pub mod validation;
pub mod websocket_service;
