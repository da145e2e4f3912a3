//! Courtside backend: a live basketball game ledger with validated event
//! ingest, statistics aggregation, a lifecycle state machine and realtime
//! spectator rooms over WebSocket.

pub mod auth;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
