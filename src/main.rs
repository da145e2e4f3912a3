//! Server entrypoint.

use std::{env, sync::Arc};

use anyhow::Context;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use courtside_back::{
    auth::TokenRegistry,
    config::AppConfig,
    dao::memory::MemoryStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::load();
    let state: SharedState = Arc::new(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(TokenRegistry::new()),
        config,
    ));

    spawn_room_sweeper(state.clone());

    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let port = env::var("PORT").unwrap_or_else(|_| String::from("8080"));
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Periodically evict game rooms that have sat empty past the idle window.
fn spawn_room_sweeper(state: SharedState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(state.config().room_sweep_interval());
        loop {
            ticker.tick().await;
            let evicted = state.rooms().evict_idle(state.config().room_idle_eviction());
            if evicted > 0 {
                info!(evicted, "swept idle game rooms");
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
