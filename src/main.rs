//! petrealm server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use petrealm::app_state::AppState;
use petrealm::build_app;
use petrealm::config::GameConfig;
use petrealm::domain::{EventBus, GameStore, SystemClock};
use petrealm::persistence::postgres::PostgresPersistence;
use petrealm::persistence::worker::{spawn_event_log_task, spawn_snapshot_task};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = GameConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting petrealm");

    let store = Arc::new(GameStore::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    let persistence = if config.persistence_enabled {
        Some(start_persistence(&config, &store, &event_bus).await?)
    } else {
        tracing::info!("persistence disabled; state lives in memory only");
        None
    };

    let app_state = AppState::new(
        &config,
        Arc::clone(&store),
        Arc::new(SystemClock),
        event_bus,
    );
    let app = build_app(app_state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(persistence) = persistence {
        let rows = persistence.save_snapshot(&store.export().await).await?;
        tracing::info!(rows, "final snapshot saved");
    }
    Ok(())
}

/// `LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` sets the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Connects, migrates, restores the last snapshot and starts the
/// background writers.
async fn start_persistence(
    config: &GameConfig,
    store: &Arc<GameStore>,
    event_bus: &EventBus,
) -> anyhow::Result<PostgresPersistence> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    let persistence = PostgresPersistence::new(pool);
    persistence.migrate().await?;

    let snapshot = persistence.load_snapshot().await?;
    tracing::info!(
        users = snapshot.users.len(),
        pets = snapshot.pets.len(),
        "restored snapshot"
    );
    store.restore(snapshot).await;

    spawn_snapshot_task(
        persistence.clone(),
        Arc::clone(store),
        config.snapshot_interval(),
        config.cleanup_after_days,
    );
    if config.event_log_enabled {
        spawn_event_log_task(persistence.clone(), event_bus.subscribe());
    }
    Ok(persistence)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
