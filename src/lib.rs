//! # petrealm
//!
//! REST API and WebSocket backend for a virtual pet game.
//!
//! Users adopt pets whose stats decay over time, earn coins passively
//! while online and offline, buy items, breed pets with inherited
//! genetics, play minigames and complete daily tasks. All time-based
//! state is settled lazily on access; nothing ticks in the background.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)        ── AuthUser extractor (auth/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── Account / Pet / Shop / Minigame / DailyTask services (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── GameStore: per-entity RwLock registries (domain/)
//!     │
//!     └── PostgreSQL snapshots + event log (persistence/, optional)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::GameConfig;

/// Builds the full HTTP application: REST routes, `/ws`, and the tower
/// middleware stack (tracing, CORS, request timeout).
pub fn build_app(state: AppState, config: &GameConfig) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws::handler::ws_handler))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
