//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::error::GameError;

/// Query parameters of the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Bearer token; browsers cannot set headers on WebSocket requests.
    pub token: Option<String>,
}

/// `GET /ws?token=…` — Authenticate, then upgrade to WebSocket.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] for a missing or invalid token.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, GameError> {
    let token = params
        .token
        .ok_or_else(|| GameError::Unauthorized("missing token".to_string()))?;
    let user_id = state.accounts.authenticate(&token).await?;
    let event_rx = state.event_bus.subscribe();
    let accounts = Arc::clone(&state.accounts);

    Ok(ws.on_upgrade(move |socket| run_connection(socket, user_id, event_rx, accounts)))
}
