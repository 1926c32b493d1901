//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod coins;
pub mod daily_tasks;
pub mod minigames;
pub mod pets;
pub mod shop;
pub mod system;
pub mod user;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(pets::routes())
        .merge(shop::routes())
        .merge(minigames::routes())
        .merge(coins::routes())
        .merge(daily_tasks::routes())
        .merge(user::routes())
}
