//! Coin handlers: balance, offline collection, daily reward.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BalanceResponse, CollectOfflineResponse, DailyStreakResponse, round_coins,
};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::{ErrorResponse, GameError};

/// `GET /api/coins/balance` — Settled balance.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/coins/balance",
    tag = "Coins",
    summary = "Current balance",
    description = "Settles accrual up to now and returns the balance.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Balance", body = BalanceResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn balance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let coins = state.accounts.balance(user_id).await?;
    Ok((
        StatusCode::OK,
        Json(BalanceResponse {
            coins: round_coins(coins),
        }),
    ))
}

/// `POST /api/coins/collect-offline` — Pay banked offline time.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    post,
    path = "/api/coins/collect-offline",
    tag = "Coins",
    summary = "Collect offline earnings",
    description = "Pays 0.5 coins per banked offline second, capped at 24 hours, and clears the bank.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Collected", body = CollectOfflineResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn collect_offline(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let (earned, coins) = state.accounts.collect_offline(user_id).await?;
    Ok((
        StatusCode::OK,
        Json(CollectOfflineResponse {
            earned: round_coins(earned),
            coins: round_coins(coins),
        }),
    ))
}

/// `POST /api/coins/daily-streak` — Claim today's daily reward.
///
/// # Errors
///
/// Returns [`GameError::Conflict`] if already claimed today.
#[utoipa::path(
    post,
    path = "/api/coins/daily-streak",
    tag = "Coins",
    summary = "Claim the daily reward",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Reward paid", body = DailyStreakResponse),
        (status = 409, description = "Already claimed today", body = ErrorResponse),
    )
)]
pub async fn daily_streak(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let reward = state.accounts.claim_daily_streak(user_id).await?;
    Ok((StatusCode::OK, Json(DailyStreakResponse::from(&reward))))
}

/// Coin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/coins/balance", get(balance))
        .route("/coins/collect-offline", post(collect_offline))
        .route("/coins/daily-streak", post(daily_streak))
}
