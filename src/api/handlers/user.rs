//! Profile handlers: view and edit the caller's account, read statistics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    MeResponse, UpdateProfileRequest, UserDto, UserStatsDto, UserStatsResponse,
};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::{ErrorResponse, GameError};

/// `GET /api/user/profile` — The caller's profile.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "User",
    summary = "Get my profile",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller with a settled balance", body = MeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let user = state.accounts.me(user_id).await?;
    Ok((
        StatusCode::OK,
        Json(MeResponse {
            user: UserDto::from(&user),
        }),
    ))
}

/// `PATCH /api/user/profile` — Change username and/or email.
///
/// # Errors
///
/// Returns [`GameError`] on invalid or unknown fields, or a taken name/email.
#[utoipa::path(
    patch,
    path = "/api/user/profile",
    tag = "User",
    summary = "Update my profile",
    description = "Only `username` and `email` may change; both keep their uniqueness rules.",
    security(("bearer" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated", body = MeResponse),
        (status = 400, description = "Invalid or unknown field", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse),
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, GameError> {
    let user = state
        .accounts
        .update_profile(user_id, req.username.as_deref(), req.email.as_deref())
        .await?;
    Ok((
        StatusCode::OK,
        Json(MeResponse {
            user: UserDto::from(&user),
        }),
    ))
}

/// `GET /api/user/stats` — Account statistics.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/user/stats",
    tag = "User",
    summary = "Get my statistics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Pets, minigame and streak totals", body = UserStatsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let stats = state.accounts.stats(user_id).await?;
    Ok((
        StatusCode::OK,
        Json(UserStatsResponse {
            stats: UserStatsDto::from(&stats),
        }),
    ))
}

/// Profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(profile).patch(update_profile))
        .route("/user/stats", get(stats))
}
