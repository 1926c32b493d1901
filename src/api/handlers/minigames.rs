//! Minigame handlers: catalog, progress, start and finish.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    FinishGameRequest, FinishGameResponse, GameProgressDto, GameProgressListResponse,
    MiniGameDto, MiniGameListResponse, StartGameRequest, StartGameResponse,
};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::PetId;
use crate::error::{ErrorResponse, GameError};

/// `GET /api/minigames` — The minigame catalog.
#[utoipa::path(
    get,
    path = "/api/minigames",
    tag = "Minigames",
    summary = "List minigames",
    responses(
        (status = 200, description = "Minigame catalog", body = MiniGameListResponse),
    )
)]
pub async fn list_games(State(state): State<AppState>) -> impl IntoResponse {
    let response = MiniGameListResponse {
        games: state.minigames.games().iter().map(MiniGameDto::from).collect(),
    };
    (StatusCode::OK, Json(response))
}

/// `GET /api/minigames/progress` — The caller's per-game statistics.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/minigames/progress",
    tag = "Minigames",
    summary = "My minigame progress",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Progress rows", body = GameProgressListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let rows = state.minigames.progress(user_id).await;
    let response = GameProgressListResponse {
        progress: rows.iter().map(GameProgressDto::from).collect(),
    };
    Ok((StatusCode::OK, Json(response)))
}

/// `POST /api/minigames/start` — Open a round.
///
/// # Errors
///
/// Returns [`GameError`] for unknown games or pets, a low level, an
/// active cooldown, or too little energy.
#[utoipa::path(
    post,
    path = "/api/minigames/start",
    tag = "Minigames",
    summary = "Start a minigame",
    description = "Checks the pet's level, the game cooldown and the pet's energy, then charges the energy cost and opens a session.",
    security(("bearer" = [])),
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Round started", body = StartGameResponse),
        (status = 404, description = "Game or pet not found", body = ErrorResponse),
        (status = 422, description = "Level, cooldown or energy requirement not met", body = ErrorResponse),
    )
)]
pub async fn start_game(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<StartGameRequest>,
) -> Result<impl IntoResponse, GameError> {
    let outcome = state
        .minigames
        .start(user_id, &req.game_id, PetId::from(req.pet_id))
        .await?;
    Ok((StatusCode::OK, Json(StartGameResponse::from(&outcome))))
}

/// `POST /api/minigames/finish` — Close the open round and pay rewards.
///
/// # Errors
///
/// Returns [`GameError`] for a bad score or duration, unknown games or
/// pets, or a missing session.
#[utoipa::path(
    post,
    path = "/api/minigames/finish",
    tag = "Minigames",
    summary = "Finish a minigame",
    description = "Rewards scale linearly with `score / targetScore`, capped at the maximum. The duration must lie in [0, 300] seconds.",
    security(("bearer" = [])),
    request_body = FinishGameRequest,
    responses(
        (status = 200, description = "Rewards paid", body = FinishGameResponse),
        (status = 400, description = "Invalid score or duration", body = ErrorResponse),
        (status = 404, description = "Game or pet not found", body = ErrorResponse),
        (status = 409, description = "No open round for this pet", body = ErrorResponse),
    )
)]
pub async fn finish_game(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<FinishGameRequest>,
) -> Result<impl IntoResponse, GameError> {
    let outcome = state
        .minigames
        .finish(
            user_id,
            &req.game_id,
            PetId::from(req.pet_id),
            req.score,
            req.duration,
        )
        .await?;
    Ok((StatusCode::OK, Json(FinishGameResponse::from(&outcome))))
}

/// Minigame routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/minigames", get(list_games))
        .route("/minigames/progress", get(progress))
        .route("/minigames/start", post(start_game))
        .route("/minigames/finish", post(finish_game))
}
