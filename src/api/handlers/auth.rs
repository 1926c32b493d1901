//! Account handlers: register, login, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AuthResponse, LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserDto,
};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::{ErrorResponse, GameError};

/// `POST /api/auth/register` — Create an account with a free starter pet.
///
/// # Errors
///
/// Returns [`GameError`] on invalid input or a taken email/username.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    summary = "Register a new account",
    description = "Creates a user with the starting coin balance and a free cat, and returns a bearer token.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid username, email or password", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, GameError> {
    let session = state
        .accounts
        .register(&req.username, &req.email, &req.password)
        .await?;
    let response = AuthResponse {
        token: session.token,
        user: UserDto::from(&session.user),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login` — Exchange credentials for a token.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] on bad credentials.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Verifies credentials, pays the login-streak bonus and any banked offline coins, and returns a bearer token.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, GameError> {
    let outcome = state.accounts.login(&req.email, &req.password).await?;
    let response = LoginResponse {
        token: outcome.session.token,
        user: UserDto::from(&outcome.session.user),
        login_bonus: outcome.login_bonus,
        offline_earnings: outcome.offline_earnings,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// `GET /api/auth/me` — The authenticated user.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current user",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller with a settled balance", body = MeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn me(
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

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}
