//! Daily task handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{DailyTaskResponse, TaskProgressRequest, TaskProgressResponse};
use crate::api::extract::{ApiJson, ApiPath};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::DailyTaskId;
use crate::error::{ErrorResponse, GameError};

/// `GET /api/daily-tasks/today` — Today's tasks, created on first access.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/daily-tasks/today",
    tag = "Daily Tasks",
    summary = "Today's tasks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Today's task set", body = DailyTaskResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let set = state.daily_tasks.today(user_id).await?;
    Ok((StatusCode::OK, Json(DailyTaskResponse::from(&set))))
}

/// `PATCH /api/daily-tasks/{id}/progress` — Report progress on one task.
///
/// # Errors
///
/// Returns [`GameError::NotFound`] for unknown sets or task indexes.
#[utoipa::path(
    patch,
    path = "/api/daily-tasks/{id}/progress",
    tag = "Daily Tasks",
    summary = "Update task progress",
    description = "Sets the task's progress, clamped to its requirement. Completing a task pays its coin reward times the streak bonus, once.",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Daily task set id")),
    request_body = TaskProgressRequest,
    responses(
        (status = 200, description = "Progress recorded", body = TaskProgressResponse),
        (status = 404, description = "Task set or task not found", body = ErrorResponse),
    )
)]
pub async fn update_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<TaskProgressRequest>,
) -> Result<impl IntoResponse, GameError> {
    let outcome = state
        .daily_tasks
        .update_progress(user_id, DailyTaskId::from(id), req.task_index, req.progress)
        .await?;
    Ok((StatusCode::OK, Json(TaskProgressResponse::from(&outcome))))
}

/// `POST /api/daily-tasks/claim-streak` — Claim today's streak multiplier.
///
/// # Errors
///
/// Returns [`GameError`] if today's tasks were never opened or the
/// bonus was already claimed.
#[utoipa::path(
    post,
    path = "/api/daily-tasks/claim-streak",
    tag = "Daily Tasks",
    summary = "Claim the task streak bonus",
    description = "Raises the multiplier by 0.1 over yesterday's if yesterday's tasks were all completed, otherwise resets it to 1.0.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Bonus claimed", body = DailyTaskResponse),
        (status = 404, description = "No tasks today", body = ErrorResponse),
        (status = 409, description = "Already claimed", body = ErrorResponse),
    )
)]
pub async fn claim_streak(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let set = state.daily_tasks.claim_streak(user_id).await?;
    Ok((StatusCode::OK, Json(DailyTaskResponse::from(&set))))
}

/// Daily task routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/daily-tasks/today", get(today))
        .route("/daily-tasks/{id}/progress", patch(update_progress))
        .route("/daily-tasks/claim-streak", post(claim_streak))
}
