//! DTOs for registration, login and the current user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::{ItemStackDto, inventory_dto, round_coins};
use crate::domain::User;
use crate::service::UserStats;

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// 3–30 characters: letters, digits, `_` or `-`.
    pub username: String,
    /// Login email; stored lower-cased.
    pub email: String,
    /// At least 6 characters.
    pub password: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Public view of a user. Never carries password material.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// User id.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Settled balance, rounded to cents.
    pub coins: f64,
    /// Offline seconds waiting for collection.
    pub pending_offline_seconds: i64,
    /// Consecutive login days.
    pub login_streak: u32,
    /// Consecutive daily-reward claims.
    pub daily_streak: u32,
    /// Pet shown first in the client.
    pub active_pet_id: Option<Uuid>,
    /// Items bought without a target pet.
    pub inventory: Vec<ItemStackDto>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.into(),
            username: user.username.clone(),
            email: user.email.clone(),
            coins: round_coins(user.ledger.coins),
            pending_offline_seconds: user.ledger.pending_offline_secs,
            login_streak: user.login.streak,
            daily_streak: user.daily.streak,
            active_pet_id: user.active_pet.map(Uuid::from),
            inventory: inventory_dto(&user.inventory),
            created_at: user.created_at,
        }
    }
}

/// Response for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: String,
    /// The new user.
    pub user: UserDto,
}

/// Response for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// The user after login rewards.
    pub user: UserDto,
    /// Coins credited for the login streak.
    pub login_bonus: f64,
    /// Coins collected for time offline.
    pub offline_earnings: f64,
}

/// Response for `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponse {
    /// The caller.
    pub user: UserDto,
}

/// Request body for `PATCH /api/user/profile`. Only these two fields are
/// editable; any other key is rejected.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub username: Option<String>,
    /// New login email.
    pub email: Option<String>,
}

/// Account statistics.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsDto {
    /// Settled balance, rounded to cents.
    pub coins: f64,
    /// Pets currently owned.
    pub pets_owned: u32,
    /// Level of the most advanced pet.
    pub highest_pet_level: u32,
    /// Minigame rounds finished.
    pub games_played: u32,
    /// Coins won in minigames, rounded to cents.
    pub minigame_coins_earned: f64,
    /// Consecutive login days.
    pub login_streak: u32,
    /// Consecutive daily-reward claims.
    pub daily_streak: u32,
    /// Registration time.
    pub member_since: DateTime<Utc>,
}

impl From<&UserStats> for UserStatsDto {
    fn from(stats: &UserStats) -> Self {
        Self {
            coins: round_coins(stats.coins),
            pets_owned: stats.pets_owned,
            highest_pet_level: stats.highest_pet_level,
            games_played: stats.games_played,
            minigame_coins_earned: round_coins(stats.minigame_coins_earned),
            login_streak: stats.login_streak,
            daily_streak: stats.daily_streak,
            member_since: stats.member_since,
        }
    }
}

/// Response for `GET /api/user/stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserStatsResponse {
    /// The caller's statistics.
    pub stats: UserStatsDto,
}
