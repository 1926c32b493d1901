//! Registered player accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::accrual::{CoinLedger, DailyStreak, LoginStreak};
use super::ids::{PetId, UserId};
use super::inventory::Inventory;
use super::registry::Entity;

/// A player account.
///
/// `password_hash` never leaves the service layer; API responses are
/// built from [`crate::api::dto::UserDto`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Unique display name.
    pub username: String,
    /// Unique, lower-cased e-mail address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Coin balance and accrual bookkeeping.
    pub ledger: CoinLedger,
    /// Login streak.
    pub login: LoginStreak,
    /// Daily reward streak.
    pub daily: DailyStreak,
    /// Items bought without a target pet, waiting to be given to one.
    pub inventory: Inventory,
    /// Pet shown on the dashboard.
    pub active_pet: Option<PetId>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }
}
