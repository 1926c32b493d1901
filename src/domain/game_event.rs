//! Domain events reflecting game state mutations.
//!
//! Every state change emits a [`GameEvent`] through the [`super::EventBus`].
//! Events are pushed to the owning user's WebSocket connections and
//! optionally persisted to the PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{PetId, UserId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A user's balance changed.
    CoinsUpdated {
        /// Owner of the balance.
        user_id: UserId,
        /// New balance.
        coins: f64,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A pet was adopted, granted, or bred.
    PetCreated {
        /// Owner.
        user_id: UserId,
        /// New pet.
        pet_id: PetId,
        /// Pet type id.
        pet_type: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A pet was interacted with.
    PetUpdated {
        /// Owner.
        user_id: UserId,
        /// Pet.
        pet_id: PetId,
        /// Interaction name (`"feed"`, `"rename"`, ...).
        action: String,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Items were bought in the shop.
    ItemPurchased {
        /// Buyer.
        user_id: UserId,
        /// Shop item id.
        item_id: String,
        /// Units bought.
        quantity: u32,
        /// Coins spent.
        cost: f64,
        /// Receiving pet, if any.
        pet_id: Option<PetId>,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Two pets produced an offspring.
    PetBred {
        /// Owner.
        user_id: UserId,
        /// First parent.
        parent1: PetId,
        /// Second parent.
        parent2: PetId,
        /// Offspring.
        offspring: PetId,
        /// Offspring rarity.
        rarity: String,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A pet gained one or more levels.
    LevelUp {
        /// Owner.
        user_id: UserId,
        /// Pet.
        pet_id: PetId,
        /// Level reached.
        level: u32,
        /// Levels gained by the award.
        levels_gained: u32,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A minigame round was finished.
    GameFinished {
        /// Player.
        user_id: UserId,
        /// Pet that played.
        pet_id: PetId,
        /// Game id.
        game_id: String,
        /// Reported score.
        score: f64,
        /// Coins awarded.
        coins_earned: f64,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl GameEvent {
    /// Returns the user this event belongs to.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::CoinsUpdated { user_id, .. }
            | Self::PetCreated { user_id, .. }
            | Self::PetUpdated { user_id, .. }
            | Self::ItemPurchased { user_id, .. }
            | Self::PetBred { user_id, .. }
            | Self::LevelUp { user_id, .. }
            | Self::GameFinished { user_id, .. } => *user_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::CoinsUpdated { .. } => "coins_updated",
            Self::PetCreated { .. } => "pet_created",
            Self::PetUpdated { .. } => "pet_updated",
            Self::ItemPurchased { .. } => "item_purchased",
            Self::PetBred { .. } => "pet_bred",
            Self::LevelUp { .. } => "level_up",
            Self::GameFinished { .. } => "game_finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coins_updated_serializes_with_tag() {
        let event = GameEvent::CoinsUpdated {
            user_id: UserId::new(),
            coins: 150.0,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "coins_updated");
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"coins_updated\""));
        assert!(json.contains("150"));
    }

    #[test]
    fn user_id_accessor() {
        let user_id = UserId::new();
        let event = GameEvent::PetBred {
            user_id,
            parent1: PetId::new(),
            parent2: PetId::new(),
            offspring: PetId::new(),
            rarity: "rare".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.user_id(), user_id);
        assert_eq!(event.event_type_str(), "pet_bred");
    }
}
