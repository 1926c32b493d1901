//! WebSocket message types: client commands and server events.
//!
//! Both directions use the envelope `{"event": <name>, "data": {...}}`
//! with camelCase names.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subscription::Topic;
use crate::domain::GameEvent;

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum WsCommand {
    /// Settle accrual and report the balance of `user_id`.
    UpdateCoins {
        /// Must be the authenticated user.
        user_id: Uuid,
    },
    /// Start receiving pushes for the given topics.
    Subscribe {
        /// Topics to add.
        topics: Vec<Topic>,
    },
    /// Stop receiving pushes for the given topics.
    Unsubscribe {
        /// Topics to remove.
        topics: Vec<Topic>,
    },
}

/// Events the server sends over WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum WsEvent {
    /// The caller's balance.
    CoinsUpdated {
        /// Settled balance, rounded to cents.
        coins: f64,
    },
    /// A pet was adopted, granted, or bred.
    PetCreated {
        /// New pet.
        pet_id: Uuid,
        /// Pet type id.
        pet_type: String,
    },
    /// A pet changed.
    PetUpdated {
        /// Pet.
        pet_id: Uuid,
        /// Interaction name.
        action: String,
    },
    /// A pet gained levels.
    LevelUp {
        /// Pet.
        pet_id: Uuid,
        /// New level.
        level: u32,
        /// Levels gained at once.
        levels_gained: u32,
    },
    /// A minigame round ended.
    GameFinished {
        /// Game id.
        game_id: String,
        /// Submitted score.
        score: f64,
        /// Coins paid.
        coins_earned: f64,
    },
    /// The active topic set after a (un)subscribe command.
    Subscribed {
        /// Active topics.
        topics: Vec<Topic>,
    },
    /// A command was rejected.
    Error {
        /// Reason.
        message: String,
    },
}

impl WsEvent {
    /// Builds an [`WsEvent::Error`].
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Client-facing form of a bus event, with its topic. Events with no
    /// client counterpart yield `None`.
    #[must_use]
    pub fn from_game_event(event: &GameEvent) -> Option<(Topic, Self)> {
        let mapped = match event {
            GameEvent::CoinsUpdated { coins, .. } => (
                Topic::Coins,
                Self::CoinsUpdated {
                    coins: crate::api::dto::round_coins(*coins),
                },
            ),
            GameEvent::PetCreated {
                pet_id, pet_type, ..
            } => (
                Topic::Pets,
                Self::PetCreated {
                    pet_id: (*pet_id).into(),
                    pet_type: pet_type.clone(),
                },
            ),
            GameEvent::PetUpdated { pet_id, action, .. } => (
                Topic::Pets,
                Self::PetUpdated {
                    pet_id: (*pet_id).into(),
                    action: action.clone(),
                },
            ),
            GameEvent::LevelUp {
                pet_id,
                level,
                levels_gained,
                ..
            } => (
                Topic::Pets,
                Self::LevelUp {
                    pet_id: (*pet_id).into(),
                    level: *level,
                    levels_gained: *levels_gained,
                },
            ),
            GameEvent::GameFinished {
                game_id,
                score,
                coins_earned,
                ..
            } => (
                Topic::Games,
                Self::GameFinished {
                    game_id: game_id.clone(),
                    score: *score,
                    coins_earned: *coins_earned,
                },
            ),
            GameEvent::ItemPurchased { .. } | GameEvent::PetBred { .. } => return None,
        };
        Some(mapped)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::UserId;

    #[test]
    fn parses_update_coins_command() {
        let id = Uuid::new_v4();
        let text = format!(r#"{{"event":"updateCoins","data":{{"userId":"{id}"}}}}"#);
        let Ok(cmd) = serde_json::from_str::<WsCommand>(&text) else {
            panic!("command did not parse");
        };
        assert_eq!(cmd, WsCommand::UpdateCoins { user_id: id });
    }

    #[test]
    fn parses_subscribe_command() {
        let text = r#"{"event":"subscribe","data":{"topics":["pets","games"]}}"#;
        let Ok(cmd) = serde_json::from_str::<WsCommand>(text) else {
            panic!("command did not parse");
        };
        assert_eq!(
            cmd,
            WsCommand::Subscribe {
                topics: vec![Topic::Pets, Topic::Games]
            }
        );
    }

    #[test]
    fn coins_event_uses_envelope() {
        let Ok(json) = serde_json::to_value(WsEvent::CoinsUpdated { coins: 12.5 }) else {
            panic!("serialization failed");
        };
        assert_eq!(json["event"], "coinsUpdated");
        assert_eq!(json["data"]["coins"], 12.5);
    }

    #[test]
    fn level_up_fields_are_camel_case() {
        let event = WsEvent::LevelUp {
            pet_id: Uuid::nil(),
            level: 3,
            levels_gained: 2,
        };
        let Ok(json) = serde_json::to_value(event) else {
            panic!("serialization failed");
        };
        assert_eq!(json["event"], "levelUp");
        assert_eq!(json["data"]["levelsGained"], 2);
    }

    #[test]
    fn bus_events_map_to_topics() {
        let event = GameEvent::CoinsUpdated {
            user_id: UserId::new(),
            coins: 10.004,
            timestamp: Utc::now(),
        };
        assert_eq!(
            WsEvent::from_game_event(&event),
            Some((Topic::Coins, WsEvent::CoinsUpdated { coins: 10.0 }))
        );
    }
}
