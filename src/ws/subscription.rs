//! Per-connection subscription manager.
//!
//! A connection only ever sees its own user's events; the topic set
//! narrows which kinds are pushed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{GameEvent, UserId};

/// Event families a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Balance changes. Active by default.
    Coins,
    /// Pet creation, interactions and level-ups.
    Pets,
    /// Finished minigame rounds.
    Games,
}

/// Manages the topic subscriptions for a single WebSocket connection.
#[derive(Debug)]
pub struct SubscriptionManager {
    user_id: UserId,
    topics: BTreeSet<Topic>,
}

impl SubscriptionManager {
    /// Creates a manager for `user_id`, subscribed to [`Topic::Coins`].
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            topics: BTreeSet::from([Topic::Coins]),
        }
    }

    /// The connection's user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Adds topics.
    pub fn subscribe(&mut self, topics: &[Topic]) {
        self.topics.extend(topics.iter().copied());
    }

    /// Removes topics.
    pub fn unsubscribe(&mut self, topics: &[Topic]) {
        for topic in topics {
            self.topics.remove(topic);
        }
    }

    /// Returns `true` if `event` belongs to this user and `topic` is active.
    #[must_use]
    pub fn matches(&self, event: &GameEvent, topic: Topic) -> bool {
        event.user_id() == self.user_id && self.topics.contains(&topic)
    }

    /// Active topics in a stable order.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        self.topics.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::PetId;

    fn coins_for(user_id: UserId) -> GameEvent {
        GameEvent::CoinsUpdated {
            user_id,
            coins: 1.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn coins_are_subscribed_by_default() {
        let user = UserId::new();
        let mgr = SubscriptionManager::new(user);
        assert!(mgr.matches(&coins_for(user), Topic::Coins));
        assert_eq!(mgr.topics(), vec![Topic::Coins]);
    }

    #[test]
    fn other_users_events_never_match() {
        let mut mgr = SubscriptionManager::new(UserId::new());
        mgr.subscribe(&[Topic::Pets, Topic::Games]);
        assert!(!mgr.matches(&coins_for(UserId::new()), Topic::Coins));
    }

    #[test]
    fn topics_can_be_added_and_removed() {
        let user = UserId::new();
        let mut mgr = SubscriptionManager::new(user);
        let event = GameEvent::PetUpdated {
            user_id: user,
            pet_id: PetId::new(),
            action: "feed".to_string(),
            timestamp: Utc::now(),
        };
        assert!(!mgr.matches(&event, Topic::Pets));
        mgr.subscribe(&[Topic::Pets]);
        assert!(mgr.matches(&event, Topic::Pets));
        mgr.unsubscribe(&[Topic::Pets, Topic::Coins]);
        assert!(!mgr.matches(&event, Topic::Pets));
        assert!(mgr.topics().is_empty());
    }
}
