//! Service layer: business logic orchestration.
//!
//! Each service is a stateless coordinator over the shared
//! [`GameContext`]. Mutating methods follow one pattern: resolve
//! entities → acquire locks in the canonical order (user, pets by id,
//! daily task set) → bring time-based state current → validate → mutate
//! → emit events → return owned copies.

pub mod account_service;
pub mod daily_task_service;
pub mod minigame_service;
pub mod pet_service;
pub mod shop_service;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::accrual::CoinPolicy;
use crate::domain::{Clock, EventBus, GameEvent, GameStore, Pet, User};
use crate::domain::leveling::LevelUp;

pub use account_service::{AccountService, UserStats};
pub use daily_task_service::DailyTaskService;
pub use minigame_service::MinigameService;
pub use pet_service::PetService;
pub use shop_service::ShopService;

/// State and collaborators shared by every service.
#[derive(Debug, Clone)]
pub struct GameContext {
    /// All entities.
    pub store: Arc<GameStore>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Event sink.
    pub event_bus: EventBus,
    /// Coin accrual parameters.
    pub coin_policy: CoinPolicy,
}

impl GameContext {
    /// Bundles the shared collaborators.
    #[must_use]
    pub fn new(
        store: Arc<GameStore>,
        clock: Arc<dyn Clock>,
        event_bus: EventBus,
        coin_policy: CoinPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            event_bus,
            coin_policy,
        }
    }

    /// Current instant.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Brings online accrual current and returns the coins added.
    pub(crate) fn settle(&self, user: &mut User, now: DateTime<Utc>) -> f64 {
        user.ledger.settle(&self.coin_policy, now)
    }

    pub(crate) fn publish_coins(&self, user: &User, now: DateTime<Utc>) {
        let _ = self.event_bus.publish(GameEvent::CoinsUpdated {
            user_id: user.id,
            coins: user.ledger.coins,
            timestamp: now,
        });
    }

    pub(crate) fn publish_pet_updated(&self, pet: &Pet, action: &str, now: DateTime<Utc>) {
        let _ = self.event_bus.publish(GameEvent::PetUpdated {
            user_id: pet.owner,
            pet_id: pet.id,
            action: action.to_string(),
            timestamp: now,
        });
    }

    pub(crate) fn publish_level_up(&self, pet: &Pet, level_up: LevelUp, now: DateTime<Utc>) {
        if level_up.leveled_up() {
            tracing::info!(pet_id = %pet.id, level = pet.progression.level, "pet leveled up");
            let _ = self.event_bus.publish(GameEvent::LevelUp {
                user_id: pet.owner,
                pet_id: pet.id,
                level: pet.progression.level,
                levels_gained: level_up.levels_gained,
                timestamp: now,
            });
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};

    use super::GameContext;
    use crate::auth::TokenSigner;
    use crate::domain::accrual::CoinPolicy;
    use crate::domain::{EventBus, GameStore, ManualClock};

    pub(crate) fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::hours(12)
    }

    pub(crate) fn context() -> (GameContext, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let ctx = GameContext::new(
            Arc::new(GameStore::new()),
            Arc::clone(&clock) as Arc<dyn crate::domain::Clock>,
            EventBus::new(64),
            CoinPolicy::default(),
        );
        (ctx, clock)
    }

    pub(crate) fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 7)
    }
}
