//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::TokenSigner;
use crate::config::GameConfig;
use crate::domain::{Clock, EventBus, GameStore};
use crate::service::{
    AccountService, DailyTaskService, GameContext, MinigameService, PetService, ShopService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registration, login, balance.
    pub accounts: Arc<AccountService>,
    /// Pets and breeding.
    pub pets: Arc<PetService>,
    /// Shop.
    pub shop: Arc<ShopService>,
    /// Minigames.
    pub minigames: Arc<MinigameService>,
    /// Daily tasks.
    pub daily_tasks: Arc<DailyTaskService>,
    /// Event bus for WebSocket pushes.
    pub event_bus: EventBus,
    /// Entity store, shared with the snapshot task.
    pub store: Arc<GameStore>,
}

impl AppState {
    /// Wires every service over one store, clock and event bus.
    #[must_use]
    pub fn new(
        config: &GameConfig,
        store: Arc<GameStore>,
        clock: Arc<dyn Clock>,
        event_bus: EventBus,
    ) -> Self {
        let ctx = GameContext::new(
            Arc::clone(&store),
            clock,
            event_bus.clone(),
            config.coin_policy(),
        );
        let tokens = TokenSigner::new(&config.token_secret, config.token_ttl_days);
        Self {
            accounts: Arc::new(AccountService::new(
                ctx.clone(),
                tokens,
                config.starting_coins,
            )),
            pets: Arc::new(PetService::new(ctx.clone())),
            shop: Arc::new(ShopService::new(ctx.clone())),
            minigames: Arc::new(MinigameService::new(ctx.clone())),
            daily_tasks: Arc::new(DailyTaskService::new(ctx)),
            event_bus,
            store,
        }
    }
}
