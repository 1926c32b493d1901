//! Shop service: item catalog and purchases.

use crate::domain::catalog::{SHOP_ITEMS, ShopItem, shop_item};
use crate::domain::{GameEvent, Pet, PetId, UserId};
use crate::error::GameError;

use super::GameContext;

/// Largest quantity accepted in one purchase.
pub const MAX_PURCHASE_QUANTITY: u32 = 99;

/// Result of a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    /// Item bought.
    pub item: &'static ShopItem,
    /// Units bought.
    pub quantity: u32,
    /// Coins spent.
    pub cost: f64,
    /// Balance afterwards.
    pub coins: f64,
    /// The receiving pet, when one was named.
    pub pet: Option<Pet>,
}

/// Shop orchestration.
#[derive(Debug, Clone)]
pub struct ShopService {
    ctx: GameContext,
}

impl ShopService {
    /// Creates a new `ShopService`.
    #[must_use]
    pub fn new(ctx: GameContext) -> Self {
        Self { ctx }
    }

    /// Everything for sale.
    #[must_use]
    pub fn items(&self) -> &'static [ShopItem] {
        SHOP_ITEMS
    }

    /// Buys `quantity` units, for a pet or for the user's own inventory.
    ///
    /// The coin deduction and the inventory credit happen under the user
    /// lock (and the pet lock, if any), so either both apply or neither.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for a quantity outside `1..=99`,
    /// [`GameError::NotFound`] for unknown items or pets,
    /// [`GameError::InsufficientResource`] if the user cannot pay.
    pub async fn purchase(
        &self,
        user_id: UserId,
        item_id: &str,
        pet_id: Option<PetId>,
        quantity: u32,
    ) -> Result<PurchaseOutcome, GameError> {
        if !(1..=MAX_PURCHASE_QUANTITY).contains(&quantity) {
            return Err(GameError::InvalidInput(format!(
                "quantity must be between 1 and {MAX_PURCHASE_QUANTITY}"
            )));
        }
        let item = shop_item(item_id).ok_or_else(|| GameError::not_found("shop item", item_id))?;
        let user_lock = self.ctx.store.user(user_id).await?;
        let pet_lock = match pet_id {
            Some(id) => Some(self.ctx.store.owned_pet(user_id, id).await?),
            None => None,
        };

        let mut user = user_lock.write().await;
        let mut pet = match &pet_lock {
            Some(lock) => Some(lock.write().await),
            None => None,
        };
        let now = self.ctx.now();
        self.ctx.settle(&mut user, now);
        let cost = item.price * f64::from(quantity);
        user.ledger.spend(cost)?;
        match pet.as_deref_mut() {
            Some(pet) => {
                pet.refresh(now);
                pet.inventory.add(item.id, quantity);
            }
            None => user.inventory.add(item.id, quantity),
        }
        let user_snapshot = user.clone();
        let pet_snapshot = pet.as_deref().cloned();
        drop(pet);
        drop(user);

        self.ctx.publish_coins(&user_snapshot, now);
        let _ = self.ctx.event_bus.publish(GameEvent::ItemPurchased {
            user_id,
            item_id: item.id.to_string(),
            quantity,
            cost,
            pet_id,
            timestamp: now,
        });
        tracing::info!(%user_id, item = item.id, quantity, cost, "item purchased");
        Ok(PurchaseOutcome {
            item,
            quantity,
            cost,
            coins: user_snapshot.ledger.coins,
            pet: pet_snapshot,
        })
    }

    /// Moves `quantity` units from the user's own inventory to a pet.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for a quantity outside `1..=99`,
    /// [`GameError::NotFound`] for unknown pets or items the user does not
    /// hold, [`GameError::InsufficientResource`] if the user holds fewer.
    pub async fn give_item(
        &self,
        user_id: UserId,
        pet_id: PetId,
        item_id: &str,
        quantity: u32,
    ) -> Result<Pet, GameError> {
        if !(1..=MAX_PURCHASE_QUANTITY).contains(&quantity) {
            return Err(GameError::InvalidInput(format!(
                "quantity must be between 1 and {MAX_PURCHASE_QUANTITY}"
            )));
        }
        let user_lock = self.ctx.store.user(user_id).await?;
        let pet_lock = self.ctx.store.owned_pet(user_id, pet_id).await?;

        let mut user = user_lock.write().await;
        let mut pet = pet_lock.write().await;
        user.inventory.take(item_id, quantity)?;
        let now = self.ctx.now();
        pet.refresh(now);
        pet.inventory.add(item_id, quantity);
        let snapshot = pet.clone();
        drop(pet);
        drop(user);

        self.ctx.publish_pet_updated(&snapshot, "give-item", now);
        tracing::info!(%user_id, %pet_id, item = item_id, quantity, "item given to pet");
        Ok(snapshot)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::service::AccountService;
    use crate::service::test_support::{context, signer};

    async fn setup() -> (ShopService, UserId, PetId) {
        let (ctx, _) = context();
        let accounts = AccountService::new(ctx.clone(), signer(), 100.0);
        let Ok(session) = accounts.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let Some(pet) = session.user.active_pet else {
            panic!("starter pet missing");
        };
        (ShopService::new(ctx), session.user.id, pet)
    }

    #[tokio::test]
    async fn purchase_for_pet_moves_coins_into_inventory() {
        let (shop, user, pet) = setup().await;
        let Ok(outcome) = shop.purchase(user, "food_basic", Some(pet), 3).await else {
            panic!("purchase failed");
        };
        assert_eq!(outcome.cost, 30.0);
        assert_eq!(outcome.coins, 70.0);
        let Some(pet) = outcome.pet else {
            panic!("pet missing from outcome");
        };
        assert_eq!(pet.inventory.quantity("food_basic"), 3);
    }

    #[tokio::test]
    async fn purchase_without_pet_goes_to_user_inventory() {
        let (shop, user, _) = setup().await;
        assert!(shop.purchase(user, "accessory_bow_tie", None, 1).await.is_ok());
        let Ok(shared) = shop.ctx.store.user(user).await else {
            panic!("user missing");
        };
        assert_eq!(shared.read().await.inventory.quantity("accessory_bow_tie"), 1);
    }

    #[tokio::test]
    async fn unaffordable_purchase_changes_nothing() {
        let (shop, user, pet) = setup().await;
        let Err(GameError::InsufficientResource(_)) =
            shop.purchase(user, "food_royal", Some(pet), 3).await
        else {
            panic!("expected insufficient coins");
        };
        let Ok(user_lock) = shop.ctx.store.user(user).await else {
            panic!("user missing");
        };
        assert_eq!(user_lock.read().await.ledger.coins, 100.0);
        let Ok(pet_lock) = shop.ctx.store.owned_pet(user, pet).await else {
            panic!("pet missing");
        };
        assert_eq!(pet_lock.read().await.inventory.quantity("food_royal"), 0);
    }

    #[tokio::test]
    async fn quantity_and_item_are_validated() {
        let (shop, user, _) = setup().await;
        assert!(shop.purchase(user, "food_basic", None, 0).await.is_err());
        assert!(shop.purchase(user, "food_basic", None, 100).await.is_err());
        let Err(GameError::NotFound { .. }) = shop.purchase(user, "caviar", None, 1).await else {
            panic!("expected not found");
        };
        let Err(GameError::NotFound { .. }) =
            shop.purchase(user, "food_basic", Some(PetId::new()), 1).await
        else {
            panic!("expected not found");
        };
    }

    #[tokio::test]
    async fn held_items_can_be_given_to_a_pet() {
        let (shop, user, pet) = setup().await;
        assert!(shop.purchase(user, "toy_ball", None, 3).await.is_ok());
        let Ok(updated) = shop.give_item(user, pet, "toy_ball", 2).await else {
            panic!("give failed");
        };
        assert_eq!(updated.inventory.quantity("toy_ball"), 2);
        let Ok(shared) = shop.ctx.store.user(user).await else {
            panic!("user missing");
        };
        assert_eq!(shared.read().await.inventory.quantity("toy_ball"), 1);

        let Err(GameError::InsufficientResource(_)) =
            shop.give_item(user, pet, "toy_ball", 2).await
        else {
            panic!("expected shortfall");
        };
        let Err(GameError::NotFound { .. }) = shop.give_item(user, pet, "food_basic", 1).await
        else {
            panic!("expected not found");
        };
        let Err(GameError::NotFound { .. }) =
            shop.give_item(user, PetId::new(), "toy_ball", 1).await
        else {
            panic!("expected unknown pet");
        };
    }
}
