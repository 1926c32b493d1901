//! Pet service: adoption, interactions, and breeding.

use crate::domain::breeding::BreedingRolls;
use crate::domain::catalog::{PET_TYPES, PetType, pet_type, shop_item};
use crate::domain::leveling::LevelUp;
use crate::domain::pet::{PetAction, Position};
use crate::domain::{GameEvent, Pet, PetId, UserId};
use crate::error::GameError;

use super::GameContext;

/// Breeding cooldown used when a pet's type is no longer in the catalog.
const FALLBACK_BREEDING_COOLDOWN_MINS: i64 = 60;

/// A pet after an interaction plus the level outcome.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// Updated pet.
    pub pet: Pet,
    /// Levels gained by the interaction.
    pub level_up: LevelUp,
}

/// Pet orchestration.
#[derive(Debug, Clone)]
pub struct PetService {
    ctx: GameContext,
}

impl PetService {
    /// Creates a new `PetService`.
    #[must_use]
    pub fn new(ctx: GameContext) -> Self {
        Self { ctx }
    }

    /// The adoptable pet types.
    #[must_use]
    pub fn types(&self) -> &'static [PetType] {
        PET_TYPES
    }

    /// Adopts a new pet, charging the type's price.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for a bad name, [`GameError::NotFound`]
    /// for an unknown type, [`GameError::InsufficientResource`] if the
    /// user cannot afford it.
    pub async fn adopt(&self, user_id: UserId, name: &str, type_id: &str) -> Result<Pet, GameError> {
        let name = validate_name(name)?;
        let kind = pet_type(type_id).ok_or_else(|| GameError::not_found("pet type", type_id))?;

        let shared = self.ctx.store.user(user_id).await?;
        let mut user = shared.write().await;
        let now = self.ctx.now();
        self.ctx.settle(&mut user, now);
        user.ledger.spend(kind.price)?;

        let pet = Pet::adopt(user_id, name, kind, now);
        self.ctx.store.insert_pet(pet.clone()).await?;
        if user.active_pet.is_none() {
            user.active_pet = Some(pet.id);
        }
        let user_snapshot = user.clone();
        drop(user);

        self.ctx.publish_coins(&user_snapshot, now);
        let _ = self.ctx.event_bus.publish(GameEvent::PetCreated {
            user_id,
            pet_id: pet.id,
            pet_type: pet.pet_type.clone(),
            timestamp: now,
        });
        tracing::info!(%user_id, pet_id = %pet.id, pet_type = kind.id, "pet adopted");
        Ok(pet)
    }

    /// All pets of a user with decay applied.
    ///
    /// # Errors
    ///
    /// Propagates store lookup failures.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Pet>, GameError> {
        let now = self.ctx.now();
        let mut pets = Vec::new();
        for id in self.ctx.store.pet_ids_of(user_id).await {
            let shared = self.ctx.store.owned_pet(user_id, id).await?;
            let mut pet = shared.write().await;
            pet.refresh(now);
            pets.push(pet.clone());
        }
        Ok(pets)
    }

    /// One pet with decay applied.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the pet is not the caller's.
    pub async fn get(&self, user_id: UserId, pet_id: PetId) -> Result<Pet, GameError> {
        let shared = self.ctx.store.owned_pet(user_id, pet_id).await?;
        let mut pet = shared.write().await;
        pet.refresh(self.ctx.now());
        Ok(pet.clone())
    }

    /// Renames a pet.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for a bad name, [`GameError::NotFound`]
    /// if the pet is not the caller's.
    pub async fn rename(&self, user_id: UserId, pet_id: PetId, name: &str) -> Result<Pet, GameError> {
        let name = validate_name(name)?;
        let shared = self.ctx.store.owned_pet(user_id, pet_id).await?;
        let mut pet = shared.write().await;
        let now = self.ctx.now();
        pet.refresh(now);
        pet.name = name;
        let snapshot = pet.clone();
        drop(pet);
        self.ctx.publish_pet_updated(&snapshot, "rename", now);
        Ok(snapshot)
    }

    /// Moves a pet within its room.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for coordinates outside `[0, 100]`.
    pub async fn set_position(
        &self,
        user_id: UserId,
        pet_id: PetId,
        x: f64,
        y: f64,
    ) -> Result<Pet, GameError> {
        let position = Position::new(x, y)?;
        let shared = self.ctx.store.owned_pet(user_id, pet_id).await?;
        let mut pet = shared.write().await;
        let now = self.ctx.now();
        pet.refresh(now);
        pet.position = position;
        let snapshot = pet.clone();
        drop(pet);
        self.ctx.publish_pet_updated(&snapshot, "move", now);
        Ok(snapshot)
    }

    /// Performs one of the fixed interactions.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the pet is not the caller's;
    /// [`GameError::InsufficientResource`] if the pet is too tired to play.
    pub async fn interact(
        &self,
        user_id: UserId,
        pet_id: PetId,
        action: PetAction,
    ) -> Result<ActionOutcome, GameError> {
        self.mutate(user_id, pet_id, action.as_str(), |pet, now| {
            pet.interact(action, now)
        })
        .await
    }

    /// Feeds a pet, optionally with a food item from its inventory.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] for unknown or unowned items;
    /// [`GameError::InvalidInput`] if the item is not food.
    pub async fn feed(
        &self,
        user_id: UserId,
        pet_id: PetId,
        food_item_id: Option<&str>,
    ) -> Result<ActionOutcome, GameError> {
        let Some(item_id) = food_item_id else {
            return self.interact(user_id, pet_id, PetAction::Feed).await;
        };
        let item = shop_item(item_id).ok_or_else(|| GameError::not_found("shop item", item_id))?;
        self.mutate(user_id, pet_id, "feed", |pet, now| pet.feed_item(item, now))
            .await
    }

    /// Uses a toy, medicine, or training item from the pet's inventory.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] for unknown or unowned items;
    /// [`GameError::InvalidInput`] for food or accessories.
    pub async fn use_item(
        &self,
        user_id: UserId,
        pet_id: PetId,
        item_id: &str,
    ) -> Result<ActionOutcome, GameError> {
        let item = shop_item(item_id).ok_or_else(|| GameError::not_found("shop item", item_id))?;
        self.mutate(user_id, pet_id, "use-item", |pet, now| pet.use_item(item, now))
            .await
    }

    async fn mutate<F>(
        &self,
        user_id: UserId,
        pet_id: PetId,
        action: &str,
        apply: F,
    ) -> Result<ActionOutcome, GameError>
    where
        F: FnOnce(&mut Pet, chrono::DateTime<chrono::Utc>) -> Result<LevelUp, GameError>,
    {
        let shared = self.ctx.store.owned_pet(user_id, pet_id).await?;
        let mut pet = shared.write().await;
        let now = self.ctx.now();
        let level_up = apply(&mut pet, now)?;
        let snapshot = pet.clone();
        drop(pet);

        self.ctx.publish_pet_updated(&snapshot, action, now);
        self.ctx.publish_level_up(&snapshot, level_up, now);
        tracing::debug!(%pet_id, action, "pet interaction");
        Ok(ActionOutcome {
            pet: snapshot,
            level_up,
        })
    }

    /// Breeds two of the caller's pets with fresh random rolls.
    ///
    /// # Errors
    ///
    /// See [`PetService::breed_with`].
    pub async fn breed(&self, user_id: UserId, pet1: PetId, pet2: PetId) -> Result<Pet, GameError> {
        self.breed_with(user_id, pet1, pet2, BreedingRolls::random())
            .await
    }

    /// Breeds two of the caller's pets with the given rolls.
    ///
    /// Both parents are locked in id order and fully validated before the
    /// offspring is stored and the parents are charged.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for identical or mismatched-type pets,
    /// [`GameError::NotFound`] if either pet is not the caller's,
    /// [`GameError::InsufficientResource`] if either parent is on cooldown
    /// or lacks health or energy.
    pub async fn breed_with(
        &self,
        user_id: UserId,
        pet1: PetId,
        pet2: PetId,
        rolls: BreedingRolls,
    ) -> Result<Pet, GameError> {
        if pet1 == pet2 {
            return Err(GameError::InvalidInput(
                "a pet cannot breed with itself".to_string(),
            ));
        }
        let lock1 = self.ctx.store.owned_pet(user_id, pet1).await?;
        let lock2 = self.ctx.store.owned_pet(user_id, pet2).await?;

        let (mut guard1, mut guard2) = if pet1 < pet2 {
            let g1 = lock1.write().await;
            let g2 = lock2.write().await;
            (g1, g2)
        } else {
            let g2 = lock2.write().await;
            let g1 = lock1.write().await;
            (g1, g2)
        };
        let parent1 = &mut *guard1;
        let parent2 = &mut *guard2;

        let now = self.ctx.now();
        parent1.refresh(now);
        parent2.refresh(now);

        if parent1.pet_type != parent2.pet_type {
            return Err(GameError::InvalidInput(
                "pets must be of the same type to breed".to_string(),
            ));
        }
        for parent in [&*parent1, &*parent2] {
            if let Some(reason) = parent.breeding_block(now) {
                return Err(GameError::InsufficientResource(format!(
                    "{} {reason}",
                    parent.name
                )));
            }
        }

        let cooldown = pet_type(&parent1.pet_type)
            .map_or(FALLBACK_BREEDING_COOLDOWN_MINS, |t| t.breeding_cooldown_mins);
        let child = parent1.offspring_with(parent2, rolls, now);
        self.ctx.store.insert_pet(child.clone()).await?;
        parent1.finish_breeding(child.id, cooldown, now);
        parent2.finish_breeding(child.id, cooldown, now);
        drop(guard1);
        drop(guard2);

        let _ = self.ctx.event_bus.publish(GameEvent::PetBred {
            user_id,
            parent1: pet1,
            parent2: pet2,
            offspring: child.id,
            rarity: child.genetics.rarity.to_string(),
            timestamp: now,
        });
        let _ = self.ctx.event_bus.publish(GameEvent::PetCreated {
            user_id,
            pet_id: child.id,
            pet_type: child.pet_type.clone(),
            timestamp: now,
        });
        tracing::info!(%user_id, offspring = %child.id, rarity = %child.genetics.rarity, "pets bred");
        Ok(child)
    }

    /// The caller's pets that could breed right now.
    ///
    /// # Errors
    ///
    /// Propagates store lookup failures.
    pub async fn breeding_available(&self, user_id: UserId) -> Result<Vec<Pet>, GameError> {
        let now = self.ctx.now();
        Ok(self
            .list(user_id)
            .await?
            .into_iter()
            .filter(|pet| pet.breeding_block(now).is_none())
            .collect())
    }
}

fn validate_name(raw: &str) -> Result<String, GameError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > 30 {
        return Err(GameError::InvalidInput(
            "pet name must be 1 to 30 characters".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::domain::ManualClock;
    use crate::domain::breeding::Rarity;
    use crate::service::AccountService;
    use crate::service::test_support::{context, signer};

    struct Fixture {
        pets: PetService,
        accounts: AccountService,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let (ctx, clock) = context();
        Fixture {
            pets: PetService::new(ctx.clone()),
            accounts: AccountService::new(ctx, signer(), 100.0),
            clock,
        }
    }

    async fn user_with_coins(f: &Fixture, coins: f64) -> (UserId, PetId) {
        let Ok(session) = f.accounts.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let id = session.user.id;
        if let Ok(shared) = f.pets.ctx.store.user(id).await {
            shared.write().await.ledger.coins = coins;
        }
        let Some(pet) = session.user.active_pet else {
            panic!("starter pet missing");
        };
        (id, pet)
    }

    #[tokio::test]
    async fn concurrent_feeds_both_apply() {
        let f = fixture();
        let (user, pet) = user_with_coins(&f, 100.0).await;
        if let Ok(shared) = f.pets.ctx.store.owned_pet(user, pet).await {
            shared.write().await.stats.hunger = 10.0;
        }

        let (a, b) = tokio::join!(
            f.pets.interact(user, pet, PetAction::Feed),
            f.pets.interact(user, pet, PetAction::Feed)
        );
        assert!(a.is_ok() && b.is_ok());
        let Ok(after) = f.pets.get(user, pet).await else {
            panic!("get failed");
        };
        assert!((after.stats.hunger - 70.0).abs() < 1e-9);
        assert_eq!(after.progression.experience, 20);
    }

    #[tokio::test]
    async fn feeding_basic_food_at_ninety_five_caps_at_hundred() {
        let f = fixture();
        let (user, pet) = user_with_coins(&f, 100.0).await;
        if let Ok(shared) = f.pets.ctx.store.owned_pet(user, pet).await {
            let mut guard = shared.write().await;
            guard.stats.hunger = 95.0;
            guard.inventory.add("food_basic", 1);
        }
        let Ok(outcome) = f.pets.feed(user, pet, Some("food_basic")).await else {
            panic!("feed failed");
        };
        assert_eq!(outcome.pet.stats.hunger, 100.0);
        assert_eq!(outcome.pet.inventory.quantity("food_basic"), 0);
    }

    #[tokio::test]
    async fn adopt_charges_price_atomically() {
        let f = fixture();
        let (user, _) = user_with_coins(&f, 110.0).await;

        let Err(GameError::InsufficientResource(_)) = f.pets.adopt(user, "Rex", "dog").await else {
            panic!("expected insufficient coins");
        };
        assert_eq!(f.pets.ctx.store.pet_ids_of(user).await.len(), 1);

        let Ok(pet) = f.pets.adopt(user, "Kitty", "cat").await else {
            panic!("adopt failed");
        };
        assert_eq!(pet.pet_type, "cat");
        assert_eq!(f.accounts.balance(user).await.ok(), Some(10.0));
        assert!(f.pets.adopt(user, "Ghost", "unicorn").await.is_err());
    }

    #[tokio::test]
    async fn foreign_pets_are_not_found() {
        let f = fixture();
        let (_, pet) = user_with_coins(&f, 100.0).await;
        let Err(GameError::NotFound { .. }) = f.pets.get(UserId::new(), pet).await else {
            panic!("expected not found");
        };
    }

    #[tokio::test]
    async fn breeding_creates_offspring_and_charges_parents() {
        let f = fixture();
        let (user, first) = user_with_coins(&f, 1000.0).await;
        let Ok(second) = f.pets.adopt(user, "Luna", "cat").await else {
            panic!("adopt failed");
        };
        let rolls = BreedingRolls {
            rarity: 0.05,
            color: 0.0,
            pattern: 0.9,
        };
        let Ok(child) = f.pets.breed_with(user, first, second.id, rolls).await else {
            panic!("breed failed");
        };
        assert_eq!(child.genetics.rarity, Rarity::Uncommon);
        assert_eq!(child.parents, vec![first, second.id]);
        assert_eq!(f.pets.ctx.store.pet_ids_of(user).await.len(), 3);

        let Ok(parent) = f.pets.get(user, first).await else {
            panic!("get failed");
        };
        assert_eq!(parent.health, 70.0);
        assert_eq!(parent.children, vec![child.id]);

        let Err(GameError::InsufficientResource(_)) =
            f.pets.breed_with(user, first, second.id, rolls).await
        else {
            panic!("expected cooldown");
        };

        f.clock.advance(Duration::minutes(61));
        assert!(f.pets.breed_with(user, second.id, first, rolls).await.is_ok());
    }

    #[tokio::test]
    async fn breeding_rejects_self_and_mixed_types() {
        let f = fixture();
        let (user, cat) = user_with_coins(&f, 1000.0).await;
        let Err(GameError::InvalidInput(_)) = f.pets.breed(user, cat, cat).await else {
            panic!("expected invalid input");
        };
        let Ok(dog) = f.pets.adopt(user, "Rex", "dog").await else {
            panic!("adopt failed");
        };
        let Err(GameError::InvalidInput(_)) = f.pets.breed(user, cat, dog.id).await else {
            panic!("expected invalid input");
        };
        let Ok(available) = f.pets.breeding_available(user).await else {
            panic!("listing failed");
        };
        assert_eq!(available.len(), 2);
    }

    #[tokio::test]
    async fn play_when_tired_is_rejected() {
        let f = fixture();
        let (user, pet) = user_with_coins(&f, 100.0).await;
        if let Ok(shared) = f.pets.ctx.store.owned_pet(user, pet).await {
            shared.write().await.stats.energy = 10.0;
        }
        let Err(GameError::InsufficientResource(_)) =
            f.pets.interact(user, pet, PetAction::Play).await
        else {
            panic!("expected insufficient energy");
        };
        assert!(f.pets.interact(user, pet, PetAction::Sleep).await.is_ok());
        assert!(f.pets.interact(user, pet, PetAction::Play).await.is_ok());
    }

    #[tokio::test]
    async fn rename_and_move_validate_input() {
        let f = fixture();
        let (user, pet) = user_with_coins(&f, 100.0).await;
        assert!(f.pets.rename(user, pet, "   ").await.is_err());
        let Ok(renamed) = f.pets.rename(user, pet, " Whiskers ").await else {
            panic!("rename failed");
        };
        assert_eq!(renamed.name, "Whiskers");
        assert!(f.pets.set_position(user, pet, 101.0, 5.0).await.is_err());
        let Ok(moved) = f.pets.set_position(user, pet, 10.0, 90.0).await else {
            panic!("move failed");
        };
        assert_eq!(moved.position, Position { x: 10.0, y: 90.0 });
    }
}
