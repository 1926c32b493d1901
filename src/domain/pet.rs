//! Pets and the discrete interactions that mutate them.
//!
//! Every interaction first brings the stats current with
//! [`Pet::refresh`], then applies a clamped delta. Validation happens
//! before any field is touched, so a rejected interaction leaves the pet
//! exactly as it was after the refresh.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::breeding::{BreedingRolls, Genetics};
use super::catalog::{ItemKind, PetType, ShopItem};
use super::ids::{PetId, UserId};
use super::inventory::Inventory;
use super::leveling::{LevelUp, Progression};
use super::registry::Entity;
use super::stats::{PetStats, StatDelta, clamp_stat};
use crate::error::GameError;

/// Minimum energy required to play.
pub const PLAY_MIN_ENERGY: f64 = 20.0;
/// Minimum health required of each breeding parent.
pub const BREEDING_MIN_HEALTH: f64 = 50.0;
/// Minimum energy required of each breeding parent.
pub const BREEDING_MIN_ENERGY: f64 = 20.0;
/// Health a parent loses when breeding.
pub const BREEDING_HEALTH_COST: f64 = 30.0;
/// Happiness a parent loses when breeding.
pub const BREEDING_HAPPINESS_COST: f64 = 20.0;
/// Experience granted by every interaction.
pub const INTERACTION_XP: u64 = 10;

/// Position of a pet in its room, both axes in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

impl Position {
    /// Validates both coordinates.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] if either axis is outside `[0, 100]`.
    pub fn new(x: f64, y: f64) -> Result<Self, GameError> {
        let valid = |v: f64| (0.0..=100.0).contains(&v);
        if !valid(x) || !valid(y) {
            return Err(GameError::InvalidInput(
                "position values must be between 0 and 100".to_string(),
            ));
        }
        Ok(Self { x, y })
    }
}

/// The fixed interactions on a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetAction {
    /// Hunger +30, happiness +10.
    Feed,
    /// Requires energy ≥ 20: happiness +20, playfulness +30, energy −20.
    Play,
    /// Energy set to 100.
    Sleep,
    /// Happiness +15.
    Pat,
}

impl PetAction {
    /// Name used in logs and events.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Play => "play",
            Self::Sleep => "sleep",
            Self::Pat => "pet",
        }
    }
}

/// A user-owned creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    /// Identifier.
    pub id: PetId,
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: String,
    /// Catalog pet type id.
    pub pet_type: String,
    /// Decaying stats.
    pub stats: PetStats,
    /// Health in `[0, 100]`; does not decay passively.
    pub health: f64,
    /// Level and experience.
    pub progression: Progression,
    /// Instant the stats were last brought current.
    pub last_interaction: DateTime<Utc>,
    /// Heritable traits.
    pub genetics: Genetics,
    /// Items bought for this pet.
    pub inventory: Inventory,
    /// Room position.
    pub position: Position,
    /// Parents, if bred.
    pub parents: Vec<PetId>,
    /// Offspring.
    pub children: Vec<PetId>,
    /// Breeding is blocked until this instant.
    pub breeding_cooldown_until: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Entity for Pet {
    type Id = PetId;
    const KIND: &'static str = "pet";

    fn id(&self) -> PetId {
        self.id
    }
}

impl Pet {
    /// A fresh pet of `pet_type` with full stats.
    #[must_use]
    pub fn adopt(owner: UserId, name: String, pet_type: &PetType, now: DateTime<Utc>) -> Self {
        let genetics = Genetics {
            rarity: pet_type.rarity,
            color: pet_type.color.to_string(),
            pattern: pet_type.pattern.to_string(),
            traits: pet_type.traits.iter().map(|t| (*t).to_string()).collect(),
        };
        Self::born(owner, name, pet_type.id.to_string(), genetics, Vec::new(), now)
    }

    fn born(
        owner: UserId,
        name: String,
        pet_type: String,
        genetics: Genetics,
        parents: Vec<PetId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PetId::new(),
            owner,
            name,
            pet_type,
            stats: PetStats::full(),
            health: 100.0,
            progression: Progression::default(),
            last_interaction: now,
            genetics,
            inventory: Inventory::default(),
            position: Position::default(),
            parents,
            children: Vec::new(),
            breeding_cooldown_until: None,
            created_at: now,
        }
    }

    /// Applies passive decay up to `now` and marks the pet current.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        self.stats = self.stats.decayed(self.last_interaction, now);
        if now > self.last_interaction {
            self.last_interaction = now;
        }
    }

    /// Performs one of the fixed interactions.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientResource`] when playing with less than
    /// [`PLAY_MIN_ENERGY`] energy.
    pub fn interact(&mut self, action: PetAction, now: DateTime<Utc>) -> Result<LevelUp, GameError> {
        self.refresh(now);
        match action {
            PetAction::Feed => self.stats.apply(&StatDelta {
                hunger: 30.0,
                happiness: 10.0,
                ..StatDelta::default()
            }),
            PetAction::Play => {
                if self.stats.energy < PLAY_MIN_ENERGY {
                    return Err(GameError::InsufficientResource(
                        "pet is too tired to play".to_string(),
                    ));
                }
                self.stats.apply(&StatDelta {
                    happiness: 20.0,
                    playfulness: 30.0,
                    energy: -20.0,
                    ..StatDelta::default()
                });
            }
            PetAction::Sleep => self.stats.energy = 100.0,
            PetAction::Pat => self.stats.apply(&StatDelta {
                happiness: 15.0,
                ..StatDelta::default()
            }),
        }
        Ok(self.progression.award(INTERACTION_XP))
    }

    /// Feeds one unit of a food item from the pet's inventory.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] if the item is not food,
    /// [`GameError::NotFound`] if the pet holds none.
    pub fn feed_item(&mut self, item: &ShopItem, now: DateTime<Utc>) -> Result<LevelUp, GameError> {
        if item.kind != ItemKind::Food {
            return Err(GameError::InvalidInput(format!("{} is not food", item.id)));
        }
        self.refresh(now);
        self.inventory.take_one(item.id)?;
        self.apply_effects(item);
        Ok(self.progression.award(INTERACTION_XP))
    }

    /// Uses a toy, medicine, or training item from the pet's inventory.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for food (use feeding) or accessories,
    /// [`GameError::NotFound`] if the pet holds none.
    pub fn use_item(&mut self, item: &ShopItem, now: DateTime<Utc>) -> Result<LevelUp, GameError> {
        match item.kind {
            ItemKind::Food => {
                return Err(GameError::InvalidInput(format!(
                    "{} is food; feed it instead",
                    item.id
                )));
            }
            ItemKind::Accessory => {
                return Err(GameError::InvalidInput(format!(
                    "{} is an accessory and cannot be used",
                    item.id
                )));
            }
            ItemKind::Toy | ItemKind::Medicine | ItemKind::Training => {}
        }
        if self.inventory.quantity(item.id) == 0 {
            return Err(GameError::not_found("inventory item", item.id));
        }
        self.refresh(now);
        if item.kind.is_consumable() {
            self.inventory.take_one(item.id)?;
        }
        self.apply_effects(item);
        Ok(self.progression.award(INTERACTION_XP))
    }

    fn apply_effects(&mut self, item: &ShopItem) {
        self.stats.apply(&item.effects.stats);
        self.health = clamp_stat(self.health + item.effects.health);
    }

    /// Whether the pet may breed at `now`.
    #[must_use]
    pub fn breeding_block(&self, now: DateTime<Utc>) -> Option<&'static str> {
        if self.breeding_cooldown_until.is_some_and(|until| now < until) {
            Some("is on breeding cooldown")
        } else if self.health < BREEDING_MIN_HEALTH {
            Some("needs at least 50 health to breed")
        } else if self.stats.energy < BREEDING_MIN_ENERGY {
            Some("needs at least 20 energy to breed")
        } else {
            None
        }
    }

    /// Builds an offspring of `self` and `other`.
    ///
    /// Callers must have checked eligibility; this only derives the child.
    #[must_use]
    pub fn offspring_with(&self, other: &Self, rolls: BreedingRolls, now: DateTime<Utc>) -> Self {
        Self::born(
            self.owner,
            format!("Baby {}", self.name),
            self.pet_type.clone(),
            Genetics::offspring(&self.genetics, &other.genetics, rolls),
            vec![self.id, other.id],
            now,
        )
    }

    /// Charges the breeding cost and starts the cooldown.
    pub fn finish_breeding(&mut self, child: PetId, cooldown_mins: i64, now: DateTime<Utc>) {
        self.children.push(child);
        self.health = clamp_stat(self.health - BREEDING_HEALTH_COST);
        self.stats.happiness = clamp_stat(self.stats.happiness - BREEDING_HAPPINESS_COST);
        self.breeding_cooldown_until = Some(now + Duration::minutes(cooldown_mins));
    }
}
