//! Static game catalogs: pet types, shop items, and minigames.

use super::breeding::Rarity;
use super::stats::StatDelta;

/// An adoptable species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PetType {
    /// Stable identifier used by clients (`petTypeId`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Base rarity of adopted pets.
    pub rarity: Rarity,
    /// Adoption price in coins.
    pub price: f64,
    /// Minutes a parent waits after breeding.
    pub breeding_cooldown_mins: i64,
    /// Default coat color.
    pub color: &'static str,
    /// Default coat pattern.
    pub pattern: &'static str,
    /// Traits an adopted pet starts with.
    pub traits: &'static [&'static str],
}

/// Pet type handed out for free at registration.
pub const DEFAULT_PET_TYPE: &str = "cat";

/// All adoptable species.
pub static PET_TYPES: &[PetType] = &[
    PetType {
        id: "cat",
        name: "Cat",
        description: "A cute and playful kitty",
        rarity: Rarity::Common,
        price: 100.0,
        breeding_cooldown_mins: 60,
        color: "orange",
        pattern: "tabby",
        traits: &["curious", "agile"],
    },
    PetType {
        id: "dog",
        name: "Dog",
        description: "A loyal companion that loves fetch",
        rarity: Rarity::Common,
        price: 120.0,
        breeding_cooldown_mins: 60,
        color: "brown",
        pattern: "solid",
        traits: &["loyal", "energetic"],
    },
    PetType {
        id: "rabbit",
        name: "Rabbit",
        description: "A fluffy hopper with boundless energy",
        rarity: Rarity::Uncommon,
        price: 200.0,
        breeding_cooldown_mins: 90,
        color: "white",
        pattern: "solid",
        traits: &["quick", "shy"],
    },
    PetType {
        id: "robot",
        name: "Robot",
        description: "A mechanical companion",
        rarity: Rarity::Rare,
        price: 500.0,
        breeding_cooldown_mins: 180,
        color: "silver",
        pattern: "plated",
        traits: &["logical", "sturdy"],
    },
    PetType {
        id: "dragon",
        name: "Dragon",
        description: "A magical dragon that breathes fire",
        rarity: Rarity::Legendary,
        price: 1000.0,
        breeding_cooldown_mins: 720,
        color: "crimson",
        pattern: "scaled",
        traits: &["fierce", "wise", "proud"],
    },
];

/// Looks up a pet type by id.
#[must_use]
pub fn pet_type(id: &str) -> Option<&'static PetType> {
    PET_TYPES.iter().find(|t| t.id == id)
}

/// Category of a shop item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Consumed by feeding.
    Food,
    /// Reusable play item.
    Toy,
    /// Consumed to restore health.
    Medicine,
    /// Consumed to train.
    Training,
    /// Kept in the inventory.
    Accessory,
}

impl ItemKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Toy => "toy",
            Self::Medicine => "medicine",
            Self::Training => "training",
            Self::Accessory => "accessory",
        }
    }

    /// Whether using the item uses one unit up.
    #[must_use]
    pub const fn is_consumable(&self) -> bool {
        matches!(self, Self::Food | Self::Medicine | Self::Training)
    }
}

/// Effects an item applies when fed or used.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemEffects {
    /// Stat changes.
    pub stats: StatDelta,
    /// Health change.
    pub health: f64,
}

/// An item sold in the shop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopItem {
    /// Stable identifier used by clients (`itemId`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Category.
    pub kind: ItemKind,
    /// Unit price in coins.
    pub price: f64,
    /// Effects on use.
    pub effects: ItemEffects,
    /// Display icon.
    pub icon: &'static str,
    /// Rarity tier.
    pub rarity: Rarity,
}

const fn effects(hunger: f64, happiness: f64, energy: f64, playfulness: f64, health: f64) -> ItemEffects {
    ItemEffects {
        stats: StatDelta {
            hunger,
            happiness,
            energy,
            playfulness,
        },
        health,
    }
}

/// Everything the shop sells.
pub static SHOP_ITEMS: &[ShopItem] = &[
    ShopItem {
        id: "food_basic",
        name: "Basic Pet Food",
        description: "Standard nutritious food for your pet",
        kind: ItemKind::Food,
        price: 10.0,
        effects: effects(20.0, 5.0, 0.0, 0.0, 0.0),
        icon: "🍖",
        rarity: Rarity::Common,
    },
    ShopItem {
        id: "food_premium",
        name: "Premium Pet Food",
        description: "High-quality food that pets love",
        kind: ItemKind::Food,
        price: 25.0,
        effects: effects(40.0, 15.0, 10.0, 0.0, 0.0),
        icon: "🥩",
        rarity: Rarity::Rare,
    },
    ShopItem {
        id: "food_royal",
        name: "Royal Feast",
        description: "Luxurious meal fit for legendary pets",
        kind: ItemKind::Food,
        price: 50.0,
        effects: effects(100.0, 30.0, 25.0, 0.0, 0.0),
        icon: "👑",
        rarity: Rarity::Legendary,
    },
    ShopItem {
        id: "toy_ball",
        name: "Bouncy Ball",
        description: "A simple ball for playing fetch",
        kind: ItemKind::Toy,
        price: 15.0,
        effects: effects(0.0, 15.0, -10.0, 20.0, 0.0),
        icon: "⚽",
        rarity: Rarity::Common,
    },
    ShopItem {
        id: "toy_puzzle",
        name: "Pet Puzzle",
        description: "Stimulating puzzle toy for smart pets",
        kind: ItemKind::Toy,
        price: 35.0,
        effects: effects(0.0, 25.0, -15.0, 25.0, 0.0),
        icon: "🧩",
        rarity: Rarity::Rare,
    },
    ShopItem {
        id: "toy_robot",
        name: "Interactive Robot",
        description: "High-tech toy that plays with your pet",
        kind: ItemKind::Toy,
        price: 75.0,
        effects: effects(0.0, 40.0, -20.0, 40.0, 0.0),
        icon: "🤖",
        rarity: Rarity::Legendary,
    },
    ShopItem {
        id: "medicine_basic",
        name: "Basic Medicine",
        description: "Helps your pet recover from minor ailments",
        kind: ItemKind::Medicine,
        price: 30.0,
        effects: effects(0.0, 0.0, 0.0, 0.0, 30.0),
        icon: "💊",
        rarity: Rarity::Common,
    },
    ShopItem {
        id: "medicine_advanced",
        name: "Advanced Medicine",
        description: "Powerful medicine for serious conditions",
        kind: ItemKind::Medicine,
        price: 60.0,
        effects: effects(0.0, 0.0, 0.0, 0.0, 70.0),
        icon: "🏥",
        rarity: Rarity::Rare,
    },
    ShopItem {
        id: "training_basic",
        name: "Training Manual",
        description: "Basic training guide for pets",
        kind: ItemKind::Training,
        price: 40.0,
        effects: effects(0.0, 5.0, -20.0, 10.0, 0.0),
        icon: "📖",
        rarity: Rarity::Common,
    },
    ShopItem {
        id: "accessory_party_hat",
        name: "Party Hat",
        description: "A festive hat for celebrations",
        kind: ItemKind::Accessory,
        price: 45.0,
        effects: effects(0.0, 0.0, 0.0, 0.0, 0.0),
        icon: "🎉",
        rarity: Rarity::Uncommon,
    },
    ShopItem {
        id: "accessory_bow_tie",
        name: "Bow Tie",
        description: "A dapper bow tie",
        kind: ItemKind::Accessory,
        price: 30.0,
        effects: effects(0.0, 0.0, 0.0, 0.0, 0.0),
        icon: "🎀",
        rarity: Rarity::Common,
    },
];

/// Looks up a shop item by id.
#[must_use]
pub fn shop_item(id: &str) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|i| i.id == id)
}

/// Inclusive reward range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardRange {
    /// Reward at a score ratio of 0.
    pub min: f64,
    /// Reward at a score ratio of 1.
    pub max: f64,
}

impl RewardRange {
    /// Linear interpolation at `ratio`, floored.
    #[must_use]
    pub fn at(&self, ratio: f64) -> f64 {
        (self.min + (self.max - self.min) * ratio).floor()
    }
}

/// A minigame definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniGame {
    /// Stable identifier used by clients (`gameId`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Difficulty label.
    pub difficulty: &'static str,
    /// Energy deducted from the pet at start.
    pub energy_cost: f64,
    /// Minutes before the same user may start the game again.
    pub cooldown_mins: i64,
    /// Minimum pet level.
    pub required_level: u32,
    /// Score that earns the full reward.
    pub target_score: f64,
    /// Coin reward range.
    pub coins: RewardRange,
    /// Experience reward range.
    pub experience: RewardRange,
    /// Stat boosts at a full score.
    pub stat_boosts: StatDelta,
}

/// Reported durations above this are rejected.
pub const MAX_GAME_DURATION_SECS: f64 = 300.0;

/// All minigames.
pub static MINI_GAMES: &[MiniGame] = &[
    MiniGame {
        id: "memory",
        name: "Memory Match",
        description: "Flip cards and find the pairs",
        difficulty: "easy",
        energy_cost: 10.0,
        cooldown_mins: 0,
        required_level: 1,
        target_score: 1000.0,
        coins: RewardRange { min: 10.0, max: 50.0 },
        experience: RewardRange { min: 5.0, max: 25.0 },
        stat_boosts: StatDelta {
            hunger: 0.0,
            happiness: 15.0,
            energy: 0.0,
            playfulness: 10.0,
        },
    },
    MiniGame {
        id: "puzzle",
        name: "Sliding Puzzle",
        description: "Put the tiles back in order",
        difficulty: "medium",
        energy_cost: 15.0,
        cooldown_mins: 5,
        required_level: 2,
        target_score: 1000.0,
        coins: RewardRange { min: 20.0, max: 80.0 },
        experience: RewardRange { min: 10.0, max: 40.0 },
        stat_boosts: StatDelta {
            hunger: 0.0,
            happiness: 10.0,
            energy: 0.0,
            playfulness: 15.0,
        },
    },
    MiniGame {
        id: "racing",
        name: "Pet Racing",
        description: "Dash across the track before time runs out",
        difficulty: "hard",
        energy_cost: 25.0,
        cooldown_mins: 10,
        required_level: 3,
        target_score: 1500.0,
        coins: RewardRange { min: 30.0, max: 120.0 },
        experience: RewardRange { min: 15.0, max: 60.0 },
        stat_boosts: StatDelta {
            hunger: -10.0,
            happiness: 25.0,
            energy: 0.0,
            playfulness: 30.0,
        },
    },
    MiniGame {
        id: "training",
        name: "Agility Training",
        description: "Follow the commands to train your pet",
        difficulty: "medium",
        energy_cost: 20.0,
        cooldown_mins: 15,
        required_level: 1,
        target_score: 800.0,
        coins: RewardRange { min: 5.0, max: 30.0 },
        experience: RewardRange { min: 20.0, max: 80.0 },
        stat_boosts: StatDelta {
            hunger: -5.0,
            happiness: 10.0,
            energy: 0.0,
            playfulness: 5.0,
        },
    },
];

/// Looks up a minigame by id.
#[must_use]
pub fn mini_game(id: &str) -> Option<&'static MiniGame> {
    MINI_GAMES.iter().find(|g| g.id == id)
}

impl MiniGame {
    /// `score / target_score` clamped to `[0, 1]`.
    #[must_use]
    pub fn score_ratio(&self, score: f64) -> f64 {
        if self.target_score <= 0.0 || !score.is_finite() {
            return 0.0;
        }
        (score / self.target_score).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = SHOP_ITEMS.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SHOP_ITEMS.len());

        let mut types: Vec<&str> = PET_TYPES.iter().map(|t| t.id).collect();
        types.sort_unstable();
        types.dedup();
        assert_eq!(types.len(), PET_TYPES.len());
    }

    #[test]
    fn default_pet_type_exists() {
        assert!(pet_type(DEFAULT_PET_TYPE).is_some());
    }

    #[test]
    fn basic_food_restores_twenty_hunger() {
        let Some(item) = shop_item("food_basic") else {
            unreachable!("catalog entry missing");
        };
        assert_eq!(item.kind, ItemKind::Food);
        assert_eq!(item.effects.stats.hunger, 20.0);
    }

    #[test]
    fn reward_interpolation() {
        let range = RewardRange { min: 10.0, max: 50.0 };
        assert_eq!(range.at(0.0), 10.0);
        assert_eq!(range.at(0.5), 30.0);
        assert_eq!(range.at(1.0), 50.0);
        assert_eq!(range.at(0.33), 23.0);
    }

    #[test]
    fn score_ratio_is_clamped() {
        let Some(game) = mini_game("memory") else {
            unreachable!("catalog entry missing");
        };
        assert_eq!(game.score_ratio(-50.0), 0.0);
        assert_eq!(game.score_ratio(500.0), 0.5);
        assert_eq!(game.score_ratio(5000.0), 1.0);
    }
}
