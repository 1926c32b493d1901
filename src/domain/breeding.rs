//! Rarity tiers and offspring genetics.
//!
//! Rarity resolution uses one roll in `[0, 1)`:
//!
//! | roll            | offspring rarity                       |
//! |-----------------|----------------------------------------|
//! | `< 0.10`        | one tier above the rarer parent, capped |
//! | `0.10 .. 0.40`  | the rarer parent's tier                |
//! | `>= 0.40`       | the more common parent's tier          |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound of the "upgrade" bucket.
pub const UPGRADE_CHANCE: f64 = 0.10;

/// Upper bound of the "inherit the rarer parent" bucket.
pub const INHERIT_MAX_CHANCE: f64 = 0.40;

/// Maximum number of traits an offspring inherits.
pub const MAX_TRAITS: usize = 3;

/// Ordered rarity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Tier 0.
    #[default]
    Common,
    /// Tier 1.
    Uncommon,
    /// Tier 2.
    Rare,
    /// Tier 3.
    Epic,
    /// Tier 4, the cap.
    Legendary,
}

impl Rarity {
    /// All tiers in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
    ];

    /// The next tier up, or `self` at the top.
    #[must_use]
    pub const fn upgraded(self) -> Self {
        match self {
            Self::Common => Self::Uncommon,
            Self::Uncommon => Self::Rare,
            Self::Rare => Self::Epic,
            Self::Epic | Self::Legendary => Self::Legendary,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown rarity: {s}"))
    }
}

/// Resolves an offspring's rarity from its parents and a roll in `[0, 1)`.
#[must_use]
pub fn resolve_rarity(parent1: Rarity, parent2: Rarity, roll: f64) -> Rarity {
    let rarer = parent1.max(parent2);
    let commoner = parent1.min(parent2);
    if roll < UPGRADE_CHANCE {
        rarer.upgraded()
    } else if roll < INHERIT_MAX_CHANCE {
        rarer
    } else {
        commoner
    }
}

/// Union of both parents' traits in first-encounter order, parent 1 first,
/// without duplicates, truncated to [`MAX_TRAITS`].
#[must_use]
pub fn merge_traits(parent1: &[String], parent2: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(MAX_TRAITS);
    for t in parent1.iter().chain(parent2) {
        if merged.len() == MAX_TRAITS {
            break;
        }
        if !merged.contains(t) {
            merged.push(t.clone());
        }
    }
    merged
}

/// Picks one of two parent values with a roll in `[0, 1)`.
#[must_use]
pub fn pick_parent<'a>(parent1: &'a str, parent2: &'a str, roll: f64) -> &'a str {
    if roll < 0.5 { parent1 } else { parent2 }
}

/// Heritable part of a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genetics {
    /// Rarity tier.
    pub rarity: Rarity,
    /// Coat color.
    pub color: String,
    /// Coat pattern.
    pub pattern: String,
    /// Up to [`MAX_TRAITS`] named traits.
    pub traits: Vec<String>,
}

/// Three independent rolls in `[0, 1)` driving one breeding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreedingRolls {
    /// Rarity roll.
    pub rarity: f64,
    /// Color roll.
    pub color: f64,
    /// Pattern roll.
    pub pattern: f64,
}

impl BreedingRolls {
    /// Draws fresh rolls from the thread RNG.
    #[must_use]
    pub fn random() -> Self {
        Self {
            rarity: rand::random::<f64>(),
            color: rand::random::<f64>(),
            pattern: rand::random::<f64>(),
        }
    }
}

impl Genetics {
    /// Derives offspring genetics from two parents.
    #[must_use]
    pub fn offspring(parent1: &Self, parent2: &Self, rolls: BreedingRolls) -> Self {
        Self {
            rarity: resolve_rarity(parent1.rarity, parent2.rarity, rolls.rarity),
            color: pick_parent(&parent1.color, &parent2.color, rolls.color).to_string(),
            pattern: pick_parent(&parent1.pattern, &parent2.pattern, rolls.pattern).to_string(),
            traits: merge_traits(&parent1.traits, &parent2.traits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn bucket_boundaries() {
        use Rarity::*;
        assert_eq!(resolve_rarity(Common, Rare, 0.0), Epic);
        assert_eq!(resolve_rarity(Common, Rare, 0.0999), Epic);
        assert_eq!(resolve_rarity(Common, Rare, 0.10), Rare);
        assert_eq!(resolve_rarity(Common, Rare, 0.3999), Rare);
        assert_eq!(resolve_rarity(Common, Rare, 0.40), Common);
        assert_eq!(resolve_rarity(Common, Rare, 0.9999), Common);
    }

    #[test]
    fn upgrade_caps_at_legendary() {
        assert_eq!(
            resolve_rarity(Rarity::Legendary, Rarity::Epic, 0.05),
            Rarity::Legendary
        );
    }

    #[test]
    fn two_common_parents_exact_distribution() {
        // Both parents common: only the upgrade bucket differs from common.
        let mut uncommon = 0;
        let mut common = 0;
        for i in 0..1000 {
            let roll = f64::from(i) / 1000.0;
            match resolve_rarity(Rarity::Common, Rarity::Common, roll) {
                Rarity::Uncommon => uncommon += 1,
                Rarity::Common => common += 1,
                other => unreachable!("unexpected rarity {other}"),
            }
        }
        assert_eq!(uncommon, 100);
        assert_eq!(common, 900);
    }

    #[test]
    fn traits_dedupe_in_first_encounter_order() {
        let merged = merge_traits(&strings(&["brave", "swift"]), &strings(&["swift", "calm", "loud"]));
        assert_eq!(merged, strings(&["brave", "swift", "calm"]));
    }

    #[test]
    fn traits_truncate_to_three() {
        let merged = merge_traits(&strings(&["a", "b", "c", "d"]), &strings(&["e"]));
        assert_eq!(merged, strings(&["a", "b", "c"]));
    }

    #[test]
    fn traits_of_empty_parents_are_empty() {
        assert!(merge_traits(&[], &[]).is_empty());
    }

    #[test]
    fn offspring_picks_each_parent_value_independently() {
        let p1 = Genetics {
            rarity: Rarity::Rare,
            color: "red".into(),
            pattern: "spots".into(),
            traits: strings(&["brave"]),
        };
        let p2 = Genetics {
            rarity: Rarity::Common,
            color: "blue".into(),
            pattern: "stripes".into(),
            traits: strings(&["calm"]),
        };
        let child = Genetics::offspring(
            &p1,
            &p2,
            BreedingRolls {
                rarity: 0.2,
                color: 0.1,
                pattern: 0.9,
            },
        );
        assert_eq!(child.rarity, Rarity::Rare);
        assert_eq!(child.color, "red");
        assert_eq!(child.pattern, "stripes");
        assert_eq!(child.traits, strings(&["brave", "calm"]));
    }

    #[test]
    fn rarity_parses_wire_names() {
        assert_eq!("epic".parse::<Rarity>(), Ok(Rarity::Epic));
        assert!("mythic".parse::<Rarity>().is_err());
    }
}
