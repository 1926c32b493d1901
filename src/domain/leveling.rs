//! Experience and level progression.
//!
//! Reaching level `L + 1` from level `L` costs `L * 100` experience. A
//! single large award cascades through as many thresholds as it covers.

use serde::{Deserialize, Serialize};

/// Experience required per level step, multiplied by the current level.
pub const XP_PER_LEVEL: u64 = 100;

/// Level and leftover experience of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Current level, starting at 1.
    pub level: u32,
    /// Experience carried toward the next level.
    pub experience: u64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
        }
    }
}

/// Outcome of an experience award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelUp {
    /// Number of thresholds crossed.
    pub levels_gained: u32,
}

impl LevelUp {
    /// `true` if at least one level was gained.
    #[must_use]
    pub const fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Experience needed to advance from `level`.
#[must_use]
pub fn threshold_for(level: u32) -> u64 {
    u64::from(level.max(1)).saturating_mul(XP_PER_LEVEL)
}

impl Progression {
    /// Adds `amount` experience and cascades level-ups.
    pub fn award(&mut self, amount: u64) -> LevelUp {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0u32;
        loop {
            let needed = threshold_for(self.level);
            if self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level = self.level.saturating_add(1);
            gained = gained.saturating_add(1);
        }
        LevelUp {
            levels_gained: gained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_crossing_carries_remainder() {
        let mut p = Progression {
            level: 2,
            experience: 150,
        };
        let up = p.award(60);
        assert!(up.leveled_up());
        assert_eq!(up.levels_gained, 1);
        assert_eq!(p.level, 3);
        assert_eq!(p.experience, 10);
    }

    #[test]
    fn below_threshold_does_not_level() {
        let mut p = Progression::default();
        let up = p.award(99);
        assert!(!up.leveled_up());
        assert_eq!(p.level, 1);
        assert_eq!(p.experience, 99);
    }

    #[test]
    fn exact_threshold_levels_with_zero_remainder() {
        let mut p = Progression::default();
        assert!(p.award(100).leveled_up());
        assert_eq!(p, Progression { level: 2, experience: 0 });
    }

    #[test]
    fn large_award_cascades() {
        // 100 (1->2) + 200 (2->3) + 300 (3->4) = 600, 50 left over.
        let mut p = Progression::default();
        let up = p.award(650);
        assert_eq!(up.levels_gained, 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 50);
    }

    #[test]
    fn zero_award_is_noop() {
        let mut p = Progression {
            level: 5,
            experience: 12,
        };
        assert_eq!(p.award(0), LevelUp::default());
        assert_eq!(p.level, 5);
        assert_eq!(p.experience, 12);
    }
}
