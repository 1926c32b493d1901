//! Pet stats, passive decay, and clamped stat deltas.
//!
//! All four percentage stats live in the closed range `[0, 100]`. Every
//! mutation goes through [`clamp_stat`], so no sequence of deltas can push
//! a stat outside that range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of every percentage stat.
pub const STAT_MIN: f64 = 0.0;

/// Upper bound of every percentage stat.
pub const STAT_MAX: f64 = 100.0;

/// Passive hunger loss per second.
pub const HUNGER_DECAY_PER_SEC: f64 = 0.01;
/// Passive happiness loss per second.
pub const HAPPINESS_DECAY_PER_SEC: f64 = 0.008;
/// Passive energy loss per second.
pub const ENERGY_DECAY_PER_SEC: f64 = 0.005;
/// Passive playfulness loss per second.
pub const PLAYFULNESS_DECAY_PER_SEC: f64 = 0.012;

/// Clamps a stat value into `[0, 100]`. `NaN` collapses to 0.
#[must_use]
pub fn clamp_stat(value: f64) -> f64 {
    if value.is_nan() {
        return STAT_MIN;
    }
    value.clamp(STAT_MIN, STAT_MAX)
}

/// The four decaying stats of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PetStats {
    /// Satiety; 100 means fully fed.
    pub hunger: f64,
    /// Mood.
    pub happiness: f64,
    /// Stamina; gates playing and minigames.
    pub energy: f64,
    /// Eagerness to play.
    pub playfulness: f64,
}

impl Default for PetStats {
    fn default() -> Self {
        Self::full()
    }
}

impl PetStats {
    /// All stats at 100.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            hunger: STAT_MAX,
            happiness: STAT_MAX,
            energy: STAT_MAX,
            playfulness: STAT_MAX,
        }
    }

    /// Returns the stats as of `now`, given they were last current at
    /// `last_interaction`.
    ///
    /// Each stat drops linearly at its own fixed rate and floors at 0.
    /// A `now` earlier than `last_interaction` decays nothing.
    #[must_use]
    pub fn decayed(&self, last_interaction: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = elapsed_secs(last_interaction, now);
        Self {
            hunger: clamp_stat(self.hunger - elapsed * HUNGER_DECAY_PER_SEC),
            happiness: clamp_stat(self.happiness - elapsed * HAPPINESS_DECAY_PER_SEC),
            energy: clamp_stat(self.energy - elapsed * ENERGY_DECAY_PER_SEC),
            playfulness: clamp_stat(self.playfulness - elapsed * PLAYFULNESS_DECAY_PER_SEC),
        }
    }

    /// Applies a delta, clamping every stat.
    pub fn apply(&mut self, delta: &StatDelta) {
        self.hunger = clamp_stat(self.hunger + delta.hunger);
        self.happiness = clamp_stat(self.happiness + delta.happiness);
        self.energy = clamp_stat(self.energy + delta.energy);
        self.playfulness = clamp_stat(self.playfulness + delta.playfulness);
    }

    /// Coarse mood label derived from the current stats.
    #[must_use]
    pub fn emotion(&self) -> Emotion {
        if self.hunger < 30.0 {
            Emotion::Hungry
        } else if self.energy < 30.0 {
            Emotion::Tired
        } else if self.happiness < 30.0 {
            Emotion::Sad
        } else if self.playfulness < 30.0 {
            Emotion::Bored
        } else if self.hunger > 80.0 && self.happiness > 80.0 && self.energy > 80.0 {
            Emotion::Ecstatic
        } else if self.happiness > 70.0 {
            Emotion::Happy
        } else {
            Emotion::Neutral
        }
    }
}

/// Signed change to each stat. Missing effects are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatDelta {
    /// Hunger change.
    pub hunger: f64,
    /// Happiness change.
    pub happiness: f64,
    /// Energy change.
    pub energy: f64,
    /// Playfulness change.
    pub playfulness: f64,
}

impl StatDelta {
    /// Scales every component by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            hunger: self.hunger * factor,
            happiness: self.happiness * factor,
            energy: self.energy * factor,
            playfulness: self.playfulness * factor,
        }
    }
}

/// Mood label shown by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    /// Hunger below 30.
    Hungry,
    /// Energy below 30.
    Tired,
    /// Happiness below 30.
    Sad,
    /// Playfulness below 30.
    Bored,
    /// Hunger, happiness and energy all above 80.
    Ecstatic,
    /// Happiness above 70.
    Happy,
    /// Anything else.
    Neutral,
}

impl Emotion {
    /// Wire name of the emotion.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hungry => "hungry",
            Self::Tired => "tired",
            Self::Sad => "sad",
            Self::Bored => "bored",
            Self::Ecstatic => "ecstatic",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
        }
    }
}

/// Seconds between two instants as `f64`, never negative.
#[must_use]
pub fn elapsed_secs(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds();
    if millis <= 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let secs = millis as f64 / 1000.0;
    secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000)
    }

    fn in_range(s: &PetStats) -> bool {
        [s.hunger, s.happiness, s.energy, s.playfulness]
            .iter()
            .all(|v| (STAT_MIN..=STAT_MAX).contains(v))
    }

    #[test]
    fn decay_applies_per_stat_rates() {
        let stats = PetStats::full();
        let later = stats.decayed(t0(), t0() + Duration::seconds(1000));
        assert!((later.hunger - 90.0).abs() < 1e-9);
        assert!((later.happiness - 92.0).abs() < 1e-9);
        assert!((later.energy - 95.0).abs() < 1e-9);
        assert!((later.playfulness - 88.0).abs() < 1e-9);
    }

    #[test]
    fn hunger_decays_faster_than_energy() {
        let later = PetStats::full().decayed(t0(), t0() + Duration::hours(1));
        assert!(later.hunger < later.energy);
    }

    #[test]
    fn long_absence_floors_at_zero() {
        let later = PetStats::full().decayed(t0(), t0() + Duration::days(30));
        assert_eq!(later.hunger, 0.0);
        assert_eq!(later.happiness, 0.0);
        assert_eq!(later.energy, 0.0);
        assert_eq!(later.playfulness, 0.0);
    }

    #[test]
    fn clock_skew_decays_nothing() {
        let stats = PetStats {
            hunger: 40.0,
            happiness: 50.0,
            energy: 60.0,
            playfulness: 70.0,
        };
        assert_eq!(stats.decayed(t0(), t0() - Duration::minutes(5)), stats);
    }

    #[test]
    fn decay_stays_in_range_for_many_elapsed_times() {
        let start = PetStats {
            hunger: 3.0,
            happiness: 99.5,
            energy: 0.0,
            playfulness: 57.25,
        };
        for secs in [0, 1, 59, 3_600, 86_400, 10_000_000] {
            let s = start.decayed(t0(), t0() + Duration::seconds(secs));
            assert!(in_range(&s), "out of range after {secs}s: {s:?}");
        }
    }

    #[test]
    fn apply_clamps_both_directions() {
        let mut stats = PetStats {
            hunger: 95.0,
            happiness: 5.0,
            energy: 50.0,
            playfulness: 50.0,
        };
        stats.apply(&StatDelta {
            hunger: 20.0,
            happiness: -30.0,
            energy: 0.0,
            playfulness: 500.0,
        });
        assert_eq!(stats.hunger, 100.0);
        assert_eq!(stats.happiness, 0.0);
        assert_eq!(stats.energy, 50.0);
        assert_eq!(stats.playfulness, 100.0);
    }

    #[test]
    fn clamp_handles_nan() {
        assert_eq!(clamp_stat(f64::NAN), 0.0);
    }

    #[test]
    fn emotion_priorities() {
        let mut s = PetStats::full();
        assert_eq!(s.emotion(), Emotion::Ecstatic);
        s.energy = 10.0;
        s.hunger = 10.0;
        assert_eq!(s.emotion(), Emotion::Hungry);
        s.hunger = 50.0;
        assert_eq!(s.emotion(), Emotion::Tired);
        s.energy = 50.0;
        s.happiness = 75.0;
        assert_eq!(s.emotion(), Emotion::Happy);
        s.happiness = 50.0;
        assert_eq!(s.emotion(), Emotion::Neutral);
    }
}
