//! Passive coin accrual and streak bonuses.
//!
//! Coins accrue at a flat rate. While a user keeps interacting (gaps no
//! longer than [`CoinPolicy::online_idle_secs`]), every elapsed second is
//! credited at the online rate. A longer gap is banked as offline time and
//! paid out by [`CoinLedger::collect_offline`] at the lower offline rate,
//! capped at [`CoinPolicy::offline_cap_secs`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Tunable accrual parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinPolicy {
    /// Coins per second while online.
    pub online_rate: f64,
    /// Coins per second of banked offline time.
    pub offline_rate: f64,
    /// Maximum offline seconds paid out per collection.
    pub offline_cap_secs: i64,
    /// Longest gap between accesses still counted as online.
    pub online_idle_secs: i64,
}

impl Default for CoinPolicy {
    fn default() -> Self {
        Self {
            online_rate: 1.0,
            offline_rate: 0.5,
            offline_cap_secs: 24 * 60 * 60,
            online_idle_secs: 120,
        }
    }
}

/// Coin-related state of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinLedger {
    /// Current balance, never negative.
    pub coins: f64,
    /// Instant up to which online accrual has been credited.
    pub last_coin_update: DateTime<Utc>,
    /// Offline seconds waiting for collection.
    pub pending_offline_secs: i64,
}

impl CoinLedger {
    /// A ledger holding `coins`, current as of `now`.
    #[must_use]
    pub fn new(coins: f64, now: DateTime<Utc>) -> Self {
        Self {
            coins: coins.max(0.0),
            last_coin_update: now,
            pending_offline_secs: 0,
        }
    }

    /// Brings online accrual up to `now` and returns the coins added.
    ///
    /// Only whole seconds are consumed; the sub-second remainder stays in
    /// `last_coin_update` for the next call.
    pub fn settle(&mut self, policy: &CoinPolicy, now: DateTime<Utc>) -> f64 {
        let secs = (now - self.last_coin_update).num_seconds();
        if secs <= 0 {
            return 0.0;
        }
        self.last_coin_update += Duration::seconds(secs);
        if secs > policy.online_idle_secs {
            self.pending_offline_secs = self.pending_offline_secs.saturating_add(secs);
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let added = secs as f64 * policy.online_rate.max(0.0);
        self.coins += added;
        added
    }

    /// Pays out banked offline time (capped) and clears the bank.
    pub fn collect_offline(&mut self, policy: &CoinPolicy) -> f64 {
        let window = self.pending_offline_secs.clamp(0, policy.offline_cap_secs.max(0));
        self.pending_offline_secs = 0;
        #[allow(clippy::cast_precision_loss)]
        let earned = (window as f64 * policy.offline_rate.max(0.0)).floor();
        self.coins += earned;
        earned
    }

    /// Adds a non-negative reward.
    pub fn credit(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.coins += amount;
        }
    }

    /// Deducts `amount`, all or nothing.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for negative or non-finite amounts and
    /// [`GameError::InsufficientResource`] when the balance is too low. The
    /// balance is unchanged on error.
    pub fn spend(&mut self, amount: f64) -> Result<f64, GameError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(GameError::InvalidInput(format!(
                "invalid coin amount: {amount}"
            )));
        }
        if amount > self.coins {
            return Err(GameError::InsufficientResource(format!(
                "insufficient coins: need {amount}, have {}",
                self.coins.floor()
            )));
        }
        self.coins -= amount;
        Ok(self.coins)
    }
}

/// Login streak counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginStreak {
    /// Consecutive login days.
    pub streak: u32,
    /// UTC day of the last login.
    pub last_login: NaiveDate,
}

impl LoginStreak {
    /// Records a login on `today` and returns the bonus coins earned.
    ///
    /// Next-day logins extend the streak (bonus `min(streak * 10, 100)`);
    /// longer breaks reset it (bonus 10); same-day logins earn nothing.
    pub fn record_login(&mut self, today: NaiveDate) -> f64 {
        let days = (today - self.last_login).num_days();
        let bonus = match days {
            1 => {
                self.streak = self.streak.saturating_add(1);
                f64::from(self.streak.saturating_mul(10).min(100))
            }
            d if d > 1 => {
                self.streak = 1;
                10.0
            }
            _ => 0.0,
        };
        self.last_login = today;
        bonus
    }
}

/// Daily reward streak counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyStreak {
    /// Consecutive claim days.
    pub streak: u32,
    /// UTC day of the last claim, if any.
    pub last_claim: Option<NaiveDate>,
}

impl DailyStreak {
    /// Claims today's reward and returns the bonus.
    ///
    /// # Errors
    ///
    /// [`GameError::Conflict`] if today's reward was already claimed.
    pub fn claim(&mut self, today: NaiveDate) -> Result<f64, GameError> {
        let days = self.last_claim.map(|d| (today - d).num_days());
        let bonus = match days {
            Some(0) => {
                return Err(GameError::Conflict(
                    "daily reward already claimed".to_string(),
                ));
            }
            Some(1) => {
                self.streak = self.streak.saturating_add(1);
                f64::from(self.streak.saturating_mul(100).min(1000))
            }
            _ => {
                self.streak = 1;
                100.0
            }
        };
        self.last_claim = Some(today);
        Ok(bonus)
    }
}
