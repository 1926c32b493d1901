//! Minigame sessions, rewards and per-user progress.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{MAX_GAME_DURATION_SECS, MiniGame};
use super::ids::{PetId, UserId};
use super::stats::StatDelta;
use crate::error::GameError;

/// Key of an open session and of a progress row.
pub type GameKey = (UserId, String);

/// A started, unfinished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// Player.
    pub user_id: UserId,
    /// Game id.
    pub game_id: String,
    /// Pet playing.
    pub pet_id: PetId,
    /// Start instant.
    pub started_at: DateTime<Utc>,
}

/// Cumulative results of one user in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    /// Player.
    pub user_id: UserId,
    /// Game id.
    pub game_id: String,
    /// Finished rounds.
    pub times_played: u32,
    /// Best reported score.
    pub high_score: f64,
    /// Coins earned across rounds.
    pub total_coins_earned: f64,
    /// Experience earned across rounds.
    pub total_experience_gained: u64,
    /// When the last round finished.
    pub last_played: Option<DateTime<Utc>>,
}

impl GameProgress {
    /// An empty row.
    #[must_use]
    pub fn new(user_id: UserId, game_id: &str) -> Self {
        Self {
            user_id,
            game_id: game_id.to_string(),
            times_played: 0,
            high_score: 0.0,
            total_coins_earned: 0.0,
            total_experience_gained: 0,
            last_played: None,
        }
    }

    /// Instant the game may be started again, if a cooldown applies.
    #[must_use]
    pub fn cooldown_until(&self, game: &MiniGame) -> Option<DateTime<Utc>> {
        if game.cooldown_mins <= 0 {
            return None;
        }
        self.last_played
            .map(|at| at + Duration::minutes(game.cooldown_mins))
    }

    /// Folds a finished round in.
    pub fn record(&mut self, score: f64, reward: &GameReward, now: DateTime<Utc>) {
        self.times_played = self.times_played.saturating_add(1);
        self.high_score = self.high_score.max(score);
        self.total_coins_earned += reward.coins;
        self.total_experience_gained = self
            .total_experience_gained
            .saturating_add(reward.experience);
        self.last_played = Some(now);
    }
}

/// What a finished round pays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameReward {
    /// Coins for the user.
    pub coins: f64,
    /// Experience for the pet.
    pub experience: u64,
    /// Stat boosts for the pet, already scaled by the score ratio.
    pub stat_boosts: StatDelta,
}

/// Validates a reported result and computes its reward.
///
/// # Errors
///
/// [`GameError::InvalidInput`] for a negative or non-finite score, or a
/// duration outside `[0, 300]` seconds.
pub fn reward_for(game: &MiniGame, score: f64, duration_secs: f64) -> Result<GameReward, GameError> {
    if !score.is_finite() || score < 0.0 {
        return Err(GameError::InvalidInput("score must be non-negative".to_string()));
    }
    if !duration_secs.is_finite() || !(0.0..=MAX_GAME_DURATION_SECS).contains(&duration_secs) {
        return Err(GameError::InvalidInput("invalid game duration".to_string()));
    }
    let ratio = game.score_ratio(score);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let experience = game.experience.at(ratio).max(0.0) as u64;
    Ok(GameReward {
        coins: game.coins.at(ratio),
        experience,
        stat_boosts: game.stat_boosts.scaled(ratio),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::catalog::mini_game;

    fn memory() -> &'static MiniGame {
        let Some(game) = mini_game("memory") else {
            panic!("memory missing from catalog");
        };
        game
    }

    #[test]
    fn half_score_pays_midpoint() {
        let Ok(reward) = reward_for(memory(), 500.0, 60.0) else {
            panic!("valid result rejected");
        };
        assert_eq!(reward.coins, 30.0);
        assert_eq!(reward.experience, 15);
        assert!((reward.stat_boosts.happiness - 7.5).abs() < 1e-9);
    }

    #[test]
    fn score_above_target_is_capped() {
        let Ok(reward) = reward_for(memory(), 10_000.0, 60.0) else {
            panic!("valid result rejected");
        };
        assert_eq!(reward.coins, 50.0);
    }

    #[test]
    fn invalid_results_are_rejected() {
        assert!(reward_for(memory(), -1.0, 10.0).is_err());
        assert!(reward_for(memory(), 10.0, 301.0).is_err());
        assert!(reward_for(memory(), 10.0, -1.0).is_err());
        assert!(reward_for(memory(), 10.0, 300.0).is_ok());
    }

    #[test]
    fn progress_tracks_rounds_and_cooldown() {
        let Some(racing) = mini_game("racing") else {
            panic!("racing missing from catalog");
        };
        let now = DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000);
        let mut progress = GameProgress::new(UserId::new(), "racing");
        assert!(progress.cooldown_until(racing).is_none());

        let reward = GameReward {
            coins: 40.0,
            experience: 20,
            stat_boosts: StatDelta::default(),
        };
        progress.record(900.0, &reward, now);
        progress.record(300.0, &reward, now);
        assert_eq!(progress.times_played, 2);
        assert_eq!(progress.high_score, 900.0);
        assert_eq!(progress.total_coins_earned, 80.0);
        assert_eq!(progress.cooldown_until(racing), Some(now + Duration::minutes(10)));
        assert!(progress.cooldown_until(memory()).is_none());
    }
}
