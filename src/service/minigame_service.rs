//! Minigame service: sessions, rewards, and progress.

use chrono::{DateTime, Utc};

use crate::domain::catalog::{MAX_GAME_DURATION_SECS, MINI_GAMES, MiniGame, mini_game};
use crate::domain::leveling::LevelUp;
use crate::domain::minigame::{GameKey, GameProgress, GameSession, reward_for};
use crate::domain::stats::clamp_stat;
use crate::domain::{GameEvent, Pet, PetId, UserId};
use crate::error::GameError;

use super::GameContext;

/// A started round.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    /// The game.
    pub game: &'static MiniGame,
    /// The pet after the energy cost.
    pub pet: Pet,
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Longest accepted duration in seconds.
    pub max_duration_secs: f64,
}

/// A finished round.
#[derive(Debug, Clone)]
pub struct FinishOutcome {
    /// Coins credited.
    pub coins_earned: f64,
    /// Experience credited to the pet.
    pub experience: u64,
    /// Level outcome.
    pub level_up: LevelUp,
    /// The pet afterwards.
    pub pet: Pet,
    /// Balance afterwards.
    pub coins: f64,
    /// Updated progress row.
    pub progress: GameProgress,
}

/// Minigame orchestration.
#[derive(Debug, Clone)]
pub struct MinigameService {
    ctx: GameContext,
}

impl MinigameService {
    /// Creates a new `MinigameService`.
    #[must_use]
    pub fn new(ctx: GameContext) -> Self {
        Self { ctx }
    }

    /// The minigame catalog.
    #[must_use]
    pub fn games(&self) -> &'static [MiniGame] {
        MINI_GAMES
    }

    /// The caller's progress rows.
    pub async fn progress(&self, user_id: UserId) -> Vec<GameProgress> {
        self.ctx.store.progress_of(user_id).await
    }

    /// Starts a round: checks level, cooldown and energy, then charges
    /// the energy cost and opens a session.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] for unknown games or unowned pets,
    /// [`GameError::InsufficientResource`] for a low level, an active
    /// cooldown, or too little energy.
    pub async fn start(
        &self,
        user_id: UserId,
        game_id: &str,
        pet_id: PetId,
    ) -> Result<StartOutcome, GameError> {
        let game = mini_game(game_id).ok_or_else(|| GameError::not_found("game", game_id))?;
        let pet_lock = self.ctx.store.owned_pet(user_id, pet_id).await?;
        let key: GameKey = (user_id, game.id.to_string());

        let mut pet = pet_lock.write().await;
        let now = self.ctx.now();
        pet.refresh(now);

        if pet.progression.level < game.required_level {
            return Err(GameError::InsufficientResource(format!(
                "{} requires pet level {}",
                game.name, game.required_level
            )));
        }
        if let Some(until) = self
            .ctx
            .store
            .progress(&key)
            .await
            .and_then(|p| p.cooldown_until(game))
            && now < until
        {
            return Err(GameError::InsufficientResource(format!(
                "{} is on cooldown until {}",
                game.name,
                until.to_rfc3339()
            )));
        }
        if pet.stats.energy < game.energy_cost {
            return Err(GameError::InsufficientResource(
                "pet does not have enough energy".to_string(),
            ));
        }

        pet.stats.energy = clamp_stat(pet.stats.energy - game.energy_cost);
        let snapshot = pet.clone();
        self.ctx
            .store
            .open_session(GameSession {
                user_id,
                game_id: game.id.to_string(),
                pet_id,
                started_at: now,
            })
            .await;
        drop(pet);

        self.ctx.publish_pet_updated(&snapshot, "minigame-start", now);
        tracing::debug!(%user_id, game = game.id, %pet_id, "minigame started");
        Ok(StartOutcome {
            game,
            pet: snapshot,
            started_at: now,
            max_duration_secs: MAX_GAME_DURATION_SECS,
        })
    }

    /// Finishes the open round and pays its rewards.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for a bad score or duration,
    /// [`GameError::NotFound`] for unknown games or unowned pets,
    /// [`GameError::Conflict`] if no round with this pet is open.
    pub async fn finish(
        &self,
        user_id: UserId,
        game_id: &str,
        pet_id: PetId,
        score: f64,
        duration_secs: f64,
    ) -> Result<FinishOutcome, GameError> {
        let game = mini_game(game_id).ok_or_else(|| GameError::not_found("game", game_id))?;
        let reward = reward_for(game, score, duration_secs)?;
        let user_lock = self.ctx.store.user(user_id).await?;
        let pet_lock = self.ctx.store.owned_pet(user_id, pet_id).await?;
        let key: GameKey = (user_id, game.id.to_string());

        let mut user = user_lock.write().await;
        let mut pet = pet_lock.write().await;
        let session = self.ctx.store.take_session(&key).await.ok_or_else(|| {
            GameError::Conflict(format!("no active {} session", game.name))
        })?;
        if session.pet_id != pet_id {
            self.ctx.store.open_session(session).await;
            return Err(GameError::Conflict(format!(
                "the active {} session belongs to another pet",
                game.name
            )));
        }

        let now = self.ctx.now();
        self.ctx.settle(&mut user, now);
        user.ledger.credit(reward.coins);
        pet.refresh(now);
        pet.stats.apply(&reward.stat_boosts);
        let level_up = pet.progression.award(reward.experience);
        let progress = self
            .ctx
            .store
            .update_progress(key, |row| row.record(score, &reward, now))
            .await;
        let user_snapshot = user.clone();
        let pet_snapshot = pet.clone();
        drop(pet);
        drop(user);

        self.ctx.publish_coins(&user_snapshot, now);
        self.ctx.publish_level_up(&pet_snapshot, level_up, now);
        let _ = self.ctx.event_bus.publish(GameEvent::GameFinished {
            user_id,
            pet_id,
            game_id: game.id.to_string(),
            score,
            coins_earned: reward.coins,
            timestamp: now,
        });
        tracing::info!(%user_id, game = game.id, score, coins = reward.coins, "minigame finished");
        Ok(FinishOutcome {
            coins_earned: reward.coins,
            experience: reward.experience,
            level_up,
            pet: pet_snapshot,
            coins: user_snapshot.ledger.coins,
            progress,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::domain::ManualClock;
    use crate::service::AccountService;
    use crate::service::test_support::{context, signer};

    async fn setup() -> (MinigameService, Arc<ManualClock>, UserId, PetId) {
        let (ctx, clock) = context();
        let accounts = AccountService::new(ctx.clone(), signer(), 100.0);
        let Ok(session) = accounts.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let Some(pet) = session.user.active_pet else {
            panic!("starter pet missing");
        };
        (MinigameService::new(ctx), clock, session.user.id, pet)
    }

    #[tokio::test]
    async fn full_round_pays_rewards_and_records_progress() {
        let (svc, _, user, pet) = setup().await;
        let Ok(started) = svc.start(user, "memory", pet).await else {
            panic!("start failed");
        };
        assert_eq!(started.pet.stats.energy, 90.0);

        let Ok(done) = svc.finish(user, "memory", pet, 1000.0, 42.0).await else {
            panic!("finish failed");
        };
        assert_eq!(done.coins_earned, 50.0);
        assert_eq!(done.coins, 150.0);
        assert_eq!(done.experience, 25);
        assert_eq!(done.pet.progression.experience, 25);
        assert_eq!(done.progress.times_played, 1);
        assert_eq!(svc.progress(user).await.len(), 1);
    }

    #[tokio::test]
    async fn finish_requires_open_session() {
        let (svc, _, user, pet) = setup().await;
        let Err(GameError::Conflict(_)) = svc.finish(user, "memory", pet, 10.0, 10.0).await else {
            panic!("expected conflict");
        };
        let _ = svc.start(user, "memory", pet).await;
        assert!(svc.finish(user, "memory", pet, 10.0, 10.0).await.is_ok());
        assert!(svc.finish(user, "memory", pet, 10.0, 10.0).await.is_err());
    }

    #[tokio::test]
    async fn invalid_duration_keeps_session_open() {
        let (svc, _, user, pet) = setup().await;
        let _ = svc.start(user, "memory", pet).await;
        let Err(GameError::InvalidInput(_)) = svc.finish(user, "memory", pet, 10.0, 301.0).await
        else {
            panic!("expected invalid duration");
        };
        assert!(svc.finish(user, "memory", pet, 10.0, 300.0).await.is_ok());
    }

    #[tokio::test]
    async fn level_requirement_and_energy_are_enforced() {
        let (svc, _, user, pet) = setup().await;
        let Err(GameError::InsufficientResource(_)) = svc.start(user, "racing", pet).await else {
            panic!("expected level requirement");
        };
        if let Ok(lock) = svc.ctx.store.owned_pet(user, pet).await {
            lock.write().await.stats.energy = 5.0;
        }
        let Err(GameError::InsufficientResource(_)) = svc.start(user, "memory", pet).await else {
            panic!("expected energy requirement");
        };
    }

    #[tokio::test]
    async fn cooldown_blocks_restart() {
        let (svc, clock, user, pet) = setup().await;
        let _ = svc.start(user, "training", pet).await;
        let _ = svc.finish(user, "training", pet, 400.0, 30.0).await;
        let Err(GameError::InsufficientResource(_)) = svc.start(user, "training", pet).await else {
            panic!("expected cooldown");
        };
        clock.advance(Duration::minutes(15));
        assert!(svc.start(user, "training", pet).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let (svc, _, user, pet) = setup().await;
        let Err(GameError::NotFound { .. }) = svc.start(user, "chess", pet).await else {
            panic!("expected not found");
        };
    }
}
