//! Daily task service: today's list, progress rewards, streak multiplier.

use chrono::Duration;

use crate::domain::daily_task::DailyTaskSet;
use crate::domain::{DailyTaskId, UserId};
use crate::error::GameError;

use super::GameContext;

/// Result of a progress update.
#[derive(Debug, Clone)]
pub struct TaskProgressOutcome {
    /// The updated set.
    pub tasks: DailyTaskSet,
    /// Coins credited by this update.
    pub coins_earned: f64,
    /// Balance afterwards.
    pub coins: f64,
}

/// Daily task orchestration.
#[derive(Debug, Clone)]
pub struct DailyTaskService {
    ctx: GameContext,
}

impl DailyTaskService {
    /// Creates a new `DailyTaskService`.
    #[must_use]
    pub fn new(ctx: GameContext) -> Self {
        Self { ctx }
    }

    /// Today's tasks, generated on first access.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn today(&self, user_id: UserId) -> Result<DailyTaskSet, GameError> {
        let today = self.ctx.now().date_naive();
        let shared = self.ctx.store.daily_tasks_or_create(user_id, today).await?;
        let set = shared.read().await.clone();
        Ok(set)
    }

    /// Sets one task's progress, paying its reward on first completion.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] for an unknown set or task index.
    pub async fn update_progress(
        &self,
        user_id: UserId,
        set_id: DailyTaskId,
        task_index: usize,
        progress: i64,
    ) -> Result<TaskProgressOutcome, GameError> {
        let user_lock = self.ctx.store.user(user_id).await?;
        let set_lock = self.ctx.store.owned_daily_tasks(user_id, set_id).await?;

        let mut user = user_lock.write().await;
        let mut set = set_lock.write().await;
        let coins_earned = set.set_progress(task_index, progress)?;
        let now = self.ctx.now();
        self.ctx.settle(&mut user, now);
        user.ledger.credit(coins_earned);
        let tasks = set.clone();
        let user_snapshot = user.clone();
        drop(set);
        drop(user);

        if coins_earned > 0.0 {
            self.ctx.publish_coins(&user_snapshot, now);
            tracing::info!(%user_id, task_index, coins_earned, "daily task completed");
        }
        Ok(TaskProgressOutcome {
            tasks,
            coins_earned,
            coins: user_snapshot.ledger.coins,
        })
    }

    /// Claims today's streak multiplier.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if today's tasks were never opened,
    /// [`GameError::Conflict`] if the bonus was already claimed.
    pub async fn claim_streak(&self, user_id: UserId) -> Result<DailyTaskSet, GameError> {
        let today = self.ctx.now().date_naive();
        let yesterday = match today.checked_sub_signed(Duration::days(1)) {
            Some(day) => match self.ctx.store.daily_tasks_on(user_id, day).await {
                Some(shared) => Some(shared.read().await.clone()),
                None => None,
            },
            None => None,
        };
        let shared = self
            .ctx
            .store
            .daily_tasks_on(user_id, today)
            .await
            .ok_or_else(|| GameError::not_found("daily tasks", today))?;

        let mut set = shared.write().await;
        let bonus = set.claim_streak(yesterday.as_ref())?;
        tracing::info!(%user_id, bonus, "streak bonus claimed");
        Ok(set.clone())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ManualClock;
    use crate::service::AccountService;
    use crate::service::test_support::{context, signer};

    async fn setup() -> (DailyTaskService, Arc<ManualClock>, UserId) {
        let (ctx, clock) = context();
        let accounts = AccountService::new(ctx.clone(), signer(), 100.0);
        let Ok(session) = accounts.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        (DailyTaskService::new(ctx), clock, session.user.id)
    }

    #[tokio::test]
    async fn today_is_stable_within_a_day() {
        let (svc, _, user) = setup().await;
        let Ok(a) = svc.today(user).await else {
            panic!("today failed");
        };
        let Ok(b) = svc.today(user).await else {
            panic!("today failed");
        };
        assert_eq!(a.id, b.id);
        assert_eq!(a.tasks.len(), 3);
    }

    #[tokio::test]
    async fn completing_a_task_pays_once() {
        let (svc, _, user) = setup().await;
        let Ok(set) = svc.today(user).await else {
            panic!("today failed");
        };
        let Ok(first) = svc.update_progress(user, set.id, 0, 3).await else {
            panic!("update failed");
        };
        assert_eq!(first.coins_earned, 50.0);
        assert_eq!(first.coins, 150.0);
        let Ok(again) = svc.update_progress(user, set.id, 0, 3).await else {
            panic!("update failed");
        };
        assert_eq!(again.coins_earned, 0.0);
        assert_eq!(again.coins, 150.0);
    }

    #[tokio::test]
    async fn other_users_sets_are_hidden() {
        let (svc, _, user) = setup().await;
        let Ok(set) = svc.today(user).await else {
            panic!("today failed");
        };
        let Err(GameError::NotFound { .. }) =
            svc.update_progress(UserId::new(), set.id, 0, 1).await
        else {
            panic!("expected not found");
        };
    }

    #[tokio::test]
    async fn streak_claim_needs_today_and_builds_on_yesterday() {
        let (svc, clock, user) = setup().await;
        let Err(GameError::NotFound { .. }) = svc.claim_streak(user).await else {
            panic!("expected not found");
        };

        let Ok(day_one) = svc.today(user).await else {
            panic!("today failed");
        };
        for index in 0..3 {
            let _ = svc.update_progress(user, day_one.id, index, 10).await;
        }
        let Ok(claimed) = svc.claim_streak(user).await else {
            panic!("claim failed");
        };
        assert_eq!(claimed.streak_bonus, 1.0);
        let Err(GameError::Conflict(_)) = svc.claim_streak(user).await else {
            panic!("expected conflict");
        };

        clock.advance(Duration::days(1));
        let _ = svc.today(user).await;
        let Ok(next) = svc.claim_streak(user).await else {
            panic!("claim failed");
        };
        assert!((next.streak_bonus - 1.1).abs() < 1e-9);
    }
}
