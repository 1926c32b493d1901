//! Per-day task lists with coin rewards and a streak multiplier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{DailyTaskId, UserId};
use super::registry::Entity;
use crate::error::GameError;

/// What a task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Feed a pet.
    Feed,
    /// Play with a pet.
    Play,
    /// Finish a minigame.
    Minigame,
}

impl TaskKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Play => "play",
            Self::Minigame => "minigame",
        }
    }
}

/// Reward paid once when a task completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskReward {
    /// Base coins, multiplied by the set's streak bonus.
    pub coins: f64,
    /// Informational experience value.
    pub experience: u64,
}

/// One task of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    /// Counted action.
    pub kind: TaskKind,
    /// Count needed to complete.
    pub requirement: u32,
    /// Current count, at most `requirement`.
    pub progress: u32,
    /// Whether `progress` reached `requirement`.
    pub completed: bool,
    /// Reward on completion.
    pub reward: TaskReward,
    /// Whether the reward was paid.
    pub reward_claimed: bool,
}

impl DailyTask {
    const fn new(kind: TaskKind, requirement: u32, coins: f64, experience: u64) -> Self {
        Self {
            kind,
            requirement,
            progress: 0,
            completed: false,
            reward: TaskReward { coins, experience },
            reward_claimed: false,
        }
    }
}

/// A user's tasks for one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTaskSet {
    /// Identifier.
    pub id: DailyTaskId,
    /// Owner.
    pub user_id: UserId,
    /// UTC day.
    pub date: NaiveDate,
    /// The day's tasks.
    pub tasks: Vec<DailyTask>,
    /// Multiplier applied to task coin rewards.
    pub streak_bonus: f64,
    /// Whether today's streak bonus was claimed.
    pub streak_bonus_claimed: bool,
}

impl Entity for DailyTaskSet {
    type Id = DailyTaskId;
    const KIND: &'static str = "daily task";

    fn id(&self) -> DailyTaskId {
        self.id
    }
}

impl DailyTaskSet {
    /// The standard task list for `date`.
    #[must_use]
    pub fn generate(user_id: UserId, date: NaiveDate) -> Self {
        Self {
            id: DailyTaskId::new(),
            user_id,
            date,
            tasks: vec![
                DailyTask::new(TaskKind::Feed, 3, 50.0, 20),
                DailyTask::new(TaskKind::Play, 2, 30.0, 15),
                DailyTask::new(TaskKind::Minigame, 1, 100.0, 50),
            ],
            streak_bonus: 1.0,
            streak_bonus_claimed: false,
        }
    }

    /// Whether every task is complete.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.tasks.iter().all(|t| t.completed)
    }

    /// Sets a task's progress and returns the coins to credit.
    ///
    /// Progress is clamped to `[0, requirement]`. The reward is paid the
    /// first time the task is seen complete.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if `index` is out of range.
    pub fn set_progress(&mut self, index: usize, progress: i64) -> Result<f64, GameError> {
        let bonus = self.streak_bonus;
        let task = self
            .tasks
            .get_mut(index)
            .ok_or_else(|| GameError::not_found("task", index))?;
        let clamped = progress.clamp(0, i64::from(task.requirement));
        task.progress = u32::try_from(clamped).unwrap_or(task.requirement);
        task.completed = task.progress >= task.requirement;
        if task.completed && !task.reward_claimed {
            task.reward_claimed = true;
            return Ok(task.reward.coins * bonus);
        }
        Ok(0.0)
    }

    /// Claims today's streak multiplier from yesterday's set.
    ///
    /// # Errors
    ///
    /// [`GameError::Conflict`] if already claimed.
    pub fn claim_streak(&mut self, yesterday: Option<&Self>) -> Result<f64, GameError> {
        if self.streak_bonus_claimed {
            return Err(GameError::Conflict(
                "streak bonus already claimed".to_string(),
            ));
        }
        self.streak_bonus = match yesterday {
            Some(prev) if prev.completed() => prev.streak_bonus + 0.1,
            _ => 1.0,
        };
        self.streak_bonus_claimed = true;
        Ok(self.streak_bonus)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default()
    }

    #[test]
    fn generated_tasks() {
        let set = DailyTaskSet::generate(UserId::new(), day());
        let reqs: Vec<(TaskKind, u32)> = set.tasks.iter().map(|t| (t.kind, t.requirement)).collect();
        assert_eq!(
            reqs,
            vec![(TaskKind::Feed, 3), (TaskKind::Play, 2), (TaskKind::Minigame, 1)]
        );
        assert!(!set.completed());
    }

    #[test]
    fn progress_is_clamped_and_reward_paid_once() {
        let mut set = DailyTaskSet::generate(UserId::new(), day());
        assert_eq!(set.set_progress(0, 2).ok(), Some(0.0));
        assert_eq!(set.set_progress(0, 10).ok(), Some(50.0));
        assert_eq!(set.tasks.first().map(|t| t.progress), Some(3));
        assert_eq!(set.set_progress(0, 3).ok(), Some(0.0));
        assert_eq!(set.set_progress(1, -4).ok(), Some(0.0));
        assert_eq!(set.tasks.get(1).map(|t| t.progress), Some(0));
    }

    #[test]
    fn reward_uses_streak_bonus() {
        let mut set = DailyTaskSet::generate(UserId::new(), day());
        set.streak_bonus = 1.5;
        assert_eq!(set.set_progress(2, 1).ok(), Some(150.0));
    }

    #[test]
    fn bad_index_is_not_found() {
        let mut set = DailyTaskSet::generate(UserId::new(), day());
        let Err(GameError::NotFound { .. }) = set.set_progress(3, 1) else {
            panic!("expected not found");
        };
    }

    #[test]
    fn streak_claim_builds_on_completed_yesterday() {
        let user = UserId::new();
        let mut yesterday = DailyTaskSet::generate(user, day());
        yesterday.streak_bonus = 1.2;
        for i in 0..3 {
            let _ = yesterday.set_progress(i, 5);
        }
        let mut today = DailyTaskSet::generate(user, day().succ_opt().unwrap_or_default());
        let Ok(bonus) = today.claim_streak(Some(&yesterday)) else {
            panic!("claim failed");
        };
        assert!((bonus - 1.3).abs() < 1e-9);
        let Err(GameError::Conflict(_)) = today.claim_streak(Some(&yesterday)) else {
            panic!("expected conflict");
        };
    }

    #[test]
    fn streak_claim_resets_without_completed_yesterday() {
        let user = UserId::new();
        let yesterday = DailyTaskSet::generate(user, day());
        let mut today = DailyTaskSet::generate(user, day());
        assert_eq!(today.claim_streak(Some(&yesterday)).ok(), Some(1.0));
        let mut fresh = DailyTaskSet::generate(user, day());
        assert_eq!(fresh.claim_streak(None).ok(), Some(1.0));
    }
}
