//! DTOs for coin balances, streak rewards and daily tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::round_coins;
use crate::domain::daily_task::{DailyTask, DailyTaskSet};
use crate::service::account_service::DailyReward;
use crate::service::daily_task_service::TaskProgressOutcome;

/// Response for `GET /api/coins/balance`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Settled balance.
    pub coins: f64,
}

/// Response for `POST /api/coins/collect-offline`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectOfflineResponse {
    /// Coins credited for banked offline time.
    pub earned: f64,
    /// Balance afterwards.
    pub coins: f64,
}

/// Response for `POST /api/coins/daily-streak`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyStreakResponse {
    /// Coins credited.
    pub bonus: f64,
    /// Consecutive claim days including today.
    pub streak: u32,
    /// Balance afterwards.
    pub coins: f64,
}

impl From<&DailyReward> for DailyStreakResponse {
    fn from(reward: &DailyReward) -> Self {
        Self {
            bonus: round_coins(reward.bonus),
            streak: reward.streak,
            coins: round_coins(reward.coins),
        }
    }
}

/// One daily task.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTaskDto {
    /// `feed`, `play` or `minigame`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Count needed to complete.
    pub requirement: u32,
    /// Count so far.
    pub progress: u32,
    /// Whether the requirement was met.
    pub completed: bool,
    /// Coins paid on completion.
    pub reward_coins: f64,
    /// Experience listed for completion.
    pub reward_experience: u64,
    /// Whether the reward was paid.
    pub reward_claimed: bool,
}

impl From<&DailyTask> for DailyTaskDto {
    fn from(task: &DailyTask) -> Self {
        Self {
            kind: task.kind.as_str().to_string(),
            requirement: task.requirement,
            progress: task.progress,
            completed: task.completed,
            reward_coins: task.reward.coins,
            reward_experience: task.reward.experience,
            reward_claimed: task.reward_claimed,
        }
    }
}

/// A user's task list for one UTC day.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTaskSetDto {
    /// Set id, used in progress updates.
    pub id: Uuid,
    /// UTC day.
    pub date: NaiveDate,
    /// Tasks in fixed order.
    pub tasks: Vec<DailyTaskDto>,
    /// Reward multiplier.
    pub streak_bonus: f64,
    /// Whether the multiplier was claimed today.
    pub streak_bonus_claimed: bool,
}

impl From<&DailyTaskSet> for DailyTaskSetDto {
    fn from(set: &DailyTaskSet) -> Self {
        Self {
            id: set.id.into(),
            date: set.date,
            tasks: set.tasks.iter().map(DailyTaskDto::from).collect(),
            streak_bonus: set.streak_bonus,
            streak_bonus_claimed: set.streak_bonus_claimed,
        }
    }
}

/// Response wrapping a daily task set.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTaskResponse {
    /// The set.
    pub daily_task: DailyTaskSetDto,
}

impl From<&DailyTaskSet> for DailyTaskResponse {
    fn from(set: &DailyTaskSet) -> Self {
        Self {
            daily_task: DailyTaskSetDto::from(set),
        }
    }
}

/// Request body for `PATCH /api/daily-tasks/{id}/progress`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgressRequest {
    /// Position in the task list.
    pub task_index: usize,
    /// New absolute progress; clamped to `[0, requirement]`.
    pub progress: i64,
}

/// Response for `PATCH /api/daily-tasks/{id}/progress`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgressResponse {
    /// The updated set.
    pub daily_task: DailyTaskSetDto,
    /// Coins credited by this update.
    pub coins_earned: f64,
    /// Balance afterwards.
    pub coins: f64,
}

impl From<&TaskProgressOutcome> for TaskProgressResponse {
    fn from(outcome: &TaskProgressOutcome) -> Self {
        Self {
            daily_task: DailyTaskSetDto::from(&outcome.tasks),
            coins_earned: round_coins(outcome.coins_earned),
            coins: round_coins(outcome.coins),
        }
    }
}
