//! DTOs for minigames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::round_coins;
use super::pet_dto::PetDto;
use crate::domain::catalog::MiniGame;
use crate::domain::minigame::GameProgress;
use crate::service::minigame_service::{FinishOutcome, StartOutcome};

/// A reward band, paid in proportion to the score ratio.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RewardRangeDto {
    /// Paid at score 0.
    pub min: f64,
    /// Paid at or above the target score.
    pub max: f64,
}

/// A minigame listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameDto {
    /// Game id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Difficulty label.
    pub difficulty: String,
    /// Energy charged at start.
    pub energy_cost: f64,
    /// Minutes between rounds.
    pub cooldown_minutes: i64,
    /// Minimum pet level.
    pub required_level: u32,
    /// Score that earns the full reward.
    pub target_score: f64,
    /// Coin reward band.
    pub coin_reward: RewardRangeDto,
    /// Experience reward band.
    pub experience_reward: RewardRangeDto,
}

impl From<&MiniGame> for MiniGameDto {
    fn from(game: &MiniGame) -> Self {
        Self {
            id: game.id.to_string(),
            name: game.name.to_string(),
            description: game.description.to_string(),
            difficulty: game.difficulty.to_string(),
            energy_cost: game.energy_cost,
            cooldown_minutes: game.cooldown_mins,
            required_level: game.required_level,
            target_score: game.target_score,
            coin_reward: RewardRangeDto {
                min: game.coins.min,
                max: game.coins.max,
            },
            experience_reward: RewardRangeDto {
                min: game.experience.min,
                max: game.experience.max,
            },
        }
    }
}

/// Response for `GET /api/minigames`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MiniGameListResponse {
    /// The catalog.
    pub games: Vec<MiniGameDto>,
}

/// Per-game statistics of the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameProgressDto {
    /// Game id.
    pub game_id: String,
    /// Finished rounds.
    pub times_played: u32,
    /// Best score.
    pub high_score: f64,
    /// Coins earned across rounds.
    pub total_coins_earned: f64,
    /// Experience earned across rounds.
    pub total_experience_gained: u64,
    /// End of the last round.
    pub last_played: Option<DateTime<Utc>>,
}

impl From<&GameProgress> for GameProgressDto {
    fn from(progress: &GameProgress) -> Self {
        Self {
            game_id: progress.game_id.clone(),
            times_played: progress.times_played,
            high_score: progress.high_score,
            total_coins_earned: round_coins(progress.total_coins_earned),
            total_experience_gained: progress.total_experience_gained,
            last_played: progress.last_played,
        }
    }
}

/// Response for `GET /api/minigames/progress`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameProgressListResponse {
    /// One row per game played.
    pub progress: Vec<GameProgressDto>,
}

/// Request body for `POST /api/minigames/start`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    /// Game to play.
    pub game_id: String,
    /// Pet that plays.
    pub pet_id: Uuid,
}

/// The round opened by a start request.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameSessionDto {
    /// Session start.
    pub start_time: DateTime<Utc>,
    /// Longest accepted duration in seconds.
    pub max_duration: f64,
}

/// Response for `POST /api/minigames/start`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    /// The game.
    pub game: MiniGameDto,
    /// The pet after the energy cost.
    pub pet: PetDto,
    /// The open round.
    pub game_session: GameSessionDto,
}

impl From<&StartOutcome> for StartGameResponse {
    fn from(outcome: &StartOutcome) -> Self {
        Self {
            game: MiniGameDto::from(outcome.game),
            pet: PetDto::from(&outcome.pet),
            game_session: GameSessionDto {
                start_time: outcome.started_at,
                max_duration: outcome.max_duration_secs,
            },
        }
    }
}

/// Request body for `POST /api/minigames/finish`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinishGameRequest {
    /// Game played.
    pub game_id: String,
    /// Pet that played.
    pub pet_id: Uuid,
    /// Non-negative score.
    pub score: f64,
    /// Round length in seconds, at most 300.
    pub duration: f64,
}

/// Rewards paid for a round.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameRewardsDto {
    /// Coins credited.
    pub coins: f64,
    /// Experience credited to the pet.
    pub experience: u64,
}

/// Response for `POST /api/minigames/finish`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinishGameResponse {
    /// Rewards paid.
    pub rewards: GameRewardsDto,
    /// `true` if the pet gained a level.
    pub level_up: bool,
    /// Number of levels gained.
    pub levels_gained: u32,
    /// The pet afterwards.
    pub pet: PetDto,
    /// Balance afterwards.
    pub coins: f64,
    /// Updated statistics for this game.
    pub progress: GameProgressDto,
}

impl From<&FinishOutcome> for FinishGameResponse {
    fn from(outcome: &FinishOutcome) -> Self {
        Self {
            rewards: GameRewardsDto {
                coins: round_coins(outcome.coins_earned),
                experience: outcome.experience,
            },
            level_up: outcome.level_up.leveled_up(),
            levels_gained: outcome.level_up.levels_gained,
            pet: PetDto::from(&outcome.pet),
            coins: round_coins(outcome.coins),
            progress: GameProgressDto::from(&outcome.progress),
        }
    }
}
