//! DTOs for pets, pet actions and breeding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::{ItemStackDto, inventory_dto, round_stat};
use crate::domain::Pet;
use crate::domain::catalog::PetType;
use crate::domain::leveling::{LevelUp, threshold_for};

/// Current stats, rounded for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetStatsDto {
    /// Satiation.
    pub hunger: f64,
    /// Mood.
    pub happiness: f64,
    /// Stamina.
    pub energy: f64,
    /// Eagerness to play.
    pub playfulness: f64,
}

/// Inherited appearance.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneticsDto {
    /// Rarity tier.
    pub rarity: String,
    /// Body color.
    pub color: String,
    /// Coat pattern.
    pub pattern: String,
    /// Up to three traits.
    pub traits: Vec<String>,
}

/// Position in the play area, both axes in `[0, 100]`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PositionDto {
    /// Horizontal.
    pub x: f64,
    /// Vertical.
    pub y: f64,
}

/// Public view of a pet with decay already applied.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetDto {
    /// Pet id.
    pub id: Uuid,
    /// Owner id.
    pub owner_id: Uuid,
    /// Display name.
    pub name: String,
    /// Catalog type id.
    pub pet_type: String,
    /// Current stats.
    pub stats: PetStatsDto,
    /// Health.
    pub health: f64,
    /// Level, starting at 1.
    pub level: u32,
    /// Experience toward the next level.
    pub experience: u64,
    /// Experience still missing for the next level.
    pub experience_to_next_level: u64,
    /// Derived mood label.
    pub emotion: String,
    /// Genetics.
    pub genetics: GeneticsDto,
    /// Items held by this pet.
    pub inventory: Vec<ItemStackDto>,
    /// Position.
    pub position: PositionDto,
    /// Parent ids (empty for adopted pets).
    pub parents: Vec<Uuid>,
    /// Offspring ids.
    pub children: Vec<Uuid>,
    /// End of the breeding cooldown, if one is running.
    pub breeding_cooldown_until: Option<DateTime<Utc>>,
    /// Last stat-changing interaction.
    pub last_interaction: DateTime<Utc>,
    /// Adoption or birth time.
    pub created_at: DateTime<Utc>,
}

impl From<&Pet> for PetDto {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id.into(),
            owner_id: pet.owner.into(),
            name: pet.name.clone(),
            pet_type: pet.pet_type.clone(),
            stats: PetStatsDto {
                hunger: round_stat(pet.stats.hunger),
                happiness: round_stat(pet.stats.happiness),
                energy: round_stat(pet.stats.energy),
                playfulness: round_stat(pet.stats.playfulness),
            },
            health: round_stat(pet.health),
            level: pet.progression.level,
            experience: pet.progression.experience,
            experience_to_next_level: threshold_for(pet.progression.level)
                .saturating_sub(pet.progression.experience),
            emotion: pet.stats.emotion().as_str().to_string(),
            genetics: GeneticsDto {
                rarity: pet.genetics.rarity.to_string(),
                color: pet.genetics.color.clone(),
                pattern: pet.genetics.pattern.clone(),
                traits: pet.genetics.traits.clone(),
            },
            inventory: inventory_dto(&pet.inventory),
            position: PositionDto {
                x: pet.position.x,
                y: pet.position.y,
            },
            parents: pet.parents.iter().copied().map(Uuid::from).collect(),
            children: pet.children.iter().copied().map(Uuid::from).collect(),
            breeding_cooldown_until: pet.breeding_cooldown_until,
            last_interaction: pet.last_interaction,
            created_at: pet.created_at,
        }
    }
}

/// A purchasable pet type.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetTypeDto {
    /// Type id, used as `petTypeId` when adopting.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Base rarity.
    pub rarity: String,
    /// Adoption price in coins.
    pub price: f64,
    /// Minutes between breedings.
    pub breeding_cooldown_minutes: i64,
}

impl From<&PetType> for PetTypeDto {
    fn from(kind: &PetType) -> Self {
        Self {
            id: kind.id.to_string(),
            name: kind.name.to_string(),
            description: kind.description.to_string(),
            rarity: kind.rarity.to_string(),
            price: kind.price,
            breeding_cooldown_minutes: kind.breeding_cooldown_mins,
        }
    }
}

/// Request body for `POST /api/pets`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdoptPetRequest {
    /// Name, 1–30 characters.
    pub name: String,
    /// Catalog type id.
    pub pet_type_id: String,
}

/// Request body for `PATCH /api/pets/{id}/name`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RenamePetRequest {
    /// New name, 1–30 characters.
    pub name: String,
}

/// Request body for `POST /api/pets/{id}/feed`. The body may be omitted.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    /// Food item from the pet's inventory; plain feeding when absent.
    #[serde(default)]
    pub food_item_id: Option<String>,
}

/// Request body for `POST /api/pets/{id}/use-item`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UseItemRequest {
    /// Item from the pet's inventory.
    pub item_id: String,
}

/// Request body for `POST /api/pets/{id}/give-item`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiveItemRequest {
    /// Item from the caller's own inventory.
    pub item_id: String,
    /// Units to hand over, 1 to 99.
    #[serde(default = "default_give_quantity")]
    pub quantity: u32,
}

fn default_give_quantity() -> u32 {
    1
}

/// Request body for `POST /api/pets/breed`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreedRequest {
    /// First parent.
    pub pet1_id: Uuid,
    /// Second parent.
    pub pet2_id: Uuid,
}

/// Response wrapping a single pet.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetResponse {
    /// The pet.
    pub pet: PetDto,
}

impl From<&Pet> for PetResponse {
    fn from(pet: &Pet) -> Self {
        Self {
            pet: PetDto::from(pet),
        }
    }
}

/// Response wrapping a list of pets.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetListResponse {
    /// The pets.
    pub pets: Vec<PetDto>,
}

impl From<&[Pet]> for PetListResponse {
    fn from(pets: &[Pet]) -> Self {
        Self {
            pets: pets.iter().map(PetDto::from).collect(),
        }
    }
}

/// Response for `GET /api/pets/types`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetTypeListResponse {
    /// Every adoptable type.
    pub pet_types: Vec<PetTypeDto>,
}

/// Response for the discrete pet actions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    /// The pet after the action.
    pub pet: PetDto,
    /// `true` if at least one level was gained.
    pub level_up: bool,
    /// Number of levels gained.
    pub levels_gained: u32,
}

impl ActionResponse {
    /// Builds the response from a pet and its level outcome.
    #[must_use]
    pub fn new(pet: &Pet, level_up: LevelUp) -> Self {
        Self {
            pet: PetDto::from(pet),
            level_up: level_up.leveled_up(),
            levels_gained: level_up.levels_gained,
        }
    }
}
