//! DTOs for the shop.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::round_coins;
use super::pet_dto::PetDto;
use crate::domain::catalog::ShopItem;
use crate::service::shop_service::PurchaseOutcome;

/// Stat and health changes an item applies.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemEffectsDto {
    /// Hunger change.
    pub hunger: f64,
    /// Happiness change.
    pub happiness: f64,
    /// Energy change.
    pub energy: f64,
    /// Playfulness change.
    pub playfulness: f64,
    /// Health change.
    pub health: f64,
}

/// A shop listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShopItemDto {
    /// Item id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// `food`, `toy`, `accessory` or `medicine`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Price per unit in coins.
    pub price: f64,
    /// Effects when fed or used.
    pub effects: ItemEffectsDto,
    /// Client icon name.
    pub icon: String,
    /// Rarity tier.
    pub rarity: String,
}

impl From<&ShopItem> for ShopItemDto {
    fn from(item: &ShopItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.to_string(),
            description: item.description.to_string(),
            kind: item.kind.as_str().to_string(),
            price: item.price,
            effects: ItemEffectsDto {
                hunger: item.effects.stats.hunger,
                happiness: item.effects.stats.happiness,
                energy: item.effects.stats.energy,
                playfulness: item.effects.stats.playfulness,
                health: item.effects.health,
            },
            icon: item.icon.to_string(),
            rarity: item.rarity.to_string(),
        }
    }
}

/// Response for `GET /api/shop/items`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShopItemListResponse {
    /// Everything for sale.
    pub items: Vec<ShopItemDto>,
}

fn default_quantity() -> u32 {
    1
}

/// Request body for `POST /api/shop/purchase`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Item to buy.
    pub item_id: String,
    /// Receiving pet; the user's own inventory when absent.
    #[serde(default)]
    pub pet_id: Option<Uuid>,
    /// Units, 1–99. Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Response for `POST /api/shop/purchase`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    /// Item bought.
    pub item: ShopItemDto,
    /// Units bought.
    pub quantity: u32,
    /// Coins spent.
    pub total_cost: f64,
    /// Balance afterwards.
    pub coins: f64,
    /// The receiving pet, when one was named.
    pub pet: Option<PetDto>,
}

impl From<&PurchaseOutcome> for PurchaseResponse {
    fn from(outcome: &PurchaseOutcome) -> Self {
        Self {
            item: ShopItemDto::from(outcome.item),
            quantity: outcome.quantity,
            total_cost: round_coins(outcome.cost),
            coins: round_coins(outcome.coins),
            pet: outcome.pet.as_ref().map(PetDto::from),
        }
    }
}
