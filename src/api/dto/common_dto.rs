//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::inventory::{Inventory, ItemStack};

/// One inventory line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemStackDto {
    /// Shop item id.
    pub item_id: String,
    /// Units held.
    pub quantity: u32,
}

impl From<&ItemStack> for ItemStackDto {
    fn from(stack: &ItemStack) -> Self {
        Self {
            item_id: stack.item_id.clone(),
            quantity: stack.quantity,
        }
    }
}

/// Converts an inventory into its wire form.
#[must_use]
pub fn inventory_dto(inventory: &Inventory) -> Vec<ItemStackDto> {
    inventory.stacks().iter().map(ItemStackDto::from).collect()
}

/// Rounds a coin amount to cents.
#[must_use]
pub fn round_coins(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds a stat for display.
#[must_use]
pub fn round_stat(value: f64) -> f64 {
    value.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coins_round_to_cents() {
        assert_eq!(round_coins(10.456), 10.46);
        assert_eq!(round_coins(0.004), 0.0);
    }

    #[test]
    fn stats_round_to_whole_numbers() {
        assert_eq!(round_stat(99.5), 100.0);
        assert_eq!(round_stat(42.49), 42.0);
    }
}
