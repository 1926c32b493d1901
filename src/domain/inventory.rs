//! Item stacks held by users and pets.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// A quantity of one shop item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Shop item id.
    pub item_id: String,
    /// Units held, always positive.
    pub quantity: u32,
}

/// Ordered list of item stacks. Empty stacks are removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    /// Adds `quantity` units of `item_id`.
    pub fn add(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.stacks.iter_mut().find(|s| s.item_id == item_id) {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(quantity),
            None => self.stacks.push(ItemStack {
                item_id: item_id.to_string(),
                quantity,
            }),
        }
    }

    /// Units of `item_id` held.
    #[must_use]
    pub fn quantity(&self, item_id: &str) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.item_id == item_id)
            .map_or(0, |s| s.quantity)
    }

    /// Removes one unit of `item_id`.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the item is not held.
    pub fn take_one(&mut self, item_id: &str) -> Result<(), GameError> {
        self.take(item_id, 1)
    }

    /// Removes `quantity` units of `item_id`, all or nothing.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the item is not held,
    /// [`GameError::InsufficientResource`] if fewer units are held.
    pub fn take(&mut self, item_id: &str, quantity: u32) -> Result<(), GameError> {
        let pos = self
            .stacks
            .iter()
            .position(|s| s.item_id == item_id && s.quantity > 0)
            .ok_or_else(|| GameError::not_found("inventory item", item_id))?;
        if let Some(stack) = self.stacks.get_mut(pos) {
            if stack.quantity < quantity {
                return Err(GameError::InsufficientResource(format!(
                    "only {} of {item_id} held",
                    stack.quantity
                )));
            }
            stack.quantity -= quantity;
            if stack.quantity == 0 {
                self.stacks.remove(pos);
            }
        }
        Ok(())
    }

    /// All stacks in insertion order.
    #[must_use]
    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }
}
