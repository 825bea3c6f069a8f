//! Use consumable use case.
//!
//! Decrements the entry's use counter with a compare-and-swap, initializing
//! it from the item's stack size on first use. An entry whose counter reaches
//! zero is removed.

use std::sync::Arc;

use sprawl_domain::{CharacterId, ConsumeOutcome, InventoryEntryId};

use crate::infrastructure::ports::{CharacterRepo, InventoryRepo, ItemRepo};
use crate::session::Session;

use super::error::InventoryError;

/// Result of consuming one use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeResult {
    /// Uses left on the entry, if it survived
    pub remaining: Option<u32>,
    /// Whether the entry was removed on depletion
    pub removed: bool,
}

/// Use consumable use case.
pub struct UseConsumable {
    characters: Arc<dyn CharacterRepo>,
    items: Arc<dyn ItemRepo>,
    inventory: Arc<dyn InventoryRepo>,
}

impl UseConsumable {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        items: Arc<dyn ItemRepo>,
        inventory: Arc<dyn InventoryRepo>,
    ) -> Self {
        Self {
            characters,
            items,
            inventory,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        character_id: CharacterId,
        entry_id: InventoryEntryId,
    ) -> Result<ConsumeResult, InventoryError> {
        let entry = self
            .inventory
            .get(entry_id)
            .await?
            .ok_or(InventoryError::EntryNotFound)?;
        if entry.character_id != character_id {
            return Err(InventoryError::EntryNotFound);
        }
        let character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(InventoryError::CharacterNotFound)?;
        if !session.can_act_for(character.user_id) {
            return Err(InventoryError::Forbidden);
        }
        let item = self
            .items
            .get(entry.item_id)
            .await?
            .ok_or(InventoryError::ItemNotFound)?;
        if !item.is_consumable {
            return Err(InventoryError::NotConsumable);
        }

        let expected = entry.current_uses;
        let mut updated = entry.clone();
        let outcome = updated.consume_use(item.stack_size);
        let new_uses = updated.current_uses.unwrap_or(0);

        if !self
            .inventory
            .update_uses_if(entry.id, expected, new_uses)
            .await?
        {
            return Err(InventoryError::Conflict);
        }

        match outcome {
            ConsumeOutcome::Remaining(remaining) => Ok(ConsumeResult {
                remaining: Some(remaining),
                removed: false,
            }),
            ConsumeOutcome::Depleted => {
                self.inventory
                    .delete(entry.id)
                    .await
                    .map_err(InventoryError::RemovalFailed)?;
                tracing::info!(entry_id = %entry.id, "consumable depleted and removed");
                Ok(ConsumeResult {
                    remaining: None,
                    removed: true,
                })
            }
        }
    }
}
