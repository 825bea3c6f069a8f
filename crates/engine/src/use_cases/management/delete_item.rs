//! Delete item use case.
//!
//! Deleting an item template - even one currently equipped somewhere -
//! removes its inventory entries, revokes every grant those entries sourced
//! (equip-gated or permanent; with the link rows gone nothing could ever
//! revoke them later), drops the links, then the template.

use std::sync::Arc;

use sprawl_domain::ItemId;

use crate::infrastructure::ports::{AbilityRepo, InventoryRepo, ItemRepo};
use crate::session::Session;

use super::error::ManagementError;

/// What the cascade removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCascade {
    pub entries_removed: u32,
    pub grants_removed: u32,
    pub links_removed: u32,
}

/// Delete item use case.
pub struct DeleteItem {
    items: Arc<dyn ItemRepo>,
    inventory: Arc<dyn InventoryRepo>,
    abilities: Arc<dyn AbilityRepo>,
}

impl DeleteItem {
    pub fn new(
        items: Arc<dyn ItemRepo>,
        inventory: Arc<dyn InventoryRepo>,
        abilities: Arc<dyn AbilityRepo>,
    ) -> Self {
        Self {
            items,
            inventory,
            abilities,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        item_id: ItemId,
    ) -> Result<ItemCascade, ManagementError> {
        if !session.is_admin() {
            return Err(ManagementError::Forbidden);
        }
        if self.items.get(item_id).await?.is_none() {
            return Err(ManagementError::ItemNotFound);
        }

        let removed_entries = self
            .inventory
            .delete_for_item(item_id)
            .await
            .map_err(ManagementError::at("inventory"))?;
        let mut grants_removed = 0;
        for entry in &removed_entries {
            grants_removed += self
                .abilities
                .delete_grants_for_entry(entry.character_id, entry.id)
                .await
                .map_err(ManagementError::at("grants"))?;
        }
        let links_removed = self
            .items
            .delete_links_for_item(item_id)
            .await
            .map_err(ManagementError::at("links"))?;
        self.items
            .delete(item_id)
            .await
            .map_err(ManagementError::at("item"))?;

        tracing::info!(
            item_id = %item_id,
            entries_removed = removed_entries.len(),
            grants_removed,
            links_removed,
            "item deleted with cascade"
        );
        Ok(ItemCascade {
            entries_removed: removed_entries.len() as u32,
            grants_removed,
            links_removed,
        })
    }
}
