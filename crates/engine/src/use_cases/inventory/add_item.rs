//! Add item to inventory use case.
//!
//! Merges quantity into an existing entry or creates a fresh one, then grants
//! the item's non-equip-gated abilities. Those grants are permanent: equip
//! toggling never revokes them (they go away with the entry or the item).

use std::collections::HashSet;
use std::sync::Arc;

use sprawl_domain::{
    AbilityId, AbilitySource, CharacterAbility, CharacterAbilityId, CharacterId, InventoryEntry,
    InventoryEntryId, ItemId,
};

use crate::infrastructure::ports::{
    AbilityRepo, CharacterRepo, InventoryRepo, ItemRepo, RepoError,
};
use crate::session::Session;

use super::error::InventoryError;

/// Result of adding an item.
#[derive(Debug)]
pub struct AddItemOutcome {
    pub entry: InventoryEntry,
    /// Grants created by the add (non-equip-gated links only)
    pub granted: Vec<CharacterAbilityId>,
}

/// Add item use case.
pub struct AddItemToInventory {
    characters: Arc<dyn CharacterRepo>,
    items: Arc<dyn ItemRepo>,
    inventory: Arc<dyn InventoryRepo>,
    abilities: Arc<dyn AbilityRepo>,
}

impl AddItemToInventory {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        items: Arc<dyn ItemRepo>,
        inventory: Arc<dyn InventoryRepo>,
        abilities: Arc<dyn AbilityRepo>,
    ) -> Self {
        Self {
            characters,
            items,
            inventory,
            abilities,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        character_id: CharacterId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<AddItemOutcome, InventoryError> {
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
            .get(item_id)
            .await?
            .ok_or(InventoryError::ItemNotFound)?;

        let existing = self
            .inventory
            .list_for_character(character_id)
            .await?
            .into_iter()
            .find(|entry| entry.item_id == item_id);

        let entry = match existing {
            Some(mut entry) => {
                entry.quantity += quantity.max(1);
                self.inventory.save(&entry).await?;
                entry
            }
            None => {
                let entry = InventoryEntry::new(character_id, item_id, quantity);
                self.inventory.save(&entry).await?;
                entry
            }
        };

        let granted = self
            .grant_permanent(character_id, item.id, entry.id)
            .await?;
        tracing::info!(
            character_id = %character_id,
            item_id = %item.id,
            quantity = entry.quantity,
            granted = granted.len(),
            "item added to inventory"
        );
        Ok(AddItemOutcome { entry, granted })
    }

    /// Grant every `requires_equipped = false` linked ability the character
    /// does not already hold.
    async fn grant_permanent(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        entry_id: InventoryEntryId,
    ) -> Result<Vec<CharacterAbilityId>, InventoryError> {
        let links: Vec<_> = self
            .items
            .links_for_item(item_id)
            .await?
            .into_iter()
            .filter(|link| !link.requires_equipped)
            .collect();
        if links.is_empty() {
            return Ok(Vec::new());
        }
        let total = links.len();
        let held: HashSet<AbilityId> = self
            .abilities
            .grants_for_character(character_id)
            .await?
            .iter()
            .map(|grant| grant.ability_id)
            .collect();

        let mut granted = Vec::new();
        for link in links {
            if held.contains(&link.ability_id) {
                continue;
            }
            let ability = match self.abilities.get(link.ability_id).await {
                Ok(Some(ability)) => ability,
                Ok(None) => {
                    return Err(InventoryError::GrantInterrupted {
                        granted: granted.len(),
                        total,
                        source: RepoError::not_found("Ability", link.ability_id),
                    })
                }
                Err(source) => {
                    return Err(InventoryError::GrantInterrupted {
                        granted: granted.len(),
                        total,
                        source,
                    })
                }
            };
            let grant = CharacterAbility::granted(
                character_id,
                &ability,
                AbilitySource::Item { entry_id },
            );
            match self.abilities.insert_grant(&grant).await {
                Ok(()) => granted.push(grant.id),
                Err(source) if source.is_constraint() => {
                    tracing::debug!(ability_id = %link.ability_id, "grant already present");
                }
                Err(source) => {
                    return Err(InventoryError::GrantInterrupted {
                        granted: granted.len(),
                        total,
                        source,
                    })
                }
            }
        }
        Ok(granted)
    }
}
