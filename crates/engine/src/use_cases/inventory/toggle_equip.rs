//! Toggle equip use case.
//!
//! Flipping an entry to equipped grants the equip-gated abilities its item
//! links; flipping it back revokes exactly the grants this entry sourced.
//! Both directions recompute and persist the character's effective HP/AC.

use std::collections::HashSet;
use std::sync::Arc;

use sprawl_domain::{
    compute_effective_stats, AbilityId, AbilitySource, Character, CharacterAbility,
    CharacterAbilityId, CharacterId, EffectiveStats, InventoryEntry, InventoryEntryId, Item,
};

use crate::infrastructure::ports::{
    AbilityRepo, CharacterRepo, InventoryRepo, ItemRepo, RepoError,
};
use crate::session::Session;

use super::error::InventoryError;

/// Result of an equip toggle.
#[derive(Debug)]
pub struct EquipOutcome {
    pub entry: InventoryEntry,
    /// Grants created by this toggle (equip direction only)
    pub granted: Vec<CharacterAbilityId>,
    /// Grants revoked by this toggle (unequip direction only)
    pub revoked: u32,
    pub effective: EffectiveStats,
}

/// Toggle equip use case.
///
/// Orchestrates: ownership checks, the grant/revoke pass, and the stat
/// refresh.
pub struct ToggleEquip {
    characters: Arc<dyn CharacterRepo>,
    items: Arc<dyn ItemRepo>,
    inventory: Arc<dyn InventoryRepo>,
    abilities: Arc<dyn AbilityRepo>,
}

impl ToggleEquip {
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
        entry_id: InventoryEntryId,
    ) -> Result<EquipOutcome, InventoryError> {
        let mut entry = self
            .inventory
            .get(entry_id)
            .await?
            .ok_or(InventoryError::EntryNotFound)?;
        if entry.character_id != character_id {
            return Err(InventoryError::EntryNotFound);
        }
        let mut character = self
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

        let mut granted = Vec::new();
        let mut revoked = 0;
        if entry.is_equipped {
            entry.is_equipped = false;
            self.inventory.save(&entry).await?;
            // In-flight charges on these grants are lost by design.
            revoked = self
                .abilities
                .delete_grants_for_entry(character_id, entry.id)
                .await?;
        } else {
            if !item.is_equippable {
                return Err(InventoryError::NotEquippable);
            }
            entry.is_equipped = true;
            self.inventory.save(&entry).await?;
            granted = self.grant_equip_gated(character_id, &item, entry.id).await?;
        }

        let effective = self.refresh_stats(&mut character).await?;
        tracing::info!(
            character_id = %character_id,
            entry_id = %entry.id,
            equipped = entry.is_equipped,
            granted = granted.len(),
            revoked,
            "equip state toggled"
        );
        Ok(EquipOutcome {
            entry,
            granted,
            revoked,
            effective,
        })
    }

    /// Grant every equip-gated linked ability the character does not already
    /// hold. Grants are idempotent per character, not per source: an ability
    /// held from any other source is left untouched.
    async fn grant_equip_gated(
        &self,
        character_id: CharacterId,
        item: &Item,
        entry_id: InventoryEntryId,
    ) -> Result<Vec<CharacterAbilityId>, InventoryError> {
        let links: Vec<_> = self
            .items
            .links_for_item(item.id)
            .await?
            .into_iter()
            .filter(|link| link.requires_equipped)
            .collect();
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
                    // Raced with an identical grant; the ability is held,
                    // which is all the invariant asks for.
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

    /// Recompute effective stats from every equipped entry and persist them.
    /// Current HP is never raised by a new max-HP modifier.
    async fn refresh_stats(
        &self,
        character: &mut Character,
    ) -> Result<EffectiveStats, InventoryError> {
        let entries = self.inventory.list_for_character(character.id).await?;
        let mut bundles = Vec::new();
        for entry in entries.iter().filter(|e| e.is_equipped) {
            match self.items.get(entry.item_id).await? {
                Some(item) => bundles.push(item.modifiers),
                None => {
                    tracing::warn!(
                        item_id = %entry.item_id,
                        "equipped entry references a missing item; skipping"
                    );
                }
            }
        }
        let effective = compute_effective_stats(&character.base_stats(), bundles.iter());
        character.apply_effective(&effective);
        self.characters.save(character).await?;
        Ok(effective)
    }
}
