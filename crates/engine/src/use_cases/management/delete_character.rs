//! Delete character use case.
//!
//! Characters are never deleted implicitly. The cascade runs grants first,
//! then inventory, then the sheet itself, each as an explicit step so the
//! behavior is identical on every storage backend.

use std::sync::Arc;

use sprawl_domain::CharacterId;

use crate::infrastructure::ports::{AbilityRepo, CharacterRepo, InventoryRepo};
use crate::session::Session;

use super::error::ManagementError;

/// What the cascade removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterCascade {
    pub grants_removed: u32,
    pub entries_removed: u32,
}

/// Delete character use case.
pub struct DeleteCharacter {
    characters: Arc<dyn CharacterRepo>,
    inventory: Arc<dyn InventoryRepo>,
    abilities: Arc<dyn AbilityRepo>,
}

impl DeleteCharacter {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        inventory: Arc<dyn InventoryRepo>,
        abilities: Arc<dyn AbilityRepo>,
    ) -> Self {
        Self {
            characters,
            inventory,
            abilities,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        character_id: CharacterId,
    ) -> Result<CharacterCascade, ManagementError> {
        let character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(ManagementError::CharacterNotFound)?;
        if !session.can_act_for(character.user_id) {
            return Err(ManagementError::Forbidden);
        }

        let grants_removed = self
            .abilities
            .delete_grants_for_character(character_id)
            .await
            .map_err(ManagementError::at("grants"))?;
        let entries_removed = self
            .inventory
            .delete_for_character(character_id)
            .await
            .map_err(ManagementError::at("inventory"))?;
        self.characters
            .delete(character_id)
            .await
            .map_err(ManagementError::at("character"))?;

        tracing::info!(
            character_id = %character_id,
            grants_removed,
            entries_removed,
            "character deleted with cascade"
        );
        Ok(CharacterCascade {
            grants_removed,
            entries_removed,
        })
    }
}
