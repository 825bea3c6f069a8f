//! Delete ability use case.
//!
//! Removes held instances and item links before the template, so no grant or
//! link can dangle afterwards.

use std::sync::Arc;

use sprawl_domain::AbilityId;

use crate::infrastructure::ports::{AbilityRepo, ItemRepo};
use crate::session::Session;

use super::error::ManagementError;

/// What the cascade removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityCascade {
    pub grants_removed: u32,
    pub links_removed: u32,
}

/// Delete ability use case.
pub struct DeleteAbility {
    abilities: Arc<dyn AbilityRepo>,
    items: Arc<dyn ItemRepo>,
}

impl DeleteAbility {
    pub fn new(abilities: Arc<dyn AbilityRepo>, items: Arc<dyn ItemRepo>) -> Self {
        Self { abilities, items }
    }

    pub async fn execute(
        &self,
        session: &Session,
        ability_id: AbilityId,
    ) -> Result<AbilityCascade, ManagementError> {
        if !session.is_admin() {
            return Err(ManagementError::Forbidden);
        }
        if self.abilities.get(ability_id).await?.is_none() {
            return Err(ManagementError::AbilityNotFound);
        }

        let grants_removed = self
            .abilities
            .delete_grants_for_ability(ability_id)
            .await
            .map_err(ManagementError::at("grants"))?;
        let links_removed = self
            .items
            .delete_links_for_ability(ability_id)
            .await
            .map_err(ManagementError::at("links"))?;
        self.abilities
            .delete(ability_id)
            .await
            .map_err(ManagementError::at("ability"))?;

        tracing::info!(
            ability_id = %ability_id,
            grants_removed,
            links_removed,
            "ability deleted with cascade"
        );
        Ok(AbilityCascade {
            grants_removed,
            links_removed,
        })
    }
}
