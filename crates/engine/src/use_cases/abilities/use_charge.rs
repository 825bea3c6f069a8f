//! Use charge use case.
//!
//! Spends one charge off a granted ability with a compare-and-swap so two
//! sessions of the same player can never drive the counter negative.
//! Infinite-charge abilities always succeed and never touch storage.

use std::sync::Arc;

use sprawl_domain::{CharacterAbilityId, CharacterId};

use crate::infrastructure::ports::{AbilityRepo, CharacterRepo};
use crate::session::Session;

use super::error::AbilityError;

/// Charge counter after a successful use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeSpent {
    /// Remaining charges; `None` for infinite abilities, which track nothing
    pub remaining: Option<u32>,
}

/// Use charge use case.
pub struct UseCharge {
    characters: Arc<dyn CharacterRepo>,
    abilities: Arc<dyn AbilityRepo>,
}

impl UseCharge {
    pub fn new(characters: Arc<dyn CharacterRepo>, abilities: Arc<dyn AbilityRepo>) -> Self {
        Self {
            characters,
            abilities,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        character_id: CharacterId,
        grant_id: CharacterAbilityId,
    ) -> Result<ChargeSpent, AbilityError> {
        let grant = self
            .abilities
            .get_grant(grant_id)
            .await?
            .ok_or(AbilityError::GrantNotFound)?;
        if grant.character_id != character_id {
            return Err(AbilityError::GrantNotFound);
        }
        let character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(AbilityError::CharacterNotFound)?;
        if !session.can_act_for(character.user_id) {
            return Err(AbilityError::Forbidden);
        }
        let ability = self
            .abilities
            .get(grant.ability_id)
            .await?
            .ok_or(AbilityError::AbilityNotFound)?;

        if ability.recharge.is_infinite() {
            return Ok(ChargeSpent { remaining: None });
        }
        if grant.current_charges == 0 {
            return Err(AbilityError::NoChargesRemaining);
        }

        let remaining = grant.current_charges - 1;
        if !self
            .abilities
            .update_charges_if(grant.id, grant.current_charges, remaining)
            .await?
        {
            return Err(AbilityError::Conflict);
        }
        tracing::debug!(
            grant_id = %grant.id,
            ability_id = %ability.id,
            remaining,
            "charge spent"
        );
        Ok(ChargeSpent {
            remaining: Some(remaining),
        })
    }
}
