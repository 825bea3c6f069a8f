//! Take rest use case.
//!
//! Applies the recharge policy to every granted ability of a character and
//! persists each result. The write pass is best-effort per grant: a failed
//! save is recorded and the rest of the ledger still restores, so the caller
//! can retry exactly the failed rows.

use std::sync::Arc;

use sprawl_domain::{CharacterAbilityId, CharacterId, RestType};

use crate::infrastructure::ports::{AbilityRepo, CharacterRepo, RepoError};
use crate::session::Session;

use super::error::AbilityError;

/// Per-character rest outcome.
#[derive(Debug, Default)]
pub struct RestOutcome {
    /// Grants that regained charges, with the amount restored
    pub restored: Vec<(CharacterAbilityId, u32)>,
    /// Grants whose save failed after restoring in memory
    pub failed: Vec<(CharacterAbilityId, RepoError)>,
}

/// Take rest use case.
pub struct TakeRest {
    characters: Arc<dyn CharacterRepo>,
    abilities: Arc<dyn AbilityRepo>,
}

impl TakeRest {
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
        rest: RestType,
    ) -> Result<RestOutcome, AbilityError> {
        let character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(AbilityError::CharacterNotFound)?;
        if !session.can_act_for(character.user_id) {
            return Err(AbilityError::Forbidden);
        }

        let grants = self.abilities.grants_for_character(character_id).await?;
        let mut outcome = RestOutcome::default();
        for mut grant in grants {
            let ability = match self.abilities.get(grant.ability_id).await? {
                Some(ability) => ability,
                None => {
                    tracing::warn!(
                        grant_id = %grant.id,
                        ability_id = %grant.ability_id,
                        "grant references a missing ability; skipping"
                    );
                    continue;
                }
            };
            let restored = grant.apply_rest(&ability.recharge, rest);
            if restored == 0 {
                continue;
            }
            match self.abilities.save_grant(&grant).await {
                Ok(()) => outcome.restored.push((grant.id, restored)),
                Err(source) => {
                    tracing::warn!(
                        grant_id = %grant.id,
                        error = %source,
                        "failed to persist restored charges"
                    );
                    outcome.failed.push((grant.id, source));
                }
            }
        }
        tracing::info!(
            character_id = %character_id,
            rest = ?rest,
            restored = outcome.restored.len(),
            failed = outcome.failed.len(),
            "rest applied"
        );
        Ok(outcome)
    }
}
