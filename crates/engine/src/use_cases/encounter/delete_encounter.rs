//! Delete encounter use case.
//!
//! Allowed from any status; terminal and irreversible. The participant
//! cascade is an explicit step, not an assumed storage trigger, so the
//! behavior holds on any backend.

use std::sync::Arc;

use sprawl_domain::EncounterId;

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed, EncounterRepo};
use crate::session::Session;

use super::error::EncounterError;

/// Delete encounter use case.
pub struct DeleteEncounter {
    encounters: Arc<dyn EncounterRepo>,
    feed: Arc<dyn ChangeFeed>,
}

impl DeleteEncounter {
    pub fn new(encounters: Arc<dyn EncounterRepo>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { encounters, feed }
    }

    pub async fn execute(
        &self,
        session: &Session,
        encounter_id: EncounterId,
    ) -> Result<(), EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        if self.encounters.get(encounter_id).await?.is_none() {
            return Err(EncounterError::EncounterNotFound);
        }

        let removed = self.encounters.delete_participants(encounter_id).await?;
        self.encounters.delete(encounter_id).await?;
        self.feed
            .publish(ChangeEvent::EncounterDeleted { encounter_id });
        tracing::info!(
            encounter_id = %encounter_id,
            participants_removed = removed,
            "encounter deleted"
        );
        Ok(())
    }
}
