//! Remove participant use case.
//!
//! Allowed at any status prior to completion.

use std::sync::Arc;

use sprawl_domain::ParticipantId;

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed, EncounterRepo};
use crate::session::Session;

use super::error::EncounterError;

/// Remove participant use case.
pub struct RemoveParticipant {
    encounters: Arc<dyn EncounterRepo>,
    feed: Arc<dyn ChangeFeed>,
}

impl RemoveParticipant {
    pub fn new(encounters: Arc<dyn EncounterRepo>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { encounters, feed }
    }

    pub async fn execute(
        &self,
        session: &Session,
        participant_id: ParticipantId,
    ) -> Result<(), EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        let participant = self
            .encounters
            .get_participant(participant_id)
            .await?
            .ok_or(EncounterError::ParticipantNotFound)?;
        let encounter = self
            .encounters
            .get(participant.encounter_id)
            .await?
            .ok_or(EncounterError::EncounterNotFound)?;
        if !encounter.is_open() {
            return Err(EncounterError::EncounterCompleted);
        }

        self.encounters.delete_participant(participant_id).await?;
        self.feed.publish(ChangeEvent::ParticipantRemoved {
            encounter_id: participant.encounter_id,
            participant_id,
        });
        tracing::info!(
            encounter_id = %participant.encounter_id,
            participant_id = %participant_id,
            "participant removed"
        );
        Ok(())
    }
}
