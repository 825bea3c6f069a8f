//! Update participant notes use case.
//!
//! The single mutation still permitted once an encounter is completed.

use std::sync::Arc;

use sprawl_domain::ParticipantId;

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed, EncounterRepo};
use crate::session::Session;

use super::error::EncounterError;

/// Update participant notes use case.
pub struct UpdateParticipantNotes {
    encounters: Arc<dyn EncounterRepo>,
    feed: Arc<dyn ChangeFeed>,
}

impl UpdateParticipantNotes {
    pub fn new(encounters: Arc<dyn EncounterRepo>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { encounters, feed }
    }

    pub async fn execute(
        &self,
        session: &Session,
        participant_id: ParticipantId,
        notes: impl Into<String>,
    ) -> Result<(), EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        let mut participant = self
            .encounters
            .get_participant(participant_id)
            .await?
            .ok_or(EncounterError::ParticipantNotFound)?;

        participant.notes = notes.into();
        self.encounters.save_participant(&participant).await?;
        self.feed.publish(ChangeEvent::NotesUpdated {
            encounter_id: participant.encounter_id,
            participant_id,
        });
        Ok(())
    }
}
