//! Set initiative use case.
//!
//! Stores the raw roll; ranking is computed at start time, not here. Allowed
//! while the encounter is active too, so a mid-fight joiner can be given a
//! roll - the design does not auto-interpolate newcomers into the order.

use std::sync::Arc;

use sprawl_domain::ParticipantId;

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed, EncounterRepo};
use crate::session::Session;

use super::error::EncounterError;

/// Set initiative use case.
pub struct SetInitiative {
    encounters: Arc<dyn EncounterRepo>,
    feed: Arc<dyn ChangeFeed>,
}

impl SetInitiative {
    pub fn new(encounters: Arc<dyn EncounterRepo>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { encounters, feed }
    }

    pub async fn execute(
        &self,
        session: &Session,
        participant_id: ParticipantId,
        roll: i32,
    ) -> Result<(), EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        let mut participant = self
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

        participant.initiative_roll = Some(roll);
        self.encounters.save_participant(&participant).await?;
        self.feed.publish(ChangeEvent::InitiativeSet {
            encounter_id: participant.encounter_id,
            participant_id,
            roll,
        });
        Ok(())
    }
}
