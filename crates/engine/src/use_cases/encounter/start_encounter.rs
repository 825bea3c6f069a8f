//! Start encounter use case.
//!
//! Validates that every participant has rolled, then hands the draft->active
//! flip to the storage procedure so order assignment is atomic with the
//! status change.

use std::sync::Arc;

use sprawl_domain::{Encounter, EncounterId, EncounterStatus};

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed, ClockPort, EncounterRepo};
use crate::session::Session;

use super::error::EncounterError;

/// Start encounter use case.
pub struct StartEncounter {
    encounters: Arc<dyn EncounterRepo>,
    clock: Arc<dyn ClockPort>,
    feed: Arc<dyn ChangeFeed>,
}

impl StartEncounter {
    pub fn new(
        encounters: Arc<dyn EncounterRepo>,
        clock: Arc<dyn ClockPort>,
        feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self {
            encounters,
            clock,
            feed,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        encounter_id: EncounterId,
    ) -> Result<Encounter, EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        let encounter = self
            .encounters
            .get(encounter_id)
            .await?
            .ok_or(EncounterError::EncounterNotFound)?;
        match encounter.status {
            EncounterStatus::Draft => {}
            EncounterStatus::Active => return Err(EncounterError::NotDraft),
            EncounterStatus::Completed => return Err(EncounterError::EncounterCompleted),
        }

        let participants = self.encounters.participants(encounter_id).await?;
        if participants.is_empty() {
            return Err(EncounterError::Validation(
                sprawl_domain::DomainError::validation(
                    "cannot start an encounter with no participants",
                ),
            ));
        }
        let missing = participants
            .iter()
            .filter(|p| p.initiative_roll.is_none())
            .count();
        if missing > 0 {
            return Err(EncounterError::IncompleteInitiative { missing });
        }

        let started = self
            .encounters
            .start_encounter(encounter_id, self.clock.now())
            .await?;
        self.feed.publish(ChangeEvent::EncounterStarted {
            encounter_id,
            round_number: started.round_number,
        });
        tracing::info!(
            encounter_id = %encounter_id,
            participants = participants.len(),
            "encounter started"
        );
        Ok(started)
    }
}
