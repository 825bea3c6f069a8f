//! Complete encounter use case.
//!
//! After completion no HP, initiative, or roster mutation is permitted; only
//! participant notes stay editable.

use std::sync::Arc;

use sprawl_domain::{Encounter, EncounterId, EncounterStatus};

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed, ClockPort, EncounterRepo};
use crate::session::Session;

use super::error::EncounterError;

/// Complete encounter use case.
pub struct CompleteEncounter {
    encounters: Arc<dyn EncounterRepo>,
    clock: Arc<dyn ClockPort>,
    feed: Arc<dyn ChangeFeed>,
}

impl CompleteEncounter {
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
        let mut encounter = self
            .encounters
            .get(encounter_id)
            .await?
            .ok_or(EncounterError::EncounterNotFound)?;
        match encounter.status {
            EncounterStatus::Active => {}
            EncounterStatus::Draft => return Err(EncounterError::NotActive),
            EncounterStatus::Completed => return Err(EncounterError::EncounterCompleted),
        }

        encounter.finish(self.clock.now())?;
        self.encounters.save(&encounter).await?;
        self.feed
            .publish(ChangeEvent::EncounterCompleted { encounter_id });
        tracing::info!(encounter_id = %encounter_id, "encounter completed");
        Ok(encounter)
    }
}
