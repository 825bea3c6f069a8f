//! Create encounter use case.
//!
//! Drafts an encounter the GM can then populate with participants.

use std::sync::Arc;

use sprawl_domain::Encounter;

use crate::infrastructure::ports::EncounterRepo;
use crate::session::Session;

use super::error::EncounterError;

/// Create encounter use case.
pub struct CreateEncounter {
    encounters: Arc<dyn EncounterRepo>,
}

impl CreateEncounter {
    pub fn new(encounters: Arc<dyn EncounterRepo>) -> Self {
        Self { encounters }
    }

    pub async fn execute(
        &self,
        session: &Session,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Encounter, EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        let encounter = Encounter::new(name).with_description(description);
        self.encounters.save(&encounter).await?;
        tracing::info!(encounter_id = %encounter.id, "encounter drafted");
        Ok(encounter)
    }
}
