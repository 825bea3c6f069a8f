//! Advance turn use case.
//!
//! The increment and round wraparound run inside the storage procedure so two
//! GM devices clicking "next" concurrently cannot lose an update. Every
//! participant occupies a slot, down or not - GM judgment decides whether to
//! act on it.

use std::sync::Arc;

use sprawl_domain::{EncounterId, EncounterStatus, TurnPosition};

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed, EncounterRepo};
use crate::session::Session;

use super::error::EncounterError;

/// Advance turn use case.
pub struct AdvanceTurn {
    encounters: Arc<dyn EncounterRepo>,
    feed: Arc<dyn ChangeFeed>,
}

impl AdvanceTurn {
    pub fn new(encounters: Arc<dyn EncounterRepo>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { encounters, feed }
    }

    pub async fn execute(
        &self,
        session: &Session,
        encounter_id: EncounterId,
    ) -> Result<TurnPosition, EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        let encounter = self
            .encounters
            .get(encounter_id)
            .await?
            .ok_or(EncounterError::EncounterNotFound)?;
        match encounter.status {
            EncounterStatus::Active => {}
            EncounterStatus::Draft => return Err(EncounterError::NotActive),
            EncounterStatus::Completed => return Err(EncounterError::EncounterCompleted),
        }

        let advanced = self.encounters.advance_turn(encounter_id).await?;
        let position = TurnPosition {
            round_number: advanced.round_number,
            current_turn: advanced.current_turn,
        };
        self.feed.publish(ChangeEvent::TurnAdvanced {
            encounter_id,
            round_number: position.round_number,
            current_turn: position.current_turn,
        });
        tracing::debug!(
            encounter_id = %encounter_id,
            round = position.round_number,
            turn = position.current_turn,
            "turn advanced"
        );
        Ok(position)
    }
}
