//! Add participant use case.
//!
//! Seeds the combat snapshot from the source record at add time. Later
//! changes to the source never retroactively alter the snapshot.

use std::sync::Arc;

use sprawl_domain::{
    EncounterId, EncounterParticipant, ParticipantSource, ParticipantType,
};

use crate::infrastructure::ports::{
    ChangeEvent, ChangeFeed, CharacterRepo, EncounterRepo, NpcRepo,
};
use crate::session::Session;

use super::error::EncounterError;

/// Add participant use case.
pub struct AddParticipant {
    encounters: Arc<dyn EncounterRepo>,
    characters: Arc<dyn CharacterRepo>,
    npcs: Arc<dyn NpcRepo>,
    feed: Arc<dyn ChangeFeed>,
}

impl AddParticipant {
    pub fn new(
        encounters: Arc<dyn EncounterRepo>,
        characters: Arc<dyn CharacterRepo>,
        npcs: Arc<dyn NpcRepo>,
        feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self {
            encounters,
            characters,
            npcs,
            feed,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        encounter_id: EncounterId,
        source: ParticipantSource,
        participant_type: ParticipantType,
    ) -> Result<EncounterParticipant, EncounterError> {
        if !session.is_admin() {
            return Err(EncounterError::Forbidden);
        }
        let encounter = self
            .encounters
            .get(encounter_id)
            .await?
            .ok_or(EncounterError::EncounterNotFound)?;
        if !encounter.is_open() {
            return Err(EncounterError::EncounterCompleted);
        }

        let (current_hp, max_hp, initiative_modifier) = match source {
            ParticipantSource::Character(id) => {
                let character = self
                    .characters
                    .get(id)
                    .await?
                    .ok_or(EncounterError::CharacterNotFound)?;
                (
                    character.current_hp,
                    character.max_hp,
                    character.initiative_modifier,
                )
            }
            ParticipantSource::Npc(id) => {
                let npc = self.npcs.get(id).await?.ok_or(EncounterError::NpcNotFound)?;
                (npc.current_hp, npc.max_hp, npc.initiative_modifier)
            }
        };

        let participant = EncounterParticipant::from_snapshot(
            encounter_id,
            source,
            participant_type,
            current_hp,
            max_hp,
            initiative_modifier,
        );
        self.encounters.add_participant(&participant).await?;
        self.feed.publish(ChangeEvent::ParticipantAdded {
            encounter_id,
            participant_id: participant.id,
        });
        tracing::info!(
            encounter_id = %encounter_id,
            participant_id = %participant.id,
            "participant added"
        );
        Ok(participant)
    }
}
