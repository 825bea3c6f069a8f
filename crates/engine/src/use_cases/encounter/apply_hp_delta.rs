//! Apply HP delta use case.
//!
//! Two-copy synchronization: the participant snapshot is written first with a
//! compare-and-swap (it is authoritative for the encounter's lifetime), then
//! the new value is mirrored onto the source Character/NPC record so
//! non-combat views reflect damage immediately. The pair is best-effort, not
//! a transaction - a mirror failure is reported with the already-applied
//! snapshot change, never swallowed.

use std::sync::Arc;

use sprawl_domain::{HpChange, ParticipantId, ParticipantSource};

use crate::infrastructure::ports::{
    ChangeEvent, ChangeFeed, CharacterRepo, EncounterRepo, NpcRepo,
};
use crate::session::Session;

use super::error::EncounterError;

/// Result of an HP write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HpDeltaOutcome {
    pub change: HpChange,
    /// Display flag; reaching zero never removes the participant
    pub is_down: bool,
}

/// Apply HP delta use case.
pub struct ApplyHpDelta {
    encounters: Arc<dyn EncounterRepo>,
    characters: Arc<dyn CharacterRepo>,
    npcs: Arc<dyn NpcRepo>,
    feed: Arc<dyn ChangeFeed>,
}

impl ApplyHpDelta {
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
        participant_id: ParticipantId,
        delta: i32,
    ) -> Result<HpDeltaOutcome, EncounterError> {
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

        let change = participant.hp_after_delta(delta);
        if !self
            .encounters
            .update_participant_hp_if(participant_id, change.previous_hp, change.new_hp)
            .await?
        {
            return Err(EncounterError::Conflict);
        }

        let is_down = change.new_hp == 0;
        self.feed.publish(ChangeEvent::ParticipantHpChanged {
            encounter_id: participant.encounter_id,
            participant_id,
            previous_hp: change.previous_hp,
            new_hp: change.new_hp,
            is_down,
        });

        if let Err(source) = self.mirror_to_source(&participant.source, change.new_hp).await {
            tracing::warn!(
                participant_id = %participant_id,
                new_hp = change.new_hp,
                error = %source,
                "participant snapshot updated but source mirror failed"
            );
            return Err(EncounterError::MirrorFailed { change, source });
        }

        Ok(HpDeltaOutcome { change, is_down })
    }

    async fn mirror_to_source(
        &self,
        source: &ParticipantSource,
        new_hp: i32,
    ) -> Result<(), crate::infrastructure::ports::RepoError> {
        match source {
            ParticipantSource::Character(id) => self.characters.set_current_hp(*id, new_hp).await,
            ParticipantSource::Npc(id) => self.npcs.set_current_hp(*id, new_hp).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockChangeFeed, MockCharacterRepo, MockEncounterRepo, MockNpcRepo, RepoError,
    };
    use chrono::Utc;
    use sprawl_domain::{
        CharacterId, Encounter, EncounterParticipant, NpcId, ParticipantType, UserId,
    };

    struct Scene {
        encounter: Encounter,
        participant: EncounterParticipant,
    }

    fn scene(source: ParticipantSource) -> Scene {
        let mut encounter = Encounter::new("Alley ambush");
        encounter.begin(Utc::now()).expect("draft starts");
        let mut participant = EncounterParticipant::from_snapshot(
            encounter.id,
            source,
            ParticipantType::Player,
            5,
            10,
            0,
        );
        participant.current_hp = 5;
        Scene {
            encounter,
            participant,
        }
    }

    fn encounters_for(scene: &Scene) -> MockEncounterRepo {
        let mut encounters = MockEncounterRepo::new();
        let participant = scene.participant.clone();
        encounters
            .expect_get_participant()
            .returning(move |_| Ok(Some(participant.clone())));
        let encounter = scene.encounter.clone();
        encounters
            .expect_get()
            .returning(move |_| Ok(Some(encounter.clone())));
        encounters
    }

    #[tokio::test]
    async fn healing_clamps_at_max_and_mirrors() {
        let character_id = CharacterId::new();
        let scene = scene(ParticipantSource::Character(character_id));
        let mut encounters = encounters_for(&scene);
        encounters
            .expect_update_participant_hp_if()
            .withf(|_, expected, new_hp| *expected == 5 && *new_hp == 10)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let mut characters = MockCharacterRepo::new();
        characters
            .expect_set_current_hp()
            .withf(move |id, hp| *id == character_id && *hp == 10)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut feed = MockChangeFeed::new();
        feed.expect_publish().times(1).return_const(());

        let use_case = ApplyHpDelta::new(
            Arc::new(encounters),
            Arc::new(characters),
            Arc::new(MockNpcRepo::new()),
            Arc::new(feed),
        );
        let outcome = use_case
            .execute(&Session::admin(UserId::new()), scene.participant.id, 20)
            .await
            .expect("heal applies");

        assert_eq!(outcome.change.new_hp, 10);
        assert!(!outcome.is_down);
    }

    #[tokio::test]
    async fn massive_damage_floors_at_zero_and_flags_down() {
        let npc_id = NpcId::new();
        let scene = scene(ParticipantSource::Npc(npc_id));
        let mut encounters = encounters_for(&scene);
        encounters
            .expect_update_participant_hp_if()
            .withf(|_, expected, new_hp| *expected == 5 && *new_hp == 0)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let mut npcs = MockNpcRepo::new();
        npcs.expect_set_current_hp()
            .withf(move |id, hp| *id == npc_id && *hp == 0)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut feed = MockChangeFeed::new();
        feed.expect_publish()
            .withf(|event| matches!(event, ChangeEvent::ParticipantHpChanged { is_down: true, .. }))
            .times(1)
            .return_const(());

        let use_case = ApplyHpDelta::new(
            Arc::new(encounters),
            Arc::new(MockCharacterRepo::new()),
            Arc::new(npcs),
            Arc::new(feed),
        );
        let outcome = use_case
            .execute(&Session::admin(UserId::new()), scene.participant.id, -999)
            .await
            .expect("damage applies");

        assert_eq!(outcome.change.new_hp, 0);
        assert!(outcome.is_down);
    }

    #[tokio::test]
    async fn stale_snapshot_read_returns_conflict() {
        let scene = scene(ParticipantSource::Character(CharacterId::new()));
        let mut encounters = encounters_for(&scene);
        encounters
            .expect_update_participant_hp_if()
            .returning(|_, _, _| Ok(false));

        let use_case = ApplyHpDelta::new(
            Arc::new(encounters),
            Arc::new(MockCharacterRepo::new()),
            Arc::new(MockNpcRepo::new()),
            Arc::new(MockChangeFeed::new()),
        );
        let result = use_case
            .execute(&Session::admin(UserId::new()), scene.participant.id, -2)
            .await;

        assert!(matches!(result, Err(EncounterError::Conflict)));
    }

    #[tokio::test]
    async fn mirror_failure_reports_the_applied_change() {
        let scene = scene(ParticipantSource::Character(CharacterId::new()));
        let mut encounters = encounters_for(&scene);
        encounters
            .expect_update_participant_hp_if()
            .returning(|_, _, _| Ok(true));

        let mut characters = MockCharacterRepo::new();
        characters
            .expect_set_current_hp()
            .returning(|id, _| Err(RepoError::not_found("Character", id)));
        let mut feed = MockChangeFeed::new();
        feed.expect_publish().times(1).return_const(());

        let use_case = ApplyHpDelta::new(
            Arc::new(encounters),
            Arc::new(characters),
            Arc::new(MockNpcRepo::new()),
            Arc::new(feed),
        );
        let result = use_case
            .execute(&Session::admin(UserId::new()), scene.participant.id, -2)
            .await;

        match result {
            Err(EncounterError::MirrorFailed { change, source }) => {
                assert_eq!(change.new_hp, 3);
                assert!(source.is_not_found());
            }
            other => panic!("expected MirrorFailed, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn completed_encounter_rejects_hp_writes() {
        let mut scene = scene(ParticipantSource::Character(CharacterId::new()));
        scene
            .encounter
            .finish(Utc::now())
            .expect("active completes");
        let encounters = encounters_for(&scene);

        let use_case = ApplyHpDelta::new(
            Arc::new(encounters),
            Arc::new(MockCharacterRepo::new()),
            Arc::new(MockNpcRepo::new()),
            Arc::new(MockChangeFeed::new()),
        );
        let result = use_case
            .execute(&Session::admin(UserId::new()), scene.participant.id, -2)
            .await;

        assert!(matches!(result, Err(EncounterError::EncounterCompleted)));
    }
}
