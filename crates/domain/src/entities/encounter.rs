//! Encounter entity - the combat tracker's state machine - and its
//! participants.
//!
//! Status is monotonic: Draft -> Active -> Completed. Turn order is derived
//! from raw initiative rolls at start time; the ranking itself is computed,
//! never stored as the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CharacterId, DomainError, EncounterId, NpcId, ParticipantId};

/// Encounter lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EncounterStatus {
    Draft,
    Active,
    Completed,
}

impl std::fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Where the tracker currently points after an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnPosition {
    pub round_number: u32,
    pub current_turn: u32,
}

/// A combat scene with its own turn order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: EncounterId,
    pub name: String,
    pub description: String,
    pub status: EncounterStatus,
    /// 1-based once active; 0 while drafting
    pub round_number: u32,
    /// 1-based initiative-order position once active; 0 while drafting
    pub current_turn: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Encounter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EncounterId::new(),
            name: name.into(),
            description: String::new(),
            status: EncounterStatus::Draft,
            round_number: 0,
            current_turn: 0,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Participants may only be added while the encounter is open.
    pub fn is_open(&self) -> bool {
        matches!(self.status, EncounterStatus::Draft | EncounterStatus::Active)
    }

    /// Draft -> Active. Round 1, turn 1.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != EncounterStatus::Draft {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot start a {} encounter",
                self.status
            )));
        }
        self.status = EncounterStatus::Active;
        self.round_number = 1;
        self.current_turn = 1;
        self.started_at = Some(now);
        Ok(())
    }

    /// Move to the next turn slot, wrapping past `participant_count` into a
    /// new round. Every participant occupies a slot, alive or not.
    pub fn advance(&mut self, participant_count: u32) -> Result<TurnPosition, DomainError> {
        if self.status != EncounterStatus::Active {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot advance a {} encounter",
                self.status
            )));
        }
        if participant_count == 0 {
            return Err(DomainError::constraint(
                "cannot advance an encounter with no participants",
            ));
        }
        if self.current_turn >= participant_count {
            self.current_turn = 1;
            self.round_number += 1;
        } else {
            self.current_turn += 1;
        }
        Ok(TurnPosition {
            round_number: self.round_number,
            current_turn: self.current_turn,
        })
    }

    /// Active -> Completed. Terminal for everything but participant notes.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != EncounterStatus::Active {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot complete a {} encounter",
                self.status
            )));
        }
        self.status = EncounterStatus::Completed;
        self.completed_at = Some(now);
        Ok(())
    }
}

/// Combat role of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipantType {
    Player,
    Enemy,
    Npc,
}

/// The record a participant wraps - a character or an NPC, exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceType", content = "sourceId", rename_all = "camelCase")]
pub enum ParticipantSource {
    Character(CharacterId),
    Npc(NpcId),
}

/// An applied HP write, before/after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpChange {
    pub previous_hp: i32,
    pub new_hp: i32,
}

/// An encounter-scoped combat actor with its own HP snapshot.
///
/// The snapshot is taken when the participant is added and stays authoritative
/// for the encounter's lifetime; later changes to the source record do not
/// flow back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterParticipant {
    pub id: ParticipantId,
    pub encounter_id: EncounterId,
    pub source: ParticipantSource,
    pub participant_type: ParticipantType,
    /// Raw d20 roll entered by the GM; unset until rolled
    pub initiative_roll: Option<i32>,
    /// Copied from the source record at add time
    pub initiative_modifier: i32,
    /// Rank assigned when the encounter starts
    pub initiative_order: Option<u32>,
    pub current_hp: i32,
    pub max_hp: i32,
    pub notes: String,
}

impl EncounterParticipant {
    pub fn from_snapshot(
        encounter_id: EncounterId,
        source: ParticipantSource,
        participant_type: ParticipantType,
        current_hp: i32,
        max_hp: i32,
        initiative_modifier: i32,
    ) -> Self {
        Self {
            id: ParticipantId::new(),
            encounter_id,
            source,
            participant_type,
            initiative_roll: None,
            initiative_modifier,
            initiative_order: None,
            current_hp: current_hp.clamp(0, max_hp),
            max_hp,
            notes: String::new(),
        }
    }

    /// Roll + modifier, once a roll has been entered.
    pub fn initiative_score(&self) -> Option<i32> {
        self.initiative_roll.map(|r| r + self.initiative_modifier)
    }

    /// Clamped HP arithmetic; negative delta is damage, positive is healing.
    /// Does not mutate - the caller persists through its write discipline.
    pub fn hp_after_delta(&self, delta: i32) -> HpChange {
        HpChange {
            previous_hp: self.current_hp,
            new_hp: (self.current_hp + delta).clamp(0, self.max_hp),
        }
    }

    /// Down participants still occupy a turn slot; this is display-only.
    pub fn is_down(&self) -> bool {
        self.current_hp == 0
    }
}

/// Rank participants for turn order: initiative score descending, ties by
/// modifier descending, remaining ties by insertion order (slice order).
///
/// Fails if any participant has no roll yet.
pub fn initiative_ranking(
    participants: &[EncounterParticipant],
) -> Result<Vec<ParticipantId>, DomainError> {
    let mut scored = Vec::with_capacity(participants.len());
    for (index, participant) in participants.iter().enumerate() {
        let score = participant.initiative_score().ok_or_else(|| {
            DomainError::validation(format!(
                "participant {} has no initiative roll",
                participant.id
            ))
        })?;
        scored.push((score, participant.initiative_modifier, index, participant.id));
    }
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.2.cmp(&b.2))
    });
    Ok(scored.into_iter().map(|(_, _, _, id)| id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(roll: Option<i32>, modifier: i32) -> EncounterParticipant {
        let mut p = EncounterParticipant::from_snapshot(
            EncounterId::new(),
            ParticipantSource::Character(CharacterId::new()),
            ParticipantType::Player,
            10,
            10,
            modifier,
        );
        p.initiative_roll = roll;
        p
    }

    #[test]
    fn begin_only_from_draft() {
        let mut encounter = Encounter::new("Alley ambush");
        encounter.begin(Utc::now()).expect("draft starts");
        assert_eq!(encounter.status, EncounterStatus::Active);
        assert_eq!(encounter.round_number, 1);
        assert_eq!(encounter.current_turn, 1);
        assert!(encounter.started_at.is_some());

        let err = encounter.begin(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
    }

    #[test]
    fn advance_wraps_and_increments_round() {
        let mut encounter = Encounter::new("Alley ambush");
        encounter.begin(Utc::now()).expect("draft starts");
        encounter.current_turn = 4;

        let position = encounter.advance(4).expect("active advances");
        assert_eq!(position.current_turn, 1);
        assert_eq!(position.round_number, 2);
    }

    #[test]
    fn advance_within_round_moves_one_slot() {
        let mut encounter = Encounter::new("Alley ambush");
        encounter.begin(Utc::now()).expect("draft starts");

        let position = encounter.advance(4).expect("active advances");
        assert_eq!(position.current_turn, 2);
        assert_eq!(position.round_number, 1);
    }

    #[test]
    fn advance_requires_active_status() {
        let mut encounter = Encounter::new("Alley ambush");
        assert!(encounter.advance(3).is_err());

        encounter.begin(Utc::now()).expect("draft starts");
        encounter.finish(Utc::now()).expect("active completes");
        assert!(encounter.advance(3).is_err());
    }

    #[test]
    fn finish_is_terminal() {
        let mut encounter = Encounter::new("Alley ambush");
        encounter.begin(Utc::now()).expect("draft starts");
        encounter.finish(Utc::now()).expect("active completes");
        assert_eq!(encounter.status, EncounterStatus::Completed);
        assert!(encounter.completed_at.is_some());
        assert!(!encounter.is_open());

        assert!(encounter.finish(Utc::now()).is_err());
    }

    #[test]
    fn completed_cannot_restart() {
        let mut encounter = Encounter::new("Alley ambush");
        encounter.begin(Utc::now()).expect("draft starts");
        encounter.finish(Utc::now()).expect("active completes");
        assert!(encounter.begin(Utc::now()).is_err());
    }

    #[test]
    fn hp_delta_clamps_at_both_ends() {
        let mut p = participant(None, 0);
        p.current_hp = 5;
        p.max_hp = 10;

        assert_eq!(p.hp_after_delta(20).new_hp, 10);
        assert_eq!(p.hp_after_delta(-999).new_hp, 0);
        assert_eq!(p.hp_after_delta(-2).new_hp, 3);
        assert_eq!(p.hp_after_delta(-2).previous_hp, 5);
    }

    #[test]
    fn down_flag_at_zero() {
        let mut p = participant(None, 0);
        p.current_hp = 0;
        assert!(p.is_down());
        p.current_hp = 1;
        assert!(!p.is_down());
    }

    #[test]
    fn ranking_orders_by_score_then_modifier_then_insertion() {
        // A: 15+2=17, B: 18+0=18, C: 15+3=18 -> C before B on modifier, A last
        let a = participant(Some(15), 2);
        let b = participant(Some(18), 0);
        let c = participant(Some(15), 3);
        let order = initiative_ranking(&[a.clone(), b.clone(), c.clone()])
            .expect("all rolls present");
        assert_eq!(order, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn ranking_breaks_full_ties_by_insertion_order() {
        let first = participant(Some(12), 1);
        let second = participant(Some(12), 1);
        let order =
            initiative_ranking(&[first.clone(), second.clone()]).expect("all rolls present");
        assert_eq!(order, vec![first.id, second.id]);
    }

    #[test]
    fn ranking_requires_every_roll() {
        let rolled = participant(Some(14), 1);
        let unrolled = participant(None, 2);
        let err = initiative_ranking(&[rolled, unrolled]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn snapshot_clamps_incoming_hp() {
        let p = EncounterParticipant::from_snapshot(
            EncounterId::new(),
            ParticipantSource::Npc(NpcId::new()),
            ParticipantType::Enemy,
            25,
            20,
            0,
        );
        assert_eq!(p.current_hp, 20);
    }
}
