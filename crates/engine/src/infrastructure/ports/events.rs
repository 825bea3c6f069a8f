//! Change feed port for encounter observers.
//!
//! Every player's client watches the shared tracker through this interface.
//! A push channel, a long-poll loop, or a timer-driven refetch are all valid
//! implementations; the turn/HP logic never assumes which one is behind it.
//!
//! Using a single `ChangeEvent` enum instead of one port method per event
//! keeps routing in the adapter and mock setup to a single expectation.

use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

use sprawl_domain::{EncounterId, ParticipantId};

/// All observable tracker changes, scoped to one encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChangeEvent {
    EncounterStarted {
        encounter_id: EncounterId,
        round_number: u32,
    },
    TurnAdvanced {
        encounter_id: EncounterId,
        round_number: u32,
        current_turn: u32,
    },
    EncounterCompleted {
        encounter_id: EncounterId,
    },
    EncounterDeleted {
        encounter_id: EncounterId,
    },
    ParticipantAdded {
        encounter_id: EncounterId,
        participant_id: ParticipantId,
    },
    ParticipantRemoved {
        encounter_id: EncounterId,
        participant_id: ParticipantId,
    },
    InitiativeSet {
        encounter_id: EncounterId,
        participant_id: ParticipantId,
        roll: i32,
    },
    ParticipantHpChanged {
        encounter_id: EncounterId,
        participant_id: ParticipantId,
        previous_hp: i32,
        new_hp: i32,
        is_down: bool,
    },
    NotesUpdated {
        encounter_id: EncounterId,
        participant_id: ParticipantId,
    },
    /// The subscriber fell behind the delivery buffer; it must refetch the
    /// encounter before trusting local state again.
    ResyncRequired {
        encounter_id: EncounterId,
    },
}

impl ChangeEvent {
    /// The encounter this event belongs to, for routing.
    pub fn encounter_id(&self) -> EncounterId {
        match self {
            Self::EncounterStarted { encounter_id, .. }
            | Self::TurnAdvanced { encounter_id, .. }
            | Self::EncounterCompleted { encounter_id }
            | Self::EncounterDeleted { encounter_id }
            | Self::ParticipantAdded { encounter_id, .. }
            | Self::ParticipantRemoved { encounter_id, .. }
            | Self::InitiativeSet { encounter_id, .. }
            | Self::ParticipantHpChanged { encounter_id, .. }
            | Self::NotesUpdated { encounter_id, .. }
            | Self::ResyncRequired { encounter_id } => *encounter_id,
        }
    }
}

/// Port for publishing and observing tracker changes.
///
/// Delivery is at-least-once for live subscribers; a subscriber that falls
/// behind receives [`ChangeEvent::ResyncRequired`] instead of silently
/// missing events. Publishing never blocks on slow observers.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeFeed: Send + Sync {
    /// Publish an event to the owning encounter's subscribers.
    fn publish(&self, event: ChangeEvent);

    /// Subscribe to one encounter's event stream.
    fn subscribe(&self, encounter_id: EncounterId) -> BoxStream<'static, ChangeEvent>;
}
