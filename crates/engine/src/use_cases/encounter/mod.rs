//! Encounter use cases: lifecycle, roster, initiative, turns, and HP sync.

pub mod add_participant;
pub mod advance_turn;
pub mod apply_hp_delta;
pub mod complete_encounter;
pub mod create_encounter;
pub mod delete_encounter;
pub mod error;
pub mod remove_participant;
pub mod set_initiative;
pub mod start_encounter;
pub mod update_notes;

pub use add_participant::AddParticipant;
pub use advance_turn::AdvanceTurn;
pub use apply_hp_delta::{ApplyHpDelta, HpDeltaOutcome};
pub use complete_encounter::CompleteEncounter;
pub use create_encounter::CreateEncounter;
pub use delete_encounter::DeleteEncounter;
pub use error::EncounterError;
pub use remove_participant::RemoveParticipant;
pub use set_initiative::SetInitiative;
pub use start_encounter::StartEncounter;
pub use update_notes::UpdateParticipantNotes;
