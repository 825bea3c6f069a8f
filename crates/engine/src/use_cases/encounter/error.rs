//! Encounter operation errors.

use sprawl_domain::{DomainError, HpChange};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur while driving an encounter.
#[derive(Debug, thiserror::Error)]
pub enum EncounterError {
    #[error("Encounter not found")]
    EncounterNotFound,
    #[error("Participant not found")]
    ParticipantNotFound,
    #[error("Character not found")]
    CharacterNotFound,
    #[error("NPC not found")]
    NpcNotFound,
    #[error("Encounter already completed")]
    EncounterCompleted,
    #[error("Encounter is not active")]
    NotActive,
    #[error("Encounter is not in draft")]
    NotDraft,
    #[error("Initiative incomplete: {missing} participant(s) have no roll")]
    IncompleteInitiative { missing: usize },
    #[error("GM role required")]
    Forbidden,
    #[error("Concurrent modification; refresh and retry")]
    Conflict,
    /// The participant snapshot was written but mirroring onto the source
    /// record failed; the caller retries only the mirror half.
    #[error("HP snapshot updated but source mirror failed")]
    MirrorFailed {
        change: HpChange,
        #[source]
        source: RepoError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
