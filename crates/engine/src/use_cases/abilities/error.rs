//! Ability ledger operation errors.

use sprawl_domain::DomainError;

use crate::infrastructure::ports::RepoError;

/// Errors that can occur while spending or restoring ability charges.
#[derive(Debug, thiserror::Error)]
pub enum AbilityError {
    #[error("Ability not found")]
    AbilityNotFound,
    #[error("Granted ability not found")]
    GrantNotFound,
    #[error("Character not found")]
    CharacterNotFound,
    #[error("No charges remaining")]
    NoChargesRemaining,
    #[error("Not authorized to act for this character")]
    Forbidden,
    #[error("Concurrent modification; refresh and retry")]
    Conflict,
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
