//! Inventory operation errors.

use sprawl_domain::DomainError;

use crate::infrastructure::ports::RepoError;

/// Errors that can occur during inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Item not found")]
    ItemNotFound,
    #[error("Inventory entry not found")]
    EntryNotFound,
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Item is not equippable")]
    NotEquippable,
    #[error("Item is not consumable")]
    NotConsumable,
    #[error("Not authorized to act for this character")]
    Forbidden,
    #[error("Concurrent modification; refresh and retry")]
    Conflict,
    /// The grant sequence stopped partway; `granted` abilities were written
    /// before the failure, so the caller retries only the remainder.
    #[error("Granted {granted} of {total} linked abilities before a write failed")]
    GrantInterrupted {
        granted: usize,
        total: usize,
        #[source]
        source: RepoError,
    },
    /// The use counter reached zero but the entry could not be removed.
    #[error("Entry depleted but removal failed")]
    RemovalFailed(#[source] RepoError),
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
