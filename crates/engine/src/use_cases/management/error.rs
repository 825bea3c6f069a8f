//! Cascade deletion errors.

use sprawl_domain::DomainError;

use crate::infrastructure::ports::RepoError;

/// Errors from the explicit cascade deletions.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Ability not found")]
    AbilityNotFound,
    #[error("Item not found")]
    ItemNotFound,
    #[error("Not authorized")]
    Forbidden,
    /// The cascade stopped at `stage`; earlier stages already committed, so
    /// the caller resumes from the failed one.
    #[error("Cascade interrupted at stage '{stage}'")]
    CascadeInterrupted {
        stage: &'static str,
        #[source]
        source: RepoError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl ManagementError {
    pub(crate) fn at(stage: &'static str) -> impl FnOnce(RepoError) -> ManagementError {
        move |source| ManagementError::CascadeInterrupted { stage, source }
    }
}
