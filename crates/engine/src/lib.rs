//! Sprawl engine: application layer for the encounter tracker and the
//! equip/ability lifecycle.
//!
//! Use cases hold `Arc<dyn ...Repo>` ports; adapters (in-memory here, a
//! hosted backend in deployment) implement them. See `infrastructure::ports`
//! for the storage and change-feed contracts.

pub mod infrastructure;
pub mod session;
pub mod use_cases;

pub use session::{Role, Session};

#[cfg(test)]
mod e2e_tests;
