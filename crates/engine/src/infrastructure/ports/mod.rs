//! Port traits the application layer depends on.

pub mod clock;
pub mod error;
pub mod events;
pub mod repos;

pub use clock::{ClockPort, SystemClock};
pub use error::RepoError;
pub use events::{ChangeEvent, ChangeFeed};
pub use repos::{
    AbilityRepo, CharacterRepo, EncounterRepo, InventoryRepo, ItemRepo, NpcRepo,
};

#[cfg(test)]
pub use clock::MockClockPort;
#[cfg(test)]
pub use events::MockChangeFeed;
#[cfg(test)]
pub use repos::{
    MockAbilityRepo, MockCharacterRepo, MockEncounterRepo, MockInventoryRepo, MockItemRepo,
    MockNpcRepo,
};
