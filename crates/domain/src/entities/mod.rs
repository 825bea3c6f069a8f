pub mod ability;
pub mod character;
pub mod encounter;
pub mod item;
pub mod npc;

pub use ability::{
    Ability, AbilitySource, AbilityType, CharacterAbility, CombatProfile, ItemAbilityLink,
};
pub use character::Character;
pub use encounter::{
    initiative_ranking, Encounter, EncounterParticipant, EncounterStatus, HpChange,
    ParticipantSource, ParticipantType, TurnPosition,
};
pub use item::{ConsumeOutcome, InventoryEntry, Item, ItemType, Rarity};
pub use npc::Npc;
