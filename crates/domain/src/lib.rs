extern crate self as sprawl_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    initiative_ranking, Ability, AbilitySource, AbilityType, Character, CharacterAbility,
    CombatProfile, ConsumeOutcome, Encounter, EncounterParticipant, EncounterStatus, HpChange,
    InventoryEntry, Item, ItemAbilityLink, ItemType, Npc, ParticipantSource, ParticipantType,
    Rarity, TurnPosition,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{
    AbilityId, CharacterAbilityId, CharacterId, EncounterId, InventoryEntryId, ItemId, NpcId,
    ParticipantId, UserId,
};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    compute_effective_stats, Attribute, AttributeSet, BaseStats, DiceFormula, DiceParseError,
    EffectiveStats, GearModifiers, RechargeRule, RestType, RollOutcome, SkillBonuses, SkillName,
    SKILL_VOCABULARY,
};
