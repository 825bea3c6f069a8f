//! Repository port traits for storage access.
//!
//! The store behind these traits is opaque: a relational backend, a graph, or
//! the in-memory adapter. Two disciplines matter to callers:
//!
//! - Counter writes (`update_*_if`) are compare-and-swap: they succeed only
//!   when the stored value still equals `expected`, so concurrent writers
//!   cannot lose updates or drive counters negative. A `false` return means
//!   the caller's read is stale.
//! - `start_encounter` and `advance_turn` run atomically inside the adapter,
//!   so the draft->active flip (with order assignment) and the round
//!   wraparound cannot interleave with another writer.
//!
//! Adapters that talk to a remote store must bound every call with a timeout
//! and surface the failure; none of these methods may hang.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sprawl_domain::{
    Ability, AbilityId, Character, CharacterAbility, CharacterAbilityId, CharacterId, Encounter,
    EncounterId, EncounterParticipant, InventoryEntry, InventoryEntryId, Item, ItemAbilityLink,
    ItemId, Npc, NpcId, ParticipantId, UserId,
};

use super::error::RepoError;

// =============================================================================
// Character sheets
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Character>, RepoError>;

    /// Mirror write used by the encounter HP sync. Clamped by the adapter to
    /// the sheet's `[0, max_hp]`.
    async fn set_current_hp(&self, id: CharacterId, hp: i32) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NpcRepo: Send + Sync {
    async fn get(&self, id: NpcId) -> Result<Option<Npc>, RepoError>;
    async fn save(&self, npc: &Npc) -> Result<(), RepoError>;
    async fn delete(&self, id: NpcId) -> Result<(), RepoError>;

    /// Mirror write used by the encounter HP sync.
    async fn set_current_hp(&self, id: NpcId, hp: i32) -> Result<(), RepoError>;
}

// =============================================================================
// Items and ability links
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError>;
    async fn save(&self, item: &Item) -> Result<(), RepoError>;
    async fn delete(&self, id: ItemId) -> Result<(), RepoError>;

    // Item <-> Ability links
    async fn links_for_item(&self, item_id: ItemId) -> Result<Vec<ItemAbilityLink>, RepoError>;
    async fn links_for_ability(
        &self,
        ability_id: AbilityId,
    ) -> Result<Vec<ItemAbilityLink>, RepoError>;
    async fn save_link(&self, link: &ItemAbilityLink) -> Result<(), RepoError>;
    async fn delete_links_for_item(&self, item_id: ItemId) -> Result<u32, RepoError>;
    async fn delete_links_for_ability(&self, ability_id: AbilityId) -> Result<u32, RepoError>;
}

// =============================================================================
// Inventory
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    async fn get(&self, id: InventoryEntryId) -> Result<Option<InventoryEntry>, RepoError>;
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<InventoryEntry>, RepoError>;
    async fn save(&self, entry: &InventoryEntry) -> Result<(), RepoError>;
    async fn delete(&self, id: InventoryEntryId) -> Result<(), RepoError>;
    async fn delete_for_character(&self, character_id: CharacterId) -> Result<u32, RepoError>;

    /// Remove every entry referencing an item template; returns the removed
    /// entries so the caller can revoke the grants they sourced.
    async fn delete_for_item(&self, item_id: ItemId) -> Result<Vec<InventoryEntry>, RepoError>;

    /// Compare-and-swap on the consumable use counter. Returns false when the
    /// stored counter no longer equals `expected`.
    async fn update_uses_if(
        &self,
        id: InventoryEntryId,
        expected: Option<u32>,
        new_uses: u32,
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Abilities and grants
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AbilityRepo: Send + Sync {
    async fn get(&self, id: AbilityId) -> Result<Option<Ability>, RepoError>;
    async fn save(&self, ability: &Ability) -> Result<(), RepoError>;
    async fn delete(&self, id: AbilityId) -> Result<(), RepoError>;

    // Per-character grants
    async fn get_grant(
        &self,
        id: CharacterAbilityId,
    ) -> Result<Option<CharacterAbility>, RepoError>;
    async fn grants_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<CharacterAbility>, RepoError>;

    /// Insert a new grant. Fails with a constraint violation when a grant for
    /// the same (character, ability, source) already exists.
    async fn insert_grant(&self, grant: &CharacterAbility) -> Result<(), RepoError>;
    async fn save_grant(&self, grant: &CharacterAbility) -> Result<(), RepoError>;
    async fn delete_grant(&self, id: CharacterAbilityId) -> Result<(), RepoError>;

    /// Revoke every grant sourced from one inventory entry; returns how many
    /// rows went away.
    async fn delete_grants_for_entry(
        &self,
        character_id: CharacterId,
        entry_id: InventoryEntryId,
    ) -> Result<u32, RepoError>;
    async fn delete_grants_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<u32, RepoError>;
    async fn delete_grants_for_ability(&self, ability_id: AbilityId) -> Result<u32, RepoError>;

    /// Compare-and-swap on the charge counter. Returns false when the stored
    /// counter no longer equals `expected`.
    async fn update_charges_if(
        &self,
        id: CharacterAbilityId,
        expected: u32,
        new_charges: u32,
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Encounters
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EncounterRepo: Send + Sync {
    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>, RepoError>;
    async fn save(&self, encounter: &Encounter) -> Result<(), RepoError>;
    async fn delete(&self, id: EncounterId) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<Encounter>, RepoError>;

    // Participants. `participants` returns insertion order - the final
    // initiative tie-break - so adapters must preserve it.
    async fn get_participant(
        &self,
        id: ParticipantId,
    ) -> Result<Option<EncounterParticipant>, RepoError>;
    async fn participants(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Vec<EncounterParticipant>, RepoError>;
    async fn add_participant(&self, participant: &EncounterParticipant) -> Result<(), RepoError>;
    async fn save_participant(&self, participant: &EncounterParticipant) -> Result<(), RepoError>;
    async fn delete_participant(&self, id: ParticipantId) -> Result<(), RepoError>;
    async fn delete_participants(&self, encounter_id: EncounterId) -> Result<u32, RepoError>;

    /// Atomic draft->active flip: assigns every participant's
    /// `initiative_order`, sets round 1 / turn 1 and `started_at`. Fails with
    /// a constraint violation if the encounter is not draft or a roll is
    /// missing (the race-safe double check behind the use case's validation).
    async fn start_encounter(
        &self,
        id: EncounterId,
        now: DateTime<Utc>,
    ) -> Result<Encounter, RepoError>;

    /// Atomic turn advance with round wraparound.
    async fn advance_turn(&self, id: EncounterId) -> Result<Encounter, RepoError>;

    /// Compare-and-swap on the participant HP snapshot. Returns false when
    /// the stored value no longer equals `expected`.
    async fn update_participant_hp_if(
        &self,
        id: ParticipantId,
        expected: i32,
        new_hp: i32,
    ) -> Result<bool, RepoError>;
}
