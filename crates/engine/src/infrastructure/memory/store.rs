//! In-memory storage adapter for development, tests, and the demo binary.
//!
//! Atomicity comes from DashMap's per-entry locking: every CAS method and the
//! two encounter procedures do their read-check-write while holding the row's
//! shard guard. Lock order across maps is encounters -> rosters ->
//! participants; no method acquires them in the reverse direction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use sprawl_domain::{
    initiative_ranking, Ability, AbilityId, Character, CharacterAbility, CharacterAbilityId,
    CharacterId, Encounter, EncounterId, EncounterParticipant, InventoryEntry, InventoryEntryId,
    Item, ItemAbilityLink, ItemId, Npc, NpcId, ParticipantId, UserId,
};

use crate::infrastructure::ports::{
    AbilityRepo, CharacterRepo, EncounterRepo, InventoryRepo, ItemRepo, NpcRepo, RepoError,
};

/// One store backing every repository port.
#[derive(Default)]
pub struct MemoryStore {
    characters: DashMap<CharacterId, Character>,
    npcs: DashMap<NpcId, Npc>,
    items: DashMap<ItemId, Item>,
    links: DashMap<ItemId, Vec<ItemAbilityLink>>,
    entries: DashMap<InventoryEntryId, InventoryEntry>,
    abilities: DashMap<AbilityId, Ability>,
    grants: DashMap<CharacterAbilityId, CharacterAbility>,
    encounters: DashMap<EncounterId, Encounter>,
    participants: DashMap<ParticipantId, EncounterParticipant>,
    /// Insertion-ordered participant ids per encounter (the ranking tie-break)
    rosters: DashMap<EncounterId, Vec<ParticipantId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepo for MemoryStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.get(&id).map(|c| c.clone()))
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters.insert(character.id, character.clone());
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        self.characters
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Character", id))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Character>, RepoError> {
        Ok(self
            .characters
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.clone())
            .collect())
    }

    async fn set_current_hp(&self, id: CharacterId, hp: i32) -> Result<(), RepoError> {
        let mut character = self
            .characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        character.set_current_hp(hp);
        Ok(())
    }
}

#[async_trait]
impl NpcRepo for MemoryStore {
    async fn get(&self, id: NpcId) -> Result<Option<Npc>, RepoError> {
        Ok(self.npcs.get(&id).map(|n| n.clone()))
    }

    async fn save(&self, npc: &Npc) -> Result<(), RepoError> {
        self.npcs.insert(npc.id, npc.clone());
        Ok(())
    }

    async fn delete(&self, id: NpcId) -> Result<(), RepoError> {
        self.npcs
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Npc", id))
    }

    async fn set_current_hp(&self, id: NpcId, hp: i32) -> Result<(), RepoError> {
        let mut npc = self
            .npcs
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Npc", id))?;
        npc.set_current_hp(hp);
        Ok(())
    }
}

#[async_trait]
impl ItemRepo for MemoryStore {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        Ok(self.items.get(&id).map(|i| i.clone()))
    }

    async fn save(&self, item: &Item) -> Result<(), RepoError> {
        self.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), RepoError> {
        self.items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Item", id))
    }

    async fn links_for_item(&self, item_id: ItemId) -> Result<Vec<ItemAbilityLink>, RepoError> {
        Ok(self
            .links
            .get(&item_id)
            .map(|l| l.clone())
            .unwrap_or_default())
    }

    async fn links_for_ability(
        &self,
        ability_id: AbilityId,
    ) -> Result<Vec<ItemAbilityLink>, RepoError> {
        Ok(self
            .links
            .iter()
            .flat_map(|l| l.clone())
            .filter(|l| l.ability_id == ability_id)
            .collect())
    }

    async fn save_link(&self, link: &ItemAbilityLink) -> Result<(), RepoError> {
        let mut links = self.links.entry(link.item_id).or_default();
        if let Some(existing) = links
            .iter_mut()
            .find(|l| l.ability_id == link.ability_id)
        {
            *existing = *link;
        } else {
            links.push(*link);
        }
        Ok(())
    }

    async fn delete_links_for_item(&self, item_id: ItemId) -> Result<u32, RepoError> {
        Ok(self
            .links
            .remove(&item_id)
            .map(|(_, l)| l.len() as u32)
            .unwrap_or(0))
    }

    async fn delete_links_for_ability(&self, ability_id: AbilityId) -> Result<u32, RepoError> {
        let mut removed = 0;
        for mut links in self.links.iter_mut() {
            let before = links.len();
            links.retain(|l| l.ability_id != ability_id);
            removed += (before - links.len()) as u32;
        }
        Ok(removed)
    }
}

#[async_trait]
impl InventoryRepo for MemoryStore {
    async fn get(&self, id: InventoryEntryId) -> Result<Option<InventoryEntry>, RepoError> {
        Ok(self.entries.get(&id).map(|e| e.clone()))
    }

    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<InventoryEntry>, RepoError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.character_id == character_id)
            .map(|e| e.clone())
            .collect())
    }

    async fn save(&self, entry: &InventoryEntry) -> Result<(), RepoError> {
        self.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn delete(&self, id: InventoryEntryId) -> Result<(), RepoError> {
        self.entries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("InventoryEntry", id))
    }

    async fn delete_for_character(&self, character_id: CharacterId) -> Result<u32, RepoError> {
        let ids: Vec<InventoryEntryId> = self
            .entries
            .iter()
            .filter(|e| e.character_id == character_id)
            .map(|e| e.id)
            .collect();
        for id in &ids {
            self.entries.remove(id);
        }
        Ok(ids.len() as u32)
    }

    async fn delete_for_item(&self, item_id: ItemId) -> Result<Vec<InventoryEntry>, RepoError> {
        let ids: Vec<InventoryEntryId> = self
            .entries
            .iter()
            .filter(|e| e.item_id == item_id)
            .map(|e| e.id)
            .collect();
        let mut removed = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some((_, entry)) = self.entries.remove(id) {
                removed.push(entry);
            }
        }
        Ok(removed)
    }

    async fn update_uses_if(
        &self,
        id: InventoryEntryId,
        expected: Option<u32>,
        new_uses: u32,
    ) -> Result<bool, RepoError> {
        let mut entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("InventoryEntry", id))?;
        if entry.current_uses != expected {
            return Ok(false);
        }
        entry.current_uses = Some(new_uses);
        Ok(true)
    }
}

#[async_trait]
impl AbilityRepo for MemoryStore {
    async fn get(&self, id: AbilityId) -> Result<Option<Ability>, RepoError> {
        Ok(self.abilities.get(&id).map(|a| a.clone()))
    }

    async fn save(&self, ability: &Ability) -> Result<(), RepoError> {
        self.abilities.insert(ability.id, ability.clone());
        Ok(())
    }

    async fn delete(&self, id: AbilityId) -> Result<(), RepoError> {
        self.abilities
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Ability", id))
    }

    async fn get_grant(
        &self,
        id: CharacterAbilityId,
    ) -> Result<Option<CharacterAbility>, RepoError> {
        Ok(self.grants.get(&id).map(|g| g.clone()))
    }

    async fn grants_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<CharacterAbility>, RepoError> {
        Ok(self
            .grants
            .iter()
            .filter(|g| g.character_id == character_id)
            .map(|g| g.clone())
            .collect())
    }

    async fn insert_grant(&self, grant: &CharacterAbility) -> Result<(), RepoError> {
        let duplicate = self.grants.iter().any(|g| {
            g.character_id == grant.character_id
                && g.ability_id == grant.ability_id
                && g.source == grant.source
        });
        if duplicate {
            return Err(RepoError::constraint(format!(
                "grant already exists for character {} ability {}",
                grant.character_id, grant.ability_id
            )));
        }
        self.grants.insert(grant.id, grant.clone());
        Ok(())
    }

    async fn save_grant(&self, grant: &CharacterAbility) -> Result<(), RepoError> {
        self.grants.insert(grant.id, grant.clone());
        Ok(())
    }

    async fn delete_grant(&self, id: CharacterAbilityId) -> Result<(), RepoError> {
        self.grants
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("CharacterAbility", id))
    }

    async fn delete_grants_for_entry(
        &self,
        character_id: CharacterId,
        entry_id: InventoryEntryId,
    ) -> Result<u32, RepoError> {
        let ids: Vec<CharacterAbilityId> = self
            .grants
            .iter()
            .filter(|g| {
                g.character_id == character_id && g.source.granting_entry() == Some(entry_id)
            })
            .map(|g| g.id)
            .collect();
        for id in &ids {
            self.grants.remove(id);
        }
        Ok(ids.len() as u32)
    }

    async fn delete_grants_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<u32, RepoError> {
        let ids: Vec<CharacterAbilityId> = self
            .grants
            .iter()
            .filter(|g| g.character_id == character_id)
            .map(|g| g.id)
            .collect();
        for id in &ids {
            self.grants.remove(id);
        }
        Ok(ids.len() as u32)
    }

    async fn delete_grants_for_ability(&self, ability_id: AbilityId) -> Result<u32, RepoError> {
        let ids: Vec<CharacterAbilityId> = self
            .grants
            .iter()
            .filter(|g| g.ability_id == ability_id)
            .map(|g| g.id)
            .collect();
        for id in &ids {
            self.grants.remove(id);
        }
        Ok(ids.len() as u32)
    }

    async fn update_charges_if(
        &self,
        id: CharacterAbilityId,
        expected: u32,
        new_charges: u32,
    ) -> Result<bool, RepoError> {
        let mut grant = self
            .grants
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("CharacterAbility", id))?;
        if grant.current_charges != expected {
            return Ok(false);
        }
        grant.current_charges = new_charges;
        Ok(true)
    }
}

#[async_trait]
impl EncounterRepo for MemoryStore {
    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>, RepoError> {
        Ok(self.encounters.get(&id).map(|e| e.clone()))
    }

    async fn save(&self, encounter: &Encounter) -> Result<(), RepoError> {
        self.encounters.insert(encounter.id, encounter.clone());
        Ok(())
    }

    async fn delete(&self, id: EncounterId) -> Result<(), RepoError> {
        self.encounters
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Encounter", id))
    }

    async fn list(&self) -> Result<Vec<Encounter>, RepoError> {
        Ok(self.encounters.iter().map(|e| e.clone()).collect())
    }

    async fn get_participant(
        &self,
        id: ParticipantId,
    ) -> Result<Option<EncounterParticipant>, RepoError> {
        Ok(self.participants.get(&id).map(|p| p.clone()))
    }

    async fn participants(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Vec<EncounterParticipant>, RepoError> {
        let roster = self
            .rosters
            .get(&encounter_id)
            .map(|r| r.clone())
            .unwrap_or_default();
        Ok(roster
            .iter()
            .filter_map(|id| self.participants.get(id).map(|p| p.clone()))
            .collect())
    }

    async fn add_participant(&self, participant: &EncounterParticipant) -> Result<(), RepoError> {
        if !self.encounters.contains_key(&participant.encounter_id) {
            return Err(RepoError::not_found(
                "Encounter",
                participant.encounter_id,
            ));
        }
        self.rosters
            .entry(participant.encounter_id)
            .or_default()
            .push(participant.id);
        self.participants.insert(participant.id, participant.clone());
        Ok(())
    }

    async fn save_participant(&self, participant: &EncounterParticipant) -> Result<(), RepoError> {
        if !self.participants.contains_key(&participant.id) {
            return Err(RepoError::not_found("Participant", participant.id));
        }
        self.participants.insert(participant.id, participant.clone());
        Ok(())
    }

    async fn delete_participant(&self, id: ParticipantId) -> Result<(), RepoError> {
        let (_, participant) = self
            .participants
            .remove(&id)
            .ok_or_else(|| RepoError::not_found("Participant", id))?;
        if let Some(mut roster) = self.rosters.get_mut(&participant.encounter_id) {
            roster.retain(|pid| *pid != id);
        }
        Ok(())
    }

    async fn delete_participants(&self, encounter_id: EncounterId) -> Result<u32, RepoError> {
        let roster = self
            .rosters
            .remove(&encounter_id)
            .map(|(_, r)| r)
            .unwrap_or_default();
        for id in &roster {
            self.participants.remove(id);
        }
        Ok(roster.len() as u32)
    }

    async fn start_encounter(
        &self,
        id: EncounterId,
        now: DateTime<Utc>,
    ) -> Result<Encounter, RepoError> {
        let mut encounter = self
            .encounters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Encounter", id))?;
        let roster = self.rosters.get(&id).map(|r| r.clone()).unwrap_or_default();
        let members: Vec<EncounterParticipant> = roster
            .iter()
            .filter_map(|pid| self.participants.get(pid).map(|p| p.clone()))
            .collect();
        let ranking =
            initiative_ranking(&members).map_err(|e| RepoError::constraint(e.to_string()))?;
        encounter
            .begin(now)
            .map_err(|e| RepoError::constraint(e.to_string()))?;
        for (index, pid) in ranking.iter().enumerate() {
            if let Some(mut participant) = self.participants.get_mut(pid) {
                participant.initiative_order = Some(index as u32 + 1);
            }
        }
        Ok(encounter.clone())
    }

    async fn advance_turn(&self, id: EncounterId) -> Result<Encounter, RepoError> {
        let mut encounter = self
            .encounters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Encounter", id))?;
        let count = self
            .rosters
            .get(&id)
            .map(|r| r.len() as u32)
            .unwrap_or(0);
        encounter
            .advance(count)
            .map_err(|e| RepoError::constraint(e.to_string()))?;
        Ok(encounter.clone())
    }

    async fn update_participant_hp_if(
        &self,
        id: ParticipantId,
        expected: i32,
        new_hp: i32,
    ) -> Result<bool, RepoError> {
        let mut participant = self
            .participants
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Participant", id))?;
        if participant.current_hp != expected {
            return Ok(false);
        }
        participant.current_hp = new_hp.clamp(0, participant.max_hp);
        Ok(true)
    }
}
