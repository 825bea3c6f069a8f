//! Ability entity, the item/ability link, and the per-character grant.

use serde::{Deserialize, Serialize};

use crate::value_objects::{DiceFormula, RechargeRule, RestType};
use crate::{AbilityId, CharacterAbilityId, CharacterId, InventoryEntryId, ItemId};

/// Action economy slot an ability occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AbilityType {
    Action,
    BonusAction,
    Reaction,
    Passive,
    Utility,
    /// Unknown type for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Optional combat metadata on an ability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatProfile {
    pub damage: Option<DiceFormula>,
    pub range: Option<String>,
    pub area: Option<String>,
    pub duration: Option<String>,
}

/// An ability template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub ability_type: AbilityType,
    pub recharge: RechargeRule,
    /// Free-text effect lines, as shown on the sheet
    pub effects: Vec<String>,
    pub combat: Option<CombatProfile>,
}

impl Ability {
    pub fn new(name: impl Into<String>, ability_type: AbilityType, recharge: RechargeRule) -> Self {
        Self {
            id: AbilityId::new(),
            name: name.into(),
            ability_type,
            recharge,
            effects: Vec::new(),
            combat: None,
        }
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effects.push(effect.into());
        self
    }

    pub fn with_combat(mut self, combat: CombatProfile) -> Self {
        self.combat = Some(combat);
        self
    }
}

/// Links an item to an ability it conveys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAbilityLink {
    pub item_id: ItemId,
    pub ability_id: AbilityId,
    /// True: held only while the linking item is equipped.
    /// False: granted permanently when the item enters inventory.
    pub requires_equipped: bool,
}

/// Where a character ability came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceType", rename_all = "camelCase")]
pub enum AbilitySource {
    Class,
    Item { entry_id: InventoryEntryId },
    Temporary,
}

impl AbilitySource {
    /// The inventory entry that granted this ability, for item-sourced grants.
    pub fn granting_entry(&self) -> Option<InventoryEntryId> {
        match self {
            Self::Item { entry_id } => Some(*entry_id),
            _ => None,
        }
    }
}

/// A granted ability instance on a character, with its charge counter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAbility {
    pub id: CharacterAbilityId,
    pub character_id: CharacterId,
    pub ability_id: AbilityId,
    pub current_charges: u32,
    pub source: AbilitySource,
}

impl CharacterAbility {
    /// A fresh grant starts at the rule's full charge count (zero for
    /// infinite abilities, which track nothing).
    pub fn granted(character_id: CharacterId, ability: &Ability, source: AbilitySource) -> Self {
        Self {
            id: CharacterAbilityId::new(),
            character_id,
            ability_id: ability.id,
            current_charges: ability.recharge.initial_charges(),
            source,
        }
    }

    /// Apply a rest. Returns the number of charges actually regained after
    /// clamping to the rule's maximum.
    pub fn apply_rest(&mut self, rule: &RechargeRule, rest: RestType) -> u32 {
        let regained = rule.charges_regained(rest);
        if regained == 0 {
            return 0;
        }
        let before = self.current_charges;
        self.current_charges = (before + regained).min(rule.max_charges());
        self.current_charges - before
    }
}
