//! Item entity - gear templates and the inventory edge that binds them to a
//! character.
//!
//! Items carry no per-instance state; everything instance-scoped (quantity,
//! equipped flag, remaining uses) lives on [`InventoryEntry`].

use serde::{Deserialize, Serialize};

use crate::value_objects::GearModifiers;
use crate::{CharacterId, InventoryEntryId, ItemId};

/// Broad item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    Cyberware,
    Generic,
    MissionItem,
    /// Unknown type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weapon => write!(f, "Weapon"),
            Self::Armor => write!(f, "Armor"),
            Self::Consumable => write!(f, "Consumable"),
            Self::Cyberware => write!(f, "Cyberware"),
            Self::Generic => write!(f, "Generic"),
            Self::MissionItem => write!(f, "MissionItem"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Weapon" => Ok(Self::Weapon),
            "Armor" => Ok(Self::Armor),
            "Consumable" => Ok(Self::Consumable),
            "Cyberware" => Ok(Self::Cyberware),
            "Generic" => Ok(Self::Generic),
            "MissionItem" => Ok(Self::MissionItem),
            _ => Ok(Self::Unknown),
        }
    }
}

/// Rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Common => write!(f, "Common"),
            Self::Uncommon => write!(f, "Uncommon"),
            Self::Rare => write!(f, "Rare"),
            Self::Epic => write!(f, "Epic"),
            Self::Legendary => write!(f, "Legendary"),
        }
    }
}

/// A gear template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub price: i64,
    /// Modifiers applied while the item counts toward stats
    pub modifiers: GearModifiers,
    pub is_consumable: bool,
    pub is_equippable: bool,
    /// Uses per stack for consumables; also the merge limit for stacking
    pub stack_size: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            item_type,
            rarity: Rarity::Common,
            price: 0,
            modifiers: GearModifiers::default(),
            is_consumable: matches!(item_type, ItemType::Consumable),
            is_equippable: matches!(
                item_type,
                ItemType::Weapon | ItemType::Armor | ItemType::Cyberware
            ),
            stack_size: 1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    pub fn with_modifiers(mut self, modifiers: GearModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn equippable(mut self, equippable: bool) -> Self {
        self.is_equippable = equippable;
        self
    }

    pub fn consumable(mut self, stack_size: u32) -> Self {
        self.is_consumable = true;
        self.stack_size = stack_size.max(1);
        self
    }
}

/// What happened to a consumable use counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Uses remain after the decrement
    Remaining(u32),
    /// The counter reached zero; the entry should be removed
    Depleted,
}

/// The possession edge between a character and an item template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub id: InventoryEntryId,
    pub character_id: CharacterId,
    pub item_id: ItemId,
    pub quantity: u32,
    pub is_equipped: bool,
    /// Remaining uses; meaningful only for consumables. `None` until the
    /// first use, which initializes it from the item's stack size.
    pub current_uses: Option<u32>,
}

impl InventoryEntry {
    pub fn new(character_id: CharacterId, item_id: ItemId, quantity: u32) -> Self {
        Self {
            id: InventoryEntryId::new(),
            character_id,
            item_id,
            quantity: quantity.max(1),
            is_equipped: false,
            current_uses: None,
        }
    }

    /// Decrement the use counter, initializing it from `stack_size` on first
    /// use. Returns what is left.
    pub fn consume_use(&mut self, stack_size: u32) -> ConsumeOutcome {
        let available = self.current_uses.unwrap_or(stack_size.max(1));
        let remaining = available.saturating_sub(1);
        self.current_uses = Some(remaining);
        if remaining == 0 {
            ConsumeOutcome::Depleted
        } else {
            ConsumeOutcome::Remaining(remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_defaults_drive_flags() {
        assert!(Item::new("Mono-katana", ItemType::Weapon).is_equippable);
        assert!(!Item::new("Mono-katana", ItemType::Weapon).is_consumable);
        assert!(Item::new("Stim Patch", ItemType::Consumable).is_consumable);
        assert!(!Item::new("Datashard", ItemType::MissionItem).is_equippable);
    }

    #[test]
    fn unknown_item_type_round_trips_through_serde() {
        let parsed: ItemType =
            serde_json::from_str("\"hoverboard\"").expect("forward-compatible variant");
        assert_eq!(parsed, ItemType::Unknown);
    }

    #[test]
    fn first_use_initializes_from_stack_size() {
        let mut entry = InventoryEntry::new(CharacterId::new(), ItemId::new(), 1);
        assert_eq!(entry.consume_use(3), ConsumeOutcome::Remaining(2));
        assert_eq!(entry.current_uses, Some(2));
    }

    #[test]
    fn depletion_is_reported_at_zero() {
        let mut entry = InventoryEntry::new(CharacterId::new(), ItemId::new(), 1);
        entry.current_uses = Some(1);
        assert_eq!(entry.consume_use(3), ConsumeOutcome::Depleted);
    }

    #[test]
    fn single_use_consumable_depletes_immediately() {
        let mut entry = InventoryEntry::new(CharacterId::new(), ItemId::new(), 1);
        assert_eq!(entry.consume_use(1), ConsumeOutcome::Depleted);
    }
}
