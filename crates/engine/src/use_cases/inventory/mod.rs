//! Inventory use cases: acquiring items, the equip lifecycle, and
//! consumable accounting.

pub mod add_item;
pub mod error;
pub mod toggle_equip;
pub mod use_consumable;

pub use add_item::{AddItemOutcome, AddItemToInventory};
pub use error::InventoryError;
pub use toggle_equip::{EquipOutcome, ToggleEquip};
pub use use_consumable::{ConsumeResult, UseConsumable};
