//! Character entity - a player-owned sheet.
//!
//! The sheet stores base HP/AC alongside the gear-derived effective values.
//! The equip flow recomputes the effective pair through the stat aggregator;
//! non-combat views read the effective pair directly. Stat edits outside
//! designated flows (gear recomputation, admin tooling) are an
//! application-layer concern; the entity only protects HP bounds.

use serde::{Deserialize, Serialize};

use crate::value_objects::{AttributeSet, BaseStats, EffectiveStats};
use crate::{CharacterId, UserId};

/// A player character sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    /// The player who owns this sheet
    pub user_id: UserId,
    pub name: String,
    pub class: String,
    pub level: u8,
    pub attributes: AttributeSet,
    /// Hit point maximum from the sheet alone, before gear
    pub base_max_hp: i32,
    /// Armor class from the sheet alone, before gear
    pub base_armor_class: i32,
    pub current_hp: i32,
    /// Effective maximum, kept in sync by the equip flow
    pub max_hp: i32,
    /// Effective armor class, kept in sync by the equip flow
    pub armor_class: i32,
    pub initiative_modifier: i32,
    /// Currency balance
    pub credits: i64,
}

impl Character {
    pub fn new(user_id: UserId, name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            user_id,
            name: name.into(),
            class: class.into(),
            level: 1,
            attributes: AttributeSet::default(),
            base_max_hp: 10,
            base_armor_class: 10,
            current_hp: 10,
            max_hp: 10,
            armor_class: 10,
            initiative_modifier: 0,
            credits: 0,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_hp(mut self, current: i32, max: i32) -> Self {
        self.base_max_hp = max;
        self.max_hp = max;
        self.current_hp = current.clamp(0, max);
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.base_armor_class = armor_class;
        self.armor_class = armor_class;
        self
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_credits(mut self, credits: i64) -> Self {
        self.credits = credits;
        self
    }

    /// Base stat line for aggregation. Speed and implant capacity have no
    /// base on the sheet; gear supplies them entirely.
    pub fn base_stats(&self) -> BaseStats {
        BaseStats {
            attributes: self.attributes,
            max_hp: self.base_max_hp,
            armor_class: self.base_armor_class,
            speed: 0,
            initiative_modifier: self.initiative_modifier,
            implant_capacity: 0,
        }
    }

    /// Set current HP, clamped to `[0, max_hp]`.
    pub fn set_current_hp(&mut self, hp: i32) {
        self.current_hp = hp.clamp(0, self.max_hp);
    }

    /// Persist a recomputed effective stat line onto the sheet. Current HP is
    /// clamped down if the new maximum falls below it, but never raised by a
    /// max increase.
    pub fn apply_effective(&mut self, stats: &EffectiveStats) {
        self.max_hp = stats.max_hp.max(0);
        self.armor_class = stats.armor_class;
        if self.current_hp > self.max_hp {
            self.current_hp = self.max_hp;
        }
    }
}
