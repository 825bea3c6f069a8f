//! Numeric modifier bundle carried by items.

use serde::{Deserialize, Serialize};

use super::attributes::AttributeSet;
use super::skills::SkillBonuses;

/// The modifiers a piece of gear applies while it counts (equipped, for
/// equippable items). Missing fields deserialize to zero, and zero-valued
/// modifiers contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GearModifiers {
    pub attributes: AttributeSet,
    pub max_hp: i32,
    pub armor_class: i32,
    pub speed: i32,
    pub initiative: i32,
    pub implant_capacity: i32,
    pub skill_bonuses: SkillBonuses,
}

impl GearModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.max_hp = max_hp;
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_implant_capacity(mut self, implant_capacity: i32) -> Self {
        self.implant_capacity = implant_capacity;
        self
    }

    pub fn with_skill_bonuses(mut self, skill_bonuses: SkillBonuses) -> Self {
        self.skill_bonuses = skill_bonuses;
        self
    }

    /// Fold another modifier bundle into this one.
    pub fn combine(&mut self, other: &GearModifiers) {
        self.attributes += other.attributes;
        self.max_hp += other.max_hp;
        self.armor_class += other.armor_class;
        self.speed += other.speed;
        self.initiative += other.initiative;
        self.implant_capacity += other.implant_capacity;
        self.skill_bonuses.merge(&other.skill_bonuses);
    }

    /// Sum an arbitrary collection of modifier bundles.
    pub fn sum<'a>(bundles: impl IntoIterator<Item = &'a GearModifiers>) -> GearModifiers {
        let mut total = GearModifiers::new();
        for bundle in bundles {
            total.combine(bundle);
        }
        total
    }
}
