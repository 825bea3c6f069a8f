//! NPC entity - GM-controlled actors with a flat stat line.

use serde::{Deserialize, Serialize};

use crate::value_objects::SkillBonuses;
use crate::NpcId;

/// A non-player character
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
    pub description: String,
    pub current_hp: i32,
    pub max_hp: i32,
    pub armor_class: i32,
    pub initiative_modifier: i32,
    pub skills: SkillBonuses,
    /// Names of abilities this NPC can use, as displayed to the GM
    pub abilities: Vec<String>,
}

impl Npc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NpcId::new(),
            name: name.into(),
            description: String::new(),
            current_hp: 10,
            max_hp: 10,
            armor_class: 10,
            initiative_modifier: 0,
            skills: SkillBonuses::default(),
            abilities: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_hp(mut self, current: i32, max: i32) -> Self {
        self.max_hp = max;
        self.current_hp = current.clamp(0, max);
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_skills(mut self, skills: SkillBonuses) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_ability(mut self, name: impl Into<String>) -> Self {
        self.abilities.push(name.into());
        self
    }

    /// Set current HP, clamped to `[0, max_hp]`.
    pub fn set_current_hp(&mut self, hp: i32) {
        self.current_hp = hp.clamp(0, self.max_hp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_is_clamped() {
        let mut npc = Npc::new("Razor Drone").with_hp(8, 8);
        npc.set_current_hp(-3);
        assert_eq!(npc.current_hp, 0);
        npc.set_current_hp(20);
        assert_eq!(npc.current_hp, 8);
    }
}
