//! Effective stat aggregation.
//!
//! Pure fold of equipped gear modifiers over a base stat line. Safe to call on
//! every refresh; no error conditions, missing values count as zero.

use serde::{Deserialize, Serialize};

use super::attributes::AttributeSet;
use super::gear::GearModifiers;
use super::skills::SkillBonuses;

/// The base stat line a character record carries before gear.
///
/// Bases the record does not model (speed, implant capacity) enter as zero and
/// surface in [`EffectiveStats`] as pure gear totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseStats {
    pub attributes: AttributeSet,
    pub max_hp: i32,
    pub armor_class: i32,
    pub speed: i32,
    pub initiative_modifier: i32,
    pub implant_capacity: i32,
}

/// Base plus the sum of all equipped gear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectiveStats {
    pub attributes: AttributeSet,
    pub max_hp: i32,
    pub armor_class: i32,
    pub speed: i32,
    pub initiative_modifier: i32,
    pub implant_capacity: i32,
    pub skill_bonuses: SkillBonuses,
}

/// Compute effective stats from a base line and the modifiers of every
/// currently-equipped inventory entry. Unequipped gear must not be passed in;
/// the caller selects the equipped subset.
pub fn compute_effective_stats<'a>(
    base: &BaseStats,
    equipped: impl IntoIterator<Item = &'a GearModifiers>,
) -> EffectiveStats {
    let total = GearModifiers::sum(equipped);
    EffectiveStats {
        attributes: base.attributes + total.attributes,
        max_hp: base.max_hp + total.max_hp,
        armor_class: base.armor_class + total.armor_class,
        speed: base.speed + total.speed,
        initiative_modifier: base.initiative_modifier + total.initiative,
        implant_capacity: base.implant_capacity + total.implant_capacity,
        skill_bonuses: total.skill_bonuses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{Attribute, SkillName};

    fn base() -> BaseStats {
        BaseStats {
            attributes: AttributeSet::new()
                .with(Attribute::Strength, 14)
                .with(Attribute::Dexterity, 12),
            max_hp: 30,
            armor_class: 12,
            speed: 0,
            initiative_modifier: 1,
            implant_capacity: 0,
        }
    }

    fn blade() -> GearModifiers {
        GearModifiers::new()
            .with_attributes(AttributeSet::new().with(Attribute::Strength, 2))
            .with_initiative(1)
    }

    fn vest() -> GearModifiers {
        GearModifiers::new().with_armor_class(3).with_max_hp(5)
    }

    fn deck() -> GearModifiers {
        GearModifiers::new().with_skill_bonuses(
            crate::value_objects::SkillBonuses::new()
                .with(SkillName::new("hacking").expect("skill"), 2),
        )
    }

    #[test]
    fn no_gear_yields_base() {
        let stats = compute_effective_stats(&base(), []);
        assert_eq!(stats.max_hp, 30);
        assert_eq!(stats.armor_class, 12);
        assert_eq!(stats.attributes.strength, 14);
        assert!(stats.skill_bonuses.is_empty());
    }

    #[test]
    fn equipped_gear_sums_onto_base() {
        let gear = [blade(), vest(), deck()];
        let stats = compute_effective_stats(&base(), gear.iter());
        assert_eq!(stats.attributes.strength, 16);
        assert_eq!(stats.max_hp, 35);
        assert_eq!(stats.armor_class, 15);
        assert_eq!(stats.initiative_modifier, 2);
        assert_eq!(
            stats
                .skill_bonuses
                .get(&SkillName::new("hacking").expect("skill")),
            2
        );
    }

    #[test]
    fn aggregation_is_order_independent() {
        let forward = [blade(), vest(), deck()];
        let reversed = [deck(), vest(), blade()];
        assert_eq!(
            compute_effective_stats(&base(), forward.iter()),
            compute_effective_stats(&base(), reversed.iter()),
        );
    }
}
