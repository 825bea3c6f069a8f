//! Skill names and skill bonus maps.
//!
//! Skill keys are validated against a closed vocabulary where data enters the
//! system (item editors, NPC stat lines). Aggregation code downstream can then
//! merge maps without re-validating.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// The closed skill vocabulary.
pub const SKILL_VOCABULARY: [&str; 12] = [
    "athletics",
    "brawling",
    "drive",
    "firearms",
    "hacking",
    "medtech",
    "melee",
    "perception",
    "persuasion",
    "stealth",
    "streetwise",
    "tech",
];

/// A validated skill key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillName(String);

impl SkillName {
    /// Validate a raw key against the vocabulary. Keys are case-insensitive.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if SKILL_VOCABULARY.contains(&normalized.as_str()) {
            Ok(Self(normalized))
        } else {
            Err(DomainError::parse(format!(
                "Unknown skill: '{}'",
                raw.as_ref()
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SkillName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Skill name -> signed bonus, with key-wise sum merge semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillBonuses(BTreeMap<SkillName, i32>);

impl SkillBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bonus for a skill; absent keys are zero.
    pub fn get(&self, skill: &SkillName) -> i32 {
        self.0.get(skill).copied().unwrap_or(0)
    }

    pub fn set(&mut self, skill: SkillName, bonus: i32) {
        self.0.insert(skill, bonus);
    }

    pub fn with(mut self, skill: SkillName, bonus: i32) -> Self {
        self.set(skill, bonus);
        self
    }

    /// Key-wise sum of another bonus map into this one.
    pub fn merge(&mut self, other: &SkillBonuses) {
        for (skill, bonus) in &other.0 {
            *self.0.entry(skill.clone()).or_insert(0) += bonus;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillName, i32)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}
