//! The six-attribute score block shared by characters and gear modifiers.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// One of the six core attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Wisdom,
    Intelligence,
    Charisma,
}

impl Attribute {
    /// All attributes in canonical order.
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Constitution,
        Attribute::Wisdom,
        Attribute::Intelligence,
        Attribute::Charisma,
    ];

    /// Conventional three-letter abbreviation.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Wisdom => "WIS",
            Self::Intelligence => "INT",
            Self::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// A full set of attribute scores.
///
/// Also used as a set of attribute *deltas* on gear, where each field is the
/// bonus (or penalty) the gear applies. Element-wise addition combines the two
/// readings: base scores + gear deltas = effective scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeSet {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub wisdom: i32,
    pub intelligence: i32,
    pub charisma: i32,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the score for a single attribute.
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Constitution => self.constitution,
            Attribute::Wisdom => self.wisdom,
            Attribute::Intelligence => self.intelligence,
            Attribute::Charisma => self.charisma,
        }
    }

    /// Set the score for a single attribute.
    pub fn set(&mut self, attribute: Attribute, value: i32) {
        match attribute {
            Attribute::Strength => self.strength = value,
            Attribute::Dexterity => self.dexterity = value,
            Attribute::Constitution => self.constitution = value,
            Attribute::Wisdom => self.wisdom = value,
            Attribute::Intelligence => self.intelligence = value,
            Attribute::Charisma => self.charisma = value,
        }
    }

    pub fn with(mut self, attribute: Attribute, value: i32) -> Self {
        self.set(attribute, value);
        self
    }

    /// Iterate scores in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        Attribute::ALL.iter().map(move |&a| (a, self.get(a)))
    }
}

impl Add for AttributeSet {
    type Output = AttributeSet;

    fn add(self, rhs: AttributeSet) -> AttributeSet {
        AttributeSet {
            strength: self.strength + rhs.strength,
            dexterity: self.dexterity + rhs.dexterity,
            constitution: self.constitution + rhs.constitution,
            wisdom: self.wisdom + rhs.wisdom,
            intelligence: self.intelligence + rhs.intelligence,
            charisma: self.charisma + rhs.charisma,
        }
    }
}

impl AddAssign for AttributeSet {
    fn add_assign(&mut self, rhs: AttributeSet) {
        *self = *self + rhs;
    }
}
