//! Dice formula value object for damage expressions.
//!
//! Supports formulas like "1d20+5", "2d6-1", "d8".

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY or XdY+Z
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
}

/// A parsed dice formula like "2d6+3"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Size of each die (Y in XdY)
    pub die_size: u8,
    /// Modifier to add/subtract after rolling (+Z or -Z)
    pub modifier: i32,
}

impl DiceFormula {
    pub fn new(dice_count: u8, die_size: u8, modifier: i32) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self {
            dice_count,
            die_size,
            modifier,
        })
    }

    /// Parse a formula string. "dY" is shorthand for "1dY".
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let count_str = &input[..d_pos];
        let dice_count: u8 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
            })?
        };

        let rest = &input[d_pos + 1..];
        let split_at = rest[1..]
            .find(|c: char| c == '+' || c == '-')
            .map(|i| i + 1);
        let (size_str, modifier) = match split_at {
            Some(pos) => {
                let modifier: i32 = rest[pos..].parse().map_err(|_| {
                    DiceParseError::InvalidFormat(format!("Invalid modifier: '{}'", &rest[pos..]))
                })?;
                (&rest[..pos], modifier)
            }
            None => (rest, 0),
        };

        let die_size: u8 = size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", size_str))
        })?;

        Self::new(dice_count, die_size, modifier)
    }

    /// Roll the formula.
    pub fn roll(&self) -> RollOutcome {
        let mut rng = rand::thread_rng();
        let rolls: Vec<i32> = (0..self.dice_count)
            .map(|_| rng.gen_range(1..=self.die_size as i32))
            .collect();
        let total = rolls.iter().sum::<i32>() + self.modifier;
        RollOutcome { rolls, total }
    }

    /// Minimum possible total.
    pub fn min_roll(&self) -> i32 {
        self.dice_count as i32 + self.modifier
    }

    /// Maximum possible total.
    pub fn max_roll(&self) -> i32 {
        (self.dice_count as i32 * self.die_size as i32) + self.modifier
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier == 0 {
            write!(f, "{}d{}", self.dice_count, self.die_size)
        } else if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.dice_count, self.die_size, self.modifier)
        } else {
            write!(f, "{}d{}{}", self.dice_count, self.die_size, self.modifier)
        }
    }
}

/// Result of rolling a formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOutcome {
    /// Individual die results
    pub rolls: Vec<i32>,
    /// Final total including the modifier
    pub total: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_formula() {
        let formula = DiceFormula::parse("2d6").expect("valid formula");
        assert_eq!(formula.dice_count, 2);
        assert_eq!(formula.die_size, 6);
        assert_eq!(formula.modifier, 0);
    }

    #[test]
    fn parses_positive_and_negative_modifiers() {
        assert_eq!(
            DiceFormula::parse("1d20+5").expect("valid formula").modifier,
            5
        );
        assert_eq!(
            DiceFormula::parse("2d6-1").expect("valid formula").modifier,
            -1
        );
    }

    #[test]
    fn shorthand_means_one_die() {
        let formula = DiceFormula::parse("d8").expect("valid formula");
        assert_eq!(formula.dice_count, 1);
        assert_eq!(formula.die_size, 8);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(DiceFormula::parse(""), Err(DiceParseError::Empty));
        assert!(matches!(
            DiceFormula::parse("sword"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert_eq!(
            DiceFormula::parse("0d6"),
            Err(DiceParseError::InvalidDiceCount)
        );
        assert_eq!(
            DiceFormula::parse("2d1"),
            Err(DiceParseError::InvalidDieSize)
        );
    }

    #[test]
    fn roll_stays_in_bounds() {
        let formula = DiceFormula::parse("3d6+2").expect("valid formula");
        for _ in 0..100 {
            let outcome = formula.roll();
            assert_eq!(outcome.rolls.len(), 3);
            assert!(outcome.total >= formula.min_roll());
            assert!(outcome.total <= formula.max_roll());
        }
    }

    #[test]
    fn display_round_trips() {
        for text in ["2d6", "1d20+5", "4d4-2"] {
            let formula = DiceFormula::parse(text).expect("valid formula");
            assert_eq!(formula.to_string(), text);
        }
    }
}
