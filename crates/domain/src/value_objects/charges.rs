//! Charge models and rest restoration policy.

use serde::{Deserialize, Serialize};

/// Rest type for charge recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RestType {
    /// Short rest (typically 1 hour)
    Short,
    /// Long rest (typically 8 hours)
    Long,
}

/// How an ability's charges behave.
///
/// `charges_per_rest` is the amount regained per qualifying rest; absent means
/// a qualifying rest refills to `max_charges`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RechargeRule {
    /// Always available; no counter is tracked.
    Infinite,
    /// Recharges on a short rest (and therefore on a long rest too).
    ShortRest {
        max_charges: u32,
        charges_per_rest: Option<u32>,
    },
    /// Recharges only on a long rest.
    LongRest {
        max_charges: u32,
        charges_per_rest: Option<u32>,
    },
    /// Fixed pool, never restored by resting. Replenished only by GM action.
    Uses { max_charges: u32 },
}

impl RechargeRule {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Upper bound for the stored counter. Infinite abilities track nothing.
    pub fn max_charges(&self) -> u32 {
        match self {
            Self::Infinite => 0,
            Self::ShortRest { max_charges, .. }
            | Self::LongRest { max_charges, .. }
            | Self::Uses { max_charges } => *max_charges,
        }
    }

    /// Charges a fresh grant starts with.
    pub fn initial_charges(&self) -> u32 {
        self.max_charges()
    }

    /// How many charges a rest of the given type grants, before clamping to
    /// the maximum. Zero when the rest does not qualify.
    pub fn charges_regained(&self, rest: RestType) -> u32 {
        match self {
            Self::Infinite | Self::Uses { .. } => 0,
            Self::ShortRest {
                max_charges,
                charges_per_rest,
            } => charges_per_rest.unwrap_or(*max_charges),
            Self::LongRest {
                max_charges,
                charges_per_rest,
            } => match rest {
                RestType::Long => charges_per_rest.unwrap_or(*max_charges),
                RestType::Short => 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rest_rule_restores_on_either_rest() {
        let rule = RechargeRule::ShortRest {
            max_charges: 3,
            charges_per_rest: None,
        };
        assert_eq!(rule.charges_regained(RestType::Short), 3);
        assert_eq!(rule.charges_regained(RestType::Long), 3);
    }

    #[test]
    fn long_rest_rule_ignores_short_rests() {
        let rule = RechargeRule::LongRest {
            max_charges: 3,
            charges_per_rest: Some(1),
        };
        assert_eq!(rule.charges_regained(RestType::Short), 0);
        assert_eq!(rule.charges_regained(RestType::Long), 1);
    }

    #[test]
    fn uses_rule_never_rest_restores() {
        let rule = RechargeRule::Uses { max_charges: 5 };
        assert_eq!(rule.charges_regained(RestType::Short), 0);
        assert_eq!(rule.charges_regained(RestType::Long), 0);
    }

    #[test]
    fn infinite_tracks_no_counter() {
        assert_eq!(RechargeRule::Infinite.max_charges(), 0);
        assert_eq!(RechargeRule::Infinite.initial_charges(), 0);
        assert_eq!(RechargeRule::Infinite.charges_regained(RestType::Long), 0);
    }
}
