//! Energy check-in: a self-reported mood that re-weights the duration formulas.
//!
//! The chosen multipliers persist on the timer aggregate until the next
//! check-in overwrites them.

use serde::{Deserialize, Serialize};

use crate::calculator::WeightMultipliers;

/// Weight applied to the emphasized term.
pub const ENERGY_WEIGHT_BOOST: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    /// Tired: fatigue counts for more, so focus shrinks and breaks grow.
    Drained,
    Neutral,
    /// Fresh: momentum counts for more, so focus grows.
    Energized,
}

impl EnergyLevel {
    pub fn multipliers(self) -> WeightMultipliers {
        match self {
            EnergyLevel::Drained => WeightMultipliers {
                momentum: 1.0,
                fatigue: ENERGY_WEIGHT_BOOST,
            },
            EnergyLevel::Neutral => WeightMultipliers::default(),
            EnergyLevel::Energized => WeightMultipliers {
                momentum: ENERGY_WEIGHT_BOOST,
                fatigue: 1.0,
            },
        }
    }
}

impl std::str::FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drained" | "pain" | "tired" => Ok(EnergyLevel::Drained),
            "neutral" | "meh" => Ok(EnergyLevel::Neutral),
            "energized" | "smile" | "fresh" => Ok(EnergyLevel::Energized),
            other => Err(format!("unknown energy level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drained_boosts_fatigue_only() {
        let w = EnergyLevel::Drained.multipliers();
        assert_eq!(w.fatigue, 1.5);
        assert_eq!(w.momentum, 1.0);
    }

    #[test]
    fn energized_boosts_momentum_only() {
        let w = EnergyLevel::Energized.multipliers();
        assert_eq!(w.momentum, 1.5);
        assert_eq!(w.fatigue, 1.0);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("meh".parse::<EnergyLevel>(), Ok(EnergyLevel::Neutral));
        assert_eq!("Energized".parse::<EnergyLevel>(), Ok(EnergyLevel::Energized));
        assert!("sleepy".parse::<EnergyLevel>().is_err());
    }
}
