//! Reward tiers
//!
//! Final session accuracy maps to a discrete bonus. Accuracy is compared as a
//! truncated integer percentage so that 89.999% is still 89.

use std::fmt;

use serde::{Deserialize, Serialize};
use stretchform_core::{ConfigError, ConfigResult};

/// Bonus tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    None,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::None => "none",
            Tier::Fair => "fair",
            Tier::Good => "good",
            Tier::Excellent => "excellent",
        };
        f.write_str(name)
    }
}

/// Tier plus the points it awards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bonus {
    pub tier: Tier,
    pub points: u32,
}

/// Lower edge (inclusive) and award of one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub min_percent: u8,
    pub points: u32,
}

/// Accuracy thresholds for each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    pub excellent: TierBand,
    pub good: TierBand,
    pub fair: TierBand,
}

impl Default for RewardTable {
    fn default() -> Self {
        RewardTable {
            excellent: TierBand {
                min_percent: 90,
                points: 20,
            },
            good: TierBand {
                min_percent: 75,
                points: 10,
            },
            fair: TierBand {
                min_percent: 60,
                points: 5,
            },
        }
    }
}

impl RewardTable {
    /// Check the bands are ordered and within 0..=100
    pub fn validate(&self) -> ConfigResult<()> {
        if self.excellent.min_percent > 100 {
            return Err(ConfigError::InvalidThreshold {
                name: "excellent.min_percent",
                value: f64::from(self.excellent.min_percent),
            });
        }
        let ordered = self.fair.min_percent < self.good.min_percent
            && self.good.min_percent < self.excellent.min_percent;
        let rewarding = self.fair.points <= self.good.points
            && self.good.points <= self.excellent.points;
        if !ordered || !rewarding {
            return Err(ConfigError::NonMonotonicTiers);
        }
        Ok(())
    }

    /// Bonus for a truncated integer percentage
    pub fn bonus_for_percent(&self, percent: u8) -> Bonus {
        let (tier, band) = if percent >= self.excellent.min_percent {
            (Tier::Excellent, Some(self.excellent))
        } else if percent >= self.good.min_percent {
            (Tier::Good, Some(self.good))
        } else if percent >= self.fair.min_percent {
            (Tier::Fair, Some(self.fair))
        } else {
            (Tier::None, None)
        };

        Bonus {
            tier,
            points: band.map_or(0, |b| b.points),
        }
    }

    /// Bonus for an accuracy percentage in [0, 100]
    pub fn bonus(&self, accuracy_percent: f64) -> Bonus {
        self.bonus_for_percent(truncate_percent(accuracy_percent))
    }
}

/// Truncate a percentage to an integer in 0..=100. NaN counts as 0.
pub fn truncate_percent(accuracy_percent: f64) -> u8 {
    if accuracy_percent.is_nan() || accuracy_percent <= 0.0 {
        0
    } else if accuracy_percent >= 100.0 {
        100
    } else {
        accuracy_percent.trunc() as u8
    }
}

/// Bonus for an accuracy percentage using the default tiers
pub fn bonus(accuracy_percent: f64) -> Bonus {
    RewardTable::default().bonus(accuracy_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_tiers() {
        assert_eq!(bonus(95.0), Bonus { tier: Tier::Excellent, points: 20 });
        assert_eq!(bonus(90.0), Bonus { tier: Tier::Excellent, points: 20 });
        assert_eq!(bonus(89.0), Bonus { tier: Tier::Good, points: 10 });
        assert_eq!(bonus(75.0), Bonus { tier: Tier::Good, points: 10 });
        assert_eq!(bonus(74.0), Bonus { tier: Tier::Fair, points: 5 });
        assert_eq!(bonus(60.0), Bonus { tier: Tier::Fair, points: 5 });
        assert_eq!(bonus(59.0), Bonus { tier: Tier::None, points: 0 });
        assert_eq!(bonus(0.0), Bonus { tier: Tier::None, points: 0 });
    }

    #[test]
    fn test_boundary_flicker_is_truncated() {
        assert_eq!(bonus(89.999).tier, Tier::Good);
        assert_eq!(bonus(74.9999).tier, Tier::Fair);
        assert_eq!(bonus(59.99).tier, Tier::None);
    }

    #[test]
    fn test_truncate_percent_edges() {
        assert_eq!(truncate_percent(f64::NAN), 0);
        assert_eq!(truncate_percent(-3.0), 0);
        assert_eq!(truncate_percent(250.0), 100);
        assert_eq!(truncate_percent(f64::INFINITY), 100);
        assert_eq!(truncate_percent(42.9), 42);
    }

    #[test]
    fn test_validate() {
        assert!(RewardTable::default().validate().is_ok());

        let mut table = RewardTable::default();
        table.good.min_percent = 95;
        assert!(matches!(table.validate(), Err(ConfigError::NonMonotonicTiers)));

        let mut table = RewardTable::default();
        table.fair.points = 50;
        assert!(matches!(table.validate(), Err(ConfigError::NonMonotonicTiers)));

        let mut table = RewardTable::default();
        table.excellent.min_percent = 101;
        assert!(matches!(table.validate(), Err(ConfigError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_custom_table() {
        let table = RewardTable {
            excellent: TierBand { min_percent: 80, points: 50 },
            good: TierBand { min_percent: 50, points: 25 },
            fair: TierBand { min_percent: 30, points: 5 },
        };
        assert_eq!(table.bonus(85.0), Bonus { tier: Tier::Excellent, points: 50 });
        assert_eq!(table.bonus(30.0).tier, Tier::Fair);
    }

    proptest! {
        #[test]
        fn prop_tier_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = bonus(lo);
            let high = bonus(hi);
            prop_assert!(low.tier <= high.tier);
            prop_assert!(low.points <= high.points);
        }

        #[test]
        fn prop_bonus_depends_only_on_truncated_percent(p in 0u8..100, frac in 0.0f64..0.999) {
            prop_assert_eq!(bonus(f64::from(p) + frac), bonus(f64::from(p)));
        }
    }
}
