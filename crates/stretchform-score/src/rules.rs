//! Category rule sets
//!
//! Immutable configuration, built once and shared read-only by every
//! session. Ranges are in degrees and inclusive on both ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stretchform_core::{Category, ConfigError, ConfigResult};
use stretchform_pose::AngleName;

/// Inclusive target range in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: f32,
    pub max: f32,
}

impl TargetRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, degrees: f32) -> bool {
        degrees >= self.min && degrees <= self.max
    }
}

/// One angle rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleRule {
    pub angle: AngleName,
    pub range: TargetRange,
    pub weight: u32,
    pub feedback: String,
}

impl AngleRule {
    pub fn new(angle: AngleName, min: f32, max: f32, weight: u32, feedback: &str) -> Self {
        Self {
            angle,
            range: TargetRange::new(min, max),
            weight,
            feedback: feedback.to_string(),
        }
    }
}

/// Ordered rules for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRuleSet {
    pub category: Category,
    pub rules: Vec<AngleRule>,
}

impl CategoryRuleSet {
    pub fn new(category: Category, rules: Vec<AngleRule>) -> Self {
        Self { category, rules }
    }

    /// Built-in rules for a category
    pub fn default_for(category: Category) -> Self {
        use AngleName::*;

        let rules = match category {
            Category::Neck => vec![
                AngleRule::new(NeckTilt, 20.0, 45.0, 50, "Tilt your head further to the side"),
                AngleRule::new(LeftShoulderElevation, 0.0, 30.0, 25, "Relax your left shoulder"),
                AngleRule::new(RightShoulderElevation, 0.0, 30.0, 25, "Relax your right shoulder"),
            ],
            Category::Shoulder => vec![
                AngleRule::new(LeftShoulderElevation, 60.0, 180.0, 40, "Raise your left arm higher"),
                AngleRule::new(RightShoulderElevation, 60.0, 180.0, 40, "Raise your right arm higher"),
                AngleRule::new(NeckTilt, 0.0, 15.0, 20, "Keep your head level"),
            ],
            Category::Back => vec![
                AngleRule::new(LeftHipFlexion, 0.0, 120.0, 35, "Bend forward at the hips"),
                AngleRule::new(RightHipFlexion, 0.0, 120.0, 35, "Bend forward at the hips"),
                AngleRule::new(LeftKneeAngle, 150.0, 180.0, 15, "Keep your left knee straight"),
                AngleRule::new(RightKneeAngle, 150.0, 180.0, 15, "Keep your right knee straight"),
            ],
            Category::General => vec![
                AngleRule::new(NeckTilt, 0.0, 20.0, 40, "Keep your head centred"),
                AngleRule::new(SpineCurvature, 0.0, 20.0, 30, "Lengthen your spine"),
                AngleRule::new(LeftKneeAngle, 140.0, 180.0, 15, "Stand tall on your left leg"),
                AngleRule::new(RightKneeAngle, 140.0, 180.0, 15, "Stand tall on your right leg"),
            ],
        };

        Self::new(category, rules)
    }

    /// Angles the rules need, in rule order without duplicates
    pub fn angle_names(&self) -> Vec<AngleName> {
        let mut names: Vec<AngleName> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !names.contains(&rule.angle) {
                names.push(rule.angle);
            }
        }
        names
    }

    pub fn total_weight(&self) -> u32 {
        self.rules.iter().map(|r| r.weight).sum()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet(self.category.to_string()));
        }
        for rule in &self.rules {
            let TargetRange { min, max } = rule.range;
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(ConfigError::InvalidRange {
                    angle: rule.angle.to_string(),
                    lo: min as f64,
                    hi: max as f64,
                });
            }
            if rule.weight == 0 {
                return Err(ConfigError::ZeroWeight(rule.angle.to_string()));
            }
        }
        Ok(())
    }
}

/// Rule sets for every category
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBook {
    sets: BTreeMap<Category, CategoryRuleSet>,
}

impl Default for RuleBook {
    fn default() -> Self {
        let sets = Category::all()
            .iter()
            .map(|c| (*c, CategoryRuleSet::default_for(*c)))
            .collect();
        RuleBook { sets }
    }
}

impl RuleBook {
    /// Build a rule book; every category must be covered. A later set for the
    /// same category replaces an earlier one.
    pub fn new(rule_sets: Vec<CategoryRuleSet>) -> ConfigResult<Self> {
        let mut sets = BTreeMap::new();
        for set in rule_sets {
            set.validate()?;
            sets.insert(set.category, set);
        }
        for category in Category::all() {
            if !sets.contains_key(category) {
                return Err(ConfigError::MissingCategory(category.to_string()));
            }
        }
        Ok(RuleBook { sets })
    }

    /// Parse a JSON array of rule sets
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let sets: Vec<CategoryRuleSet> = serde_json::from_str(json)?;
        Self::new(sets)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        let sets: Vec<&CategoryRuleSet> = self.sets.values().collect();
        Ok(serde_json::to_string_pretty(&sets)?)
    }

    /// Rule set for a category. Construction guarantees every category exists.
    pub fn get(&self, category: Category) -> &CategoryRuleSet {
        &self.sets[&category]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRuleSet> {
        self.sets.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for category in Category::all() {
            let set = CategoryRuleSet::default_for(*category);
            assert!(set.validate().is_ok());
            assert_eq!(set.total_weight(), 100);
            assert_eq!(set.category, *category);
        }
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = TargetRange::new(20.0, 45.0);
        assert!(range.contains(20.0));
        assert!(range.contains(45.0));
        assert!(!range.contains(19.99));
        assert!(!range.contains(f32::NAN));
    }

    #[test]
    fn test_angle_names_deduplicated() {
        let set = CategoryRuleSet::new(
            Category::Neck,
            vec![
                AngleRule::new(AngleName::NeckTilt, 0.0, 10.0, 1, "a"),
                AngleRule::new(AngleName::NeckTilt, 20.0, 30.0, 1, "b"),
                AngleRule::new(AngleName::SpineCurvature, 0.0, 10.0, 1, "c"),
            ],
        );
        assert_eq!(
            set.angle_names(),
            vec![AngleName::NeckTilt, AngleName::SpineCurvature]
        );
    }

    #[test]
    fn test_validation_errors() {
        let empty = CategoryRuleSet::new(Category::Back, vec![]);
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyRuleSet(_))));

        let inverted = CategoryRuleSet::new(
            Category::Back,
            vec![AngleRule::new(AngleName::LeftHipFlexion, 90.0, 10.0, 1, "x")],
        );
        assert!(matches!(inverted.validate(), Err(ConfigError::InvalidRange { .. })));

        let weightless = CategoryRuleSet::new(
            Category::Back,
            vec![AngleRule::new(AngleName::LeftHipFlexion, 0.0, 10.0, 0, "x")],
        );
        assert!(matches!(weightless.validate(), Err(ConfigError::ZeroWeight(_))));
    }

    #[test]
    fn test_rule_book_requires_every_category() {
        let err = RuleBook::new(vec![CategoryRuleSet::default_for(Category::Neck)]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCategory(_)));
    }

    #[test]
    fn test_rule_book_json_round_trip() {
        let book = RuleBook::default();
        let json = book.to_json_string().unwrap();
        let parsed = RuleBook::from_json_str(&json).unwrap();
        assert_eq!(parsed, book);
    }

    #[test]
    fn test_rule_book_override_from_json() {
        let mut sets: Vec<CategoryRuleSet> =
            Category::all().iter().map(|c| CategoryRuleSet::default_for(*c)).collect();
        sets.push(CategoryRuleSet::new(
            Category::Neck,
            vec![AngleRule::new(AngleName::NeckTilt, 10.0, 40.0, 10, "Tilt")],
        ));
        let json = serde_json::to_string(&sets).unwrap();

        let book = RuleBook::from_json_str(&json).unwrap();
        assert_eq!(book.get(Category::Neck).rules.len(), 1);
        assert_eq!(book.get(Category::Neck).rules[0].angle, AngleName::NeckTilt);
    }

    #[test]
    fn test_rule_book_rejects_bad_json() {
        assert!(matches!(
            RuleBook::from_json_str("{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
