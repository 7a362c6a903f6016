//! Engine configuration

use serde::{Deserialize, Serialize};
use stretchform_core::{ConfigError, ConfigResult};
use stretchform_pose::DEFAULT_CONFIDENCE_THRESHOLD;
use stretchform_score::{RewardTable, DEFAULT_GOOD_FORM_THRESHOLD};

/// Points awarded for finishing a stretch when its definition names none
pub const DEFAULT_BASE_POINTS: u32 = 20;

/// Stretch engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum landmark confidence
    pub confidence_threshold: f32,
    /// Frame score counted as good form
    pub good_form_threshold: u8,
    /// Base points for `StretchEngine::start`
    pub default_base_points: u32,
    /// Keep every FrameScore on the session
    pub retain_frame_scores: bool,
    /// Accuracy to bonus tiers
    pub reward: RewardTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            good_form_threshold: DEFAULT_GOOD_FORM_THRESHOLD,
            default_base_points: DEFAULT_BASE_POINTS,
            retain_frame_scores: false,
            reward: RewardTable::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration for dim rooms and low-end webcams
    pub fn lenient() -> Self {
        EngineConfig {
            confidence_threshold: 0.3,
            good_form_threshold: 60,
            ..Self::default()
        }
    }

    /// Configuration for coached sessions with a good camera
    pub fn strict() -> Self {
        EngineConfig {
            confidence_threshold: 0.6,
            good_form_threshold: 80,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "confidence_threshold",
                value: f64::from(self.confidence_threshold),
            });
        }
        if self.good_form_threshold > 100 {
            return Err(ConfigError::InvalidThreshold {
                name: "good_form_threshold",
                value: f64::from(self.good_form_threshold),
            });
        }
        self.reward.validate()
    }

    /// Parse and validate; omitted fields take their defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::lenient().validate().is_ok());
        assert!(EngineConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "good_form_threshold": 75 }"#).unwrap();
        assert_eq!(config.good_form_threshold, 75);
        assert_eq!(config.default_base_points, DEFAULT_BASE_POINTS);
        assert_eq!(config.reward, RewardTable::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "confidence_threshold": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold { name: "confidence_threshold", .. }));

        let err = EngineConfig::from_json_str(r#"{ "good_form_threshold": 101 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold { .. }));

        let err = EngineConfig::from_json_str(r#"{ "confidence_threshold": "high" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
