//! Error types for the stretch-form engine

use thiserror::Error;

use crate::UserId;

/// Per-frame failures.
///
/// Recoverable: the frame is skipped, the session continues, and the reason
/// is surfaced to the caller for display.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("Anchor landmarks missing: shoulders and hips must be visible")]
    AnchorMissing,

    #[error("Insufficient landmarks: need {required}, got {present}")]
    InsufficientLandmarks { required: usize, present: usize },

    #[error("No scorable angles in frame")]
    NoScorableAngles,

    #[error("Unsupported landmark set version {0}")]
    UnsupportedLandmarkSet(u16),
}

impl FrameError {
    /// Short hint suitable for an on-screen prompt
    pub fn hint(&self) -> &'static str {
        match self {
            FrameError::AnchorMissing => "Step back so your shoulders and hips are in view",
            FrameError::InsufficientLandmarks { .. } => "Move closer to the camera",
            FrameError::NoScorableAngles => "Hold still so we can see the stretch",
            FrameError::UnsupportedLandmarkSet(_) => "Pose tracking is unavailable",
        }
    }
}

/// Session protocol misuse by the calling layer. Never retried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("User {user} already has an active session")]
    AlreadyActive { user: UserId },

    #[error("Session is not active")]
    NotActive,

    #[error("Session already reached a terminal state")]
    AlreadyTerminal,
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Reward tiers must increase: fair < good < excellent")]
    NonMonotonicTiers,

    #[error("Rule set for {0} is empty")]
    EmptyRuleSet(String),

    #[error("Invalid target range for {angle}: [{lo}, {hi}]")]
    InvalidRange { angle: String, lo: f64, hi: f64 },

    #[error("Rule weight for {0} must be positive")]
    ZeroWeight(String),

    #[error("No rule set for category {0}")]
    MissingCategory(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
