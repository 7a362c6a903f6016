//! Per-frame form scoring

use serde::{Deserialize, Serialize};
use stretchform_core::FrameError;
use stretchform_pose::{AngleName, AngleSet};

use crate::CategoryRuleSet;

/// Default score at or above which a frame counts as good form
pub const DEFAULT_GOOD_FORM_THRESHOLD: u8 = 70;

/// Feedback for one angle outside its target range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackTag {
    pub angle: AngleName,
    pub message: String,
}

/// Display band for overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormBand {
    Poor,
    NeedsAdjustment,
    Good,
}

impl FormBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            FormBand::Good
        } else if score >= 60 {
            FormBand::NeedsAdjustment
        } else {
            FormBand::Poor
        }
    }
}

/// Result of scoring one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameScore {
    /// 0-100, truncated
    pub score: u8,
    pub feedback: Vec<FeedbackTag>,
    pub good_form: bool,
    pub band: FormBand,
    /// Number of rules that had a measured angle
    pub measured: usize,
}

/// Frame scorer
#[derive(Debug, Clone, Copy)]
pub struct FrameScorer {
    good_form_threshold: u8,
}

impl Default for FrameScorer {
    fn default() -> Self {
        Self::new(DEFAULT_GOOD_FORM_THRESHOLD)
    }
}

impl FrameScorer {
    pub fn new(good_form_threshold: u8) -> Self {
        Self {
            good_form_threshold,
        }
    }

    pub fn good_form_threshold(&self) -> u8 {
        self.good_form_threshold
    }

    /// Score a frame's angles against a rule set.
    ///
    /// Rules whose angle is missing are left out of both the earned weight and
    /// the weight base. A frame with no measurable rule at all is dropped with
    /// `NoScorableAngles` rather than scored as zero.
    pub fn score(&self, angles: &AngleSet, rules: &CategoryRuleSet) -> Result<FrameScore, FrameError> {
        let mut earned: u64 = 0;
        let mut possible: u64 = 0;
        let mut measured = 0;
        let mut feedback = Vec::new();

        for rule in &rules.rules {
            let Some(degrees) = angles.degrees(rule.angle) else {
                continue;
            };
            measured += 1;
            possible += u64::from(rule.weight);

            if rule.range.contains(degrees) {
                earned += u64::from(rule.weight);
            } else {
                feedback.push(FeedbackTag {
                    angle: rule.angle,
                    message: rule.feedback.clone(),
                });
            }
        }

        if possible == 0 {
            return Err(FrameError::NoScorableAngles);
        }

        // earned <= possible, so the quotient is at most 100
        let score = ((100 * earned) / possible) as u8;

        Ok(FrameScore {
            score,
            feedback,
            good_form: score >= self.good_form_threshold,
            band: FormBand::from_score(score),
            measured,
        })
    }
}

/// Score with the default good-form threshold
pub fn score(angles: &AngleSet, rules: &CategoryRuleSet) -> Result<FrameScore, FrameError> {
    FrameScorer::default().score(angles, rules)
}
