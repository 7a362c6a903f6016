//! Frame pipeline: normalize, extract, score

use std::sync::Arc;

use stretchform_core::{Category, FrameError, LandmarkFrame};
use stretchform_pose::{extract_angles, AngleName, Normalizer};
use stretchform_score::{FrameScore, FrameScorer, RuleBook};

/// Stateless per-frame evaluation shared by every session
#[derive(Debug, Clone)]
pub struct FramePipeline {
    normalizer: Normalizer,
    scorer: FrameScorer,
    rules: Arc<RuleBook>,
    /// Angles each category's rules need, resolved once
    angle_plan: Vec<(Category, Vec<AngleName>)>,
}

impl FramePipeline {
    pub fn new(normalizer: Normalizer, scorer: FrameScorer, rules: Arc<RuleBook>) -> Self {
        let angle_plan = rules
            .iter()
            .map(|set| (set.category, set.angle_names()))
            .collect();
        Self {
            normalizer,
            scorer,
            rules,
            angle_plan,
        }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    fn angles_for(&self, category: Category) -> &[AngleName] {
        self.angle_plan
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, names)| names.as_slice())
            .unwrap_or(&[])
    }

    /// Run one raw frame through every stage
    pub fn evaluate(&self, raw: &LandmarkFrame, category: Category) -> Result<FrameScore, FrameError> {
        let frame = self.normalizer.normalize(raw, category)?;
        let angles = extract_angles(&frame, self.angles_for(category));
        self.scorer.score(&angles, self.rules.get(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stretchform_core::{Landmark, Point3};

    fn pipeline() -> FramePipeline {
        FramePipeline::new(
            Normalizer::default(),
            FrameScorer::default(),
            Arc::new(RuleBook::default()),
        )
    }

    fn neck_frame(nose: Point3) -> LandmarkFrame {
        LandmarkFrame::new(0)
            .with(Landmark::LeftShoulder, Point3::planar(0.6, 0.3), 0.9)
            .with(Landmark::RightShoulder, Point3::planar(0.4, 0.3), 0.9)
            .with(Landmark::LeftHip, Point3::planar(0.6, 0.6), 0.9)
            .with(Landmark::RightHip, Point3::planar(0.4, 0.6), 0.9)
            .with(Landmark::LeftElbow, Point3::planar(0.6, 0.45), 0.9)
            .with(Landmark::RightElbow, Point3::planar(0.4, 0.45), 0.9)
            .with(Landmark::Nose, nose, 0.9)
    }

    #[test]
    fn test_good_neck_stretch() {
        // ~27 degree tilt, arms hanging at the sides
        let score = pipeline()
            .evaluate(&neck_frame(Point3::planar(0.6, 0.1)), Category::Neck)
            .unwrap();
        assert_eq!(score.score, 100);
        assert!(score.good_form);
    }

    #[test]
    fn test_upright_head_gets_feedback() {
        let score = pipeline()
            .evaluate(&neck_frame(Point3::planar(0.5, 0.1)), Category::Neck)
            .unwrap();
        assert_eq!(score.score, 50);
        assert_eq!(score.feedback.len(), 1);
        assert_eq!(score.feedback[0].angle, AngleName::NeckTilt);
    }

    #[test]
    fn test_skips_propagate() {
        let raw = LandmarkFrame::new(0);
        assert_eq!(
            pipeline().evaluate(&raw, Category::Back).unwrap_err(),
            FrameError::AnchorMissing
        );
    }
}
