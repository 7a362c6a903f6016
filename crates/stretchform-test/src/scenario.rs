//! Session scenarios
//!
//! Drives complete sessions through a `StretchEngine` from scripted frame
//! sequences and collects what the display and persistence layers would see.

use stretchform_core::{Category, LandmarkFrame, SessionError, StretchId, UserId};
use stretchform_session::{FrameOutcome, SessionResult, StretchEngine};

/// What a scripted session produced
#[derive(Debug)]
pub struct ScenarioReport {
    /// Per-frame outcomes in submission order
    pub outcomes: Vec<FrameOutcome>,
    pub result: SessionResult,
}

impl ScenarioReport {
    pub fn scored(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_skipped()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }
}

/// Run one full session: start, submit every frame, complete
pub fn run_session<I>(
    engine: &StretchEngine,
    user: UserId,
    category: Category,
    frames: I,
) -> Result<ScenarioReport, SessionError>
where
    I: IntoIterator<Item = LandmarkFrame>,
{
    let mut session = engine.start(user, StretchId::new(1), category)?;
    let mut outcomes = Vec::new();
    for frame in frames {
        outcomes.push(engine.submit_frame(&mut session, &frame)?);
    }
    let result = engine.complete(&mut session)?;
    Ok(ScenarioReport { outcomes, result })
}

/// `good` frames of clean form followed by `poor` frames of bad form, for a
/// neck stretch
pub fn neck_session_frames(good: usize, poor: usize) -> Vec<LandmarkFrame> {
    use crate::PoseBuilder;

    let good_frames = (0..good).map(|i| PoseBuilder::standing().at(i as u64 * 33).neck_tilt(30.0).build());
    let poor_frames = (good..good + poor)
        .map(|i| PoseBuilder::standing().at(i as u64 * 33).neck_tilt(5.0).build());
    good_frames.chain(poor_frames).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{init_test_tracing, neck_stretch, PoseBuilder, Side};
    use stretchform_core::{FrameError, Landmark};
    use stretchform_pose::AngleName;
    use stretchform_score::{FormBand, Tier};

    fn user(id: u64) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn test_scenario_a_high_accuracy_session() {
        init_test_tracing();
        let engine = StretchEngine::default();

        let report = run_session(&engine, user(1), Category::Neck, neck_session_frames(95, 5)).unwrap();

        assert_eq!(report.result.total_frames, 100);
        assert_eq!(report.result.good_form_frames, 95);
        assert_eq!(report.result.accuracy_percent, 95);
        assert_eq!(report.result.tier, Tier::Excellent);
        assert_eq!(report.result.bonus_points, 20);
    }

    #[test]
    fn test_scenario_b_no_anchors_means_no_accuracy() {
        init_test_tracing();
        let engine = StretchEngine::default();
        let frames = (0..50).map(|_| PoseBuilder::standing().neck_tilt(30.0).without_anchors().build());

        let report = run_session(&engine, user(1), Category::Neck, frames).unwrap();

        assert_eq!(report.skipped(), 50);
        assert!(report
            .outcomes
            .iter()
            .all(|o| *o == FrameOutcome::Skipped(FrameError::AnchorMissing)));
        assert_eq!(report.result.total_frames, 0);
        assert_eq!(report.result.skipped_frames, 50);
        assert_eq!(report.result.accuracy, 0.0);
        assert_eq!(report.result.tier, Tier::None);
        assert_eq!(report.result.bonus_points, 0);
    }

    #[test]
    fn test_scenario_c_neck_tilt_feedback() {
        let engine = StretchEngine::default();
        let score = engine.evaluate_frame(&neck_stretch(10.0), Category::Neck).unwrap();

        assert_eq!(score.score, 50);
        assert_eq!(score.feedback.len(), 1);
        assert_eq!(score.feedback[0].angle, AngleName::NeckTilt);
        assert!(!score.good_form);
    }

    #[test]
    fn test_scenario_d_one_active_session_per_user() {
        let engine = StretchEngine::default();
        let mut first = engine.start(user(7), StretchId::new(1), Category::Neck).unwrap();
        engine.submit_frame(&mut first, &neck_stretch(30.0)).unwrap();
        engine.submit_frame(&mut first, &neck_stretch(5.0)).unwrap();

        let err = engine.start(user(7), StretchId::new(2), Category::Shoulder).unwrap_err();
        assert_eq!(err, SessionError::AlreadyActive { user: user(7) });

        assert_eq!(first.total_frames(), 2);
        assert_eq!(first.good_form_frames(), 1);
        assert!(first.is_active());
    }

    #[test]
    fn test_intermittent_tracking_loss() {
        let engine = StretchEngine::default();
        let frames = (0..20).map(|i| {
            let builder = PoseBuilder::standing().neck_tilt(30.0);
            if i % 4 == 0 {
                builder.dim(Landmark::LeftHip, 0.1).build()
            } else {
                builder.build()
            }
        });

        let report = run_session(&engine, user(1), Category::Neck, frames).unwrap();
        assert_eq!(report.skipped(), 5);
        assert_eq!(report.scored(), 15);
        // Lost frames do not drag accuracy down
        assert_eq!(report.result.accuracy_percent, 100);
    }

    #[test]
    fn test_shoulder_stretch_session() {
        let engine = StretchEngine::default();
        let frames = vec![
            PoseBuilder::standing().arms_raised(150.0).build(),
            PoseBuilder::standing().arms_raised(100.0).build(),
            PoseBuilder::standing().arms_raised(20.0).build(),
            PoseBuilder::standing()
                .shoulder_elevation(Side::Left, 120.0)
                .shoulder_elevation(Side::Right, 30.0)
                .build(),
        ];

        let report = run_session(&engine, user(1), Category::Shoulder, frames).unwrap();
        let scores: Vec<u8> = report
            .outcomes
            .iter()
            .filter_map(|o| o.score().map(|s| s.score))
            .collect();
        assert_eq!(scores, vec![100, 100, 20, 60]);
        assert_eq!(report.result.good_form_frames, 2);
        assert_eq!(report.result.accuracy_percent, 50);
        assert_eq!(report.result.tier, Tier::None);
    }

    #[test]
    fn test_back_stretch_session() {
        let engine = StretchEngine::default();
        let frames = vec![
            PoseBuilder::standing().forward_bend(85.0).build(),
            PoseBuilder::standing().forward_bend(110.0).build(),
            PoseBuilder::standing().forward_bend(170.0).build(),
            PoseBuilder::standing()
                .forward_bend(90.0)
                .knee_angle(Side::Left, 120.0)
                .knee_angle(Side::Right, 120.0)
                .build(),
        ];

        let report = run_session(&engine, user(1), Category::Back, frames).unwrap();
        let bands: Vec<FormBand> = report
            .outcomes
            .iter()
            .filter_map(|o| o.score().map(|s| s.band))
            .collect();
        assert_eq!(
            bands,
            vec![FormBand::Good, FormBand::Good, FormBand::Poor, FormBand::NeedsAdjustment]
        );
        assert_eq!(report.result.accuracy_percent, 75);
        assert_eq!(report.result.tier, Tier::Good);
    }

    #[test]
    fn test_general_session_hidden_ears() {
        let engine = StretchEngine::default();
        // Ears out of view: spine curvature cannot be measured, the rest still scores
        let frame = PoseBuilder::standing()
            .drop(Landmark::LeftEar)
            .drop(Landmark::RightEar)
            .build();

        let score = engine.evaluate_frame(&frame, Category::General).unwrap();
        assert_eq!(score.score, 100);
        assert_eq!(score.measured, 3);
    }

    #[test]
    fn test_result_hand_off_is_serializable() {
        let engine = StretchEngine::default();
        let report = run_session(&engine, user(3), Category::Neck, neck_session_frames(8, 2)).unwrap();

        let json = serde_json::to_value(&report.result).unwrap();
        assert_eq!(json["tier"], "good");
        assert_eq!(json["category"], "neck");
        assert_eq!(json["accuracy_percent"], 80);
        assert_eq!(json["total_points"], 30);
    }
}
