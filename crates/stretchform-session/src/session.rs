//! Session state and results

use std::fmt;

use serde::{Deserialize, Serialize};
use stretchform_core::{Category, FrameError, SessionId, StretchId, UserId};
use stretchform_score::{FrameScore, RewardTable, Tier};

use crate::engine::ActiveLease;

/// Session lifecycle state. `Completed` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Completed,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionState::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Active => "active",
            SessionState::Completed => "completed",
            SessionState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// What happened to a submitted frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame counted; show the score and feedback
    Scored(FrameScore),
    /// Frame ignored for accuracy; show the reason
    Skipped(FrameError),
}

impl FrameOutcome {
    pub fn score(&self) -> Option<&FrameScore> {
        match self {
            FrameOutcome::Scored(score) => Some(score),
            FrameOutcome::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FrameOutcome::Skipped(_))
    }
}

/// A stretch as the catalogue defines it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StretchDefinition {
    pub id: StretchId,
    pub name: String,
    pub category: Category,
    pub base_points: u32,
}

impl StretchDefinition {
    /// Definition whose category is inferred from its name
    pub fn named(id: StretchId, name: &str, base_points: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            category: Category::from_stretch_name(name),
            base_points,
        }
    }
}

/// Immutable summary handed to the points/persistence layer on completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session: SessionId,
    pub user: UserId,
    pub stretch: StretchId,
    pub category: Category,
    pub total_frames: u64,
    pub good_form_frames: u64,
    pub skipped_frames: u64,
    /// good_form_frames / total_frames, 0 when no frame was scored
    pub accuracy: f64,
    /// Accuracy as a truncated integer percentage
    pub accuracy_percent: u8,
    /// Mean frame score over scored frames
    pub mean_score: f64,
    pub tier: Tier,
    pub bonus_points: u32,
    pub base_points: u32,
    pub total_points: u32,
}

/// One guided stretch attempt
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    /// Engine that started the session; no other engine may drive it
    engine: u64,
    user: UserId,
    stretch: StretchId,
    category: Category,
    base_points: u32,
    state: SessionState,
    total_frames: u64,
    good_form_frames: u64,
    skipped_frames: u64,
    score_sum: u64,
    frame_scores: Option<Vec<FrameScore>>,
    result: Option<SessionResult>,
    lease: Option<ActiveLease>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: SessionId,
        engine: u64,
        user: UserId,
        stretch: StretchId,
        category: Category,
        base_points: u32,
        retain_frame_scores: bool,
        lease: ActiveLease,
    ) -> Self {
        Session {
            id,
            engine,
            user,
            stretch,
            category,
            base_points,
            state: SessionState::Active,
            total_frames: 0,
            good_form_frames: 0,
            skipped_frames: 0,
            score_sum: 0,
            frame_scores: retain_frame_scores.then(Vec::new),
            result: None,
            lease: Some(lease),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub(crate) fn engine(&self) -> u64 {
        self.engine
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn stretch(&self) -> StretchId {
        self.stretch
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Frames that were scored
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn good_form_frames(&self) -> u64 {
        self.good_form_frames
    }

    /// Frames skipped for tracking problems; never part of accuracy
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Retained frame scores, when the engine is configured to keep them
    pub fn frame_scores(&self) -> Option<&[FrameScore]> {
        self.frame_scores.as_deref()
    }

    /// Result of a completed session
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// good_form_frames / total_frames, 0 when nothing has been scored
    pub fn accuracy(&self) -> f64 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.good_form_frames as f64 / self.total_frames as f64
        }
    }

    /// Accuracy as a truncated integer percentage, computed without floats
    pub fn accuracy_percent(&self) -> u8 {
        if self.total_frames == 0 {
            0
        } else {
            // good <= total, so this is at most 100
            (u128::from(self.good_form_frames) * 100 / u128::from(self.total_frames)) as u8
        }
    }

    pub fn mean_score(&self) -> f64 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.total_frames as f64
        }
    }

    pub(crate) fn record(&mut self, outcome: &FrameOutcome) {
        match outcome {
            FrameOutcome::Scored(score) => {
                self.total_frames += 1;
                self.score_sum += u64::from(score.score);
                if score.good_form {
                    self.good_form_frames += 1;
                }
                if let Some(scores) = self.frame_scores.as_mut() {
                    scores.push(score.clone());
                }
            }
            FrameOutcome::Skipped(_) => self.skipped_frames += 1,
        }
    }

    /// Move to `Completed` and store the summary
    pub(crate) fn finish(&mut self, reward: &RewardTable) -> SessionResult {
        let accuracy_percent = self.accuracy_percent();
        let bonus = reward.bonus_for_percent(accuracy_percent);

        let result = SessionResult {
            session: self.id,
            user: self.user,
            stretch: self.stretch,
            category: self.category,
            total_frames: self.total_frames,
            good_form_frames: self.good_form_frames,
            skipped_frames: self.skipped_frames,
            accuracy: self.accuracy(),
            accuracy_percent,
            mean_score: self.mean_score(),
            tier: bonus.tier,
            bonus_points: bonus.points,
            base_points: self.base_points,
            total_points: self.base_points.saturating_add(bonus.points),
        };

        self.state = SessionState::Completed;
        self.result = Some(result.clone());
        self.lease = None;
        result
    }

    /// Move to `Aborted`; no result is produced
    pub(crate) fn cancel(&mut self) {
        self.state = SessionState::Aborted;
        self.lease = None;
    }
}
