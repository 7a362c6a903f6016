//! Stretch engine - session lifecycle over a shared frame pipeline

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use stretchform_core::{
    Category, ConfigResult, FrameError, LandmarkFrame, SessionError, SessionId, StretchId, UserId,
};
use stretchform_pose::Normalizer;
use stretchform_score::{FrameScore, FrameScorer, RuleBook};
use tracing::{debug, info, warn};

use crate::{EngineConfig, FrameOutcome, FramePipeline, Session, SessionResult, StretchDefinition};

type ActiveRegistry = Arc<Mutex<HashMap<UserId, SessionId>>>;

static NEXT_ENGINE: AtomicU64 = AtomicU64::new(1);

/// Holds a user's active slot; released on a terminal transition or drop
#[derive(Debug)]
pub(crate) struct ActiveLease {
    registry: ActiveRegistry,
    user: UserId,
    session: SessionId,
}

impl Drop for ActiveLease {
    fn drop(&mut self) {
        let mut active = self.registry.lock();
        if active.get(&self.user) == Some(&self.session) {
            active.remove(&self.user);
        }
    }
}

/// Stretch evaluation engine.
///
/// Shareable across threads. Each `Session` is owned by its caller and
/// mutated only through `&mut`, so sessions never need a lock of their own.
#[derive(Debug)]
pub struct StretchEngine {
    id: u64,
    config: EngineConfig,
    pipeline: FramePipeline,
    active: ActiveRegistry,
    next_session: AtomicU64,
}

impl Default for StretchEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default(), Arc::new(RuleBook::default()))
    }
}

impl StretchEngine {
    /// Create an engine; the configuration is validated first
    pub fn new(config: EngineConfig, rules: Arc<RuleBook>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config, rules))
    }

    fn build(config: EngineConfig, rules: Arc<RuleBook>) -> Self {
        let pipeline = FramePipeline::new(
            Normalizer::new(config.confidence_threshold),
            FrameScorer::new(config.good_form_threshold),
            rules,
        );
        StretchEngine {
            id: NEXT_ENGINE.fetch_add(1, Ordering::Relaxed),
            config,
            pipeline,
            active: Arc::new(Mutex::new(HashMap::new())),
            next_session: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleBook {
        self.pipeline.rules()
    }

    /// Start a session worth the configured default base points
    pub fn start(
        &self,
        user: UserId,
        stretch: StretchId,
        category: Category,
    ) -> Result<Session, SessionError> {
        self.open(user, stretch, category, self.config.default_base_points)
    }

    /// Start a session for a catalogue stretch
    pub fn start_stretch(
        &self,
        user: UserId,
        definition: &StretchDefinition,
    ) -> Result<Session, SessionError> {
        self.open(user, definition.id, definition.category, definition.base_points)
    }

    fn open(
        &self,
        user: UserId,
        stretch: StretchId,
        category: Category,
        base_points: u32,
    ) -> Result<Session, SessionError> {
        let id = {
            let mut active = self.active.lock();
            if let Some(existing) = active.get(&user) {
                warn!(%user, session = %existing, "rejected start: session already active");
                return Err(SessionError::AlreadyActive { user });
            }
            let id = SessionId::new(self.next_session.fetch_add(1, Ordering::Relaxed));
            active.insert(user, id);
            id
        };

        info!(%user, session = %id, %stretch, %category, "session started");

        let lease = ActiveLease {
            registry: Arc::clone(&self.active),
            user,
            session: id,
        };
        Ok(Session::new(
            id,
            self.id,
            user,
            stretch,
            category,
            base_points,
            self.config.retain_frame_scores,
            lease,
        ))
    }

    /// A session started by another engine is never active here
    fn check_owner(&self, session: &Session) -> Result<(), SessionError> {
        if session.engine() != self.id {
            warn!(session = %session.id(), "session belongs to another engine");
            return Err(SessionError::NotActive);
        }
        Ok(())
    }

    /// Evaluate one frame for a session and update its counters.
    ///
    /// Frames the pipeline cannot score are reported as `Skipped` and leave
    /// the accuracy counters untouched.
    pub fn submit_frame(
        &self,
        session: &mut Session,
        raw: &LandmarkFrame,
    ) -> Result<FrameOutcome, SessionError> {
        self.check_owner(session)?;
        if !session.is_active() {
            return Err(SessionError::NotActive);
        }

        let outcome = match self.pipeline.evaluate(raw, session.category()) {
            Ok(score) => FrameOutcome::Scored(score),
            Err(reason) => {
                debug!(session = %session.id(), %reason, "frame skipped");
                FrameOutcome::Skipped(reason)
            }
        };
        session.record(&outcome);
        Ok(outcome)
    }

    /// Finish a session and compute its reward
    pub fn complete(&self, session: &mut Session) -> Result<SessionResult, SessionError> {
        self.check_owner(session)?;
        if session.state().is_terminal() {
            return Err(SessionError::AlreadyTerminal);
        }

        let result = session.finish(&self.config.reward);
        info!(
            user = %result.user,
            session = %result.session,
            accuracy = result.accuracy_percent,
            tier = %result.tier,
            bonus = result.bonus_points,
            skipped = result.skipped_frames,
            "session completed"
        );
        Ok(result)
    }

    /// Cancel a session; no reward is computed
    pub fn abort(&self, session: &mut Session) -> Result<(), SessionError> {
        self.check_owner(session)?;
        if session.state().is_terminal() {
            return Err(SessionError::AlreadyTerminal);
        }

        session.cancel();
        info!(
            user = %session.user(),
            session = %session.id(),
            frames = session.total_frames(),
            "session aborted"
        );
        Ok(())
    }

    /// Score a frame outside any session (calibration previews)
    pub fn evaluate_frame(
        &self,
        raw: &LandmarkFrame,
        category: Category,
    ) -> Result<FrameScore, FrameError> {
        self.pipeline.evaluate(raw, category)
    }

    /// Does the user have an active session?
    pub fn is_active(&self, user: UserId) -> bool {
        self.active.lock().contains_key(&user)
    }

    /// Number of active sessions across all users
    pub fn active_sessions(&self) -> usize {
        self.active.lock().len()
    }
}
