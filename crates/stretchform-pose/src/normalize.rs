//! Landmark frame normalization

use serde::{Deserialize, Serialize};
use stretchform_core::{
    Category, FrameError, Landmark, LandmarkFrame, Point3, LANDMARK_SET_VERSION,
};

/// Default minimum confidence for a landmark to be used
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Below this length a reference distance is treated as degenerate
const MIN_UNIT_LENGTH: f32 = 1e-4;

/// A landmark after confidence gating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LandmarkSlot {
    Present(Point3),
    Missing,
}

impl LandmarkSlot {
    pub fn point(&self) -> Option<Point3> {
        match self {
            LandmarkSlot::Present(p) => Some(*p),
            LandmarkSlot::Missing => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, LandmarkSlot::Present(_))
    }
}

/// Landmarks in canonical body space: hip midpoint at the origin, one unit
/// equal to shoulder width (or torso length when the shoulders overlap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFrame {
    pub timestamp_ms: u64,
    pub category: Category,
    /// Raw-space length of one canonical unit
    pub unit: f32,
    slots: [LandmarkSlot; Landmark::COUNT],
}

impl NormalizedFrame {
    pub fn slot(&self, landmark: Landmark) -> LandmarkSlot {
        self.slots[landmark.index()]
    }

    pub fn point(&self, landmark: Landmark) -> Option<Point3> {
        self.slot(landmark).point()
    }

    /// Number of present landmarks, anchors included
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_present()).count()
    }

    /// Landmarks marked missing
    pub fn missing(&self) -> impl Iterator<Item = Landmark> + '_ {
        Landmark::all()
            .iter()
            .copied()
            .filter(move |lm| !self.slot(*lm).is_present())
    }
}

/// Frame normalizer
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    confidence_threshold: f32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl Normalizer {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
        }
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Normalize one raw frame for the given category.
    ///
    /// Fails with `AnchorMissing` when the shoulders or hips cannot be trusted
    /// and with `InsufficientLandmarks` when the category's body parts are not
    /// visible enough to score.
    pub fn normalize(
        &self,
        raw: &LandmarkFrame,
        category: Category,
    ) -> Result<NormalizedFrame, FrameError> {
        if raw.version != LANDMARK_SET_VERSION {
            return Err(FrameError::UnsupportedLandmarkSet(raw.version));
        }

        let gated = |lm: Landmark| {
            raw.get(lm)
                .filter(|obs| obs.is_confident(self.confidence_threshold))
                .map(|obs| obs.position)
        };

        let (Some(ls), Some(rs), Some(lh), Some(rh)) = (
            gated(Landmark::LeftShoulder),
            gated(Landmark::RightShoulder),
            gated(Landmark::LeftHip),
            gated(Landmark::RightHip),
        ) else {
            return Err(FrameError::AnchorMissing);
        };

        let origin = lh.midpoint(&rh);
        let shoulder_width = ls.distance(&rs);
        let unit = if shoulder_width >= MIN_UNIT_LENGTH {
            shoulder_width
        } else {
            // Side-on camera: shoulders overlap, fall back to torso length
            let torso = ls.midpoint(&rs).distance(&origin);
            if torso < MIN_UNIT_LENGTH {
                return Err(FrameError::AnchorMissing);
            }
            torso
        };
        let inv_unit = 1.0 / unit;

        let mut slots = [LandmarkSlot::Missing; Landmark::COUNT];
        for lm in Landmark::all() {
            if let Some(p) = gated(*lm) {
                slots[lm.index()] = LandmarkSlot::Present(p.sub(&origin).scale(inv_unit));
            }
        }

        let requirement = category.requirement();
        let present = requirement
            .landmarks
            .iter()
            .filter(|lm| slots[lm.index()].is_present())
            .count();
        if present < requirement.min_present {
            return Err(FrameError::InsufficientLandmarks {
                required: requirement.min_present,
                present,
            });
        }

        Ok(NormalizedFrame {
            timestamp_ms: raw.timestamp_ms,
            category,
            unit,
            slots,
        })
    }
}

/// Normalize with the default confidence threshold
pub fn normalize(raw: &LandmarkFrame, category: Category) -> Result<NormalizedFrame, FrameError> {
    Normalizer::default().normalize(raw, category)
}
