//! Landmarks - the fixed, versioned body-point set delivered by the pose estimator
//!
//! The estimator hands us one `LandmarkFrame` per captured image. Every
//! landmark slot is always present in the structure; a point the estimator
//! did not report is simply `None`.

use serde::{Deserialize, Serialize};

/// Version of the landmark set understood by this engine
pub const LANDMARK_SET_VERSION: u16 = 1;

/// Body landmark identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Landmark {
    // Head
    Nose = 0,
    LeftEar = 1,
    RightEar = 2,

    // Arms
    LeftShoulder = 3,
    RightShoulder = 4,
    LeftElbow = 5,
    RightElbow = 6,
    LeftWrist = 7,
    RightWrist = 8,

    // Legs
    LeftHip = 9,
    RightHip = 10,
    LeftKnee = 11,
    RightKnee = 12,
    LeftAnkle = 13,
    RightAnkle = 14,
}

impl Landmark {
    /// Number of landmarks in the set
    pub const COUNT: usize = 15;

    /// Shoulders and hips: the reference frame every other point is measured in
    pub const ANCHORS: [Landmark; 4] = [
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftHip,
        Landmark::RightHip,
    ];

    /// All landmarks in index order
    pub fn all() -> &'static [Landmark] {
        &[
            Landmark::Nose,
            Landmark::LeftEar,
            Landmark::RightEar,
            Landmark::LeftShoulder,
            Landmark::RightShoulder,
            Landmark::LeftElbow,
            Landmark::RightElbow,
            Landmark::LeftWrist,
            Landmark::RightWrist,
            Landmark::LeftHip,
            Landmark::RightHip,
            Landmark::LeftKnee,
            Landmark::RightKnee,
            Landmark::LeftAnkle,
            Landmark::RightAnkle,
        ]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Is this one of the normalization anchors?
    pub fn is_anchor(self) -> bool {
        Self::ANCHORS.contains(&self)
    }

    /// Map a 33-point BlazePose index onto this set
    pub fn from_mediapipe_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Landmark::Nose),
            7 => Some(Landmark::LeftEar),
            8 => Some(Landmark::RightEar),
            11 => Some(Landmark::LeftShoulder),
            12 => Some(Landmark::RightShoulder),
            13 => Some(Landmark::LeftElbow),
            14 => Some(Landmark::RightElbow),
            15 => Some(Landmark::LeftWrist),
            16 => Some(Landmark::RightWrist),
            23 => Some(Landmark::LeftHip),
            24 => Some(Landmark::RightHip),
            25 => Some(Landmark::LeftKnee),
            26 => Some(Landmark::RightKnee),
            27 => Some(Landmark::LeftAnkle),
            28 => Some(Landmark::RightAnkle),
            _ => None,
        }
    }
}

/// 3D position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 2D point with zero depth
    pub fn planar(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn sub(&self, other: &Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, factor: f32) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn dot(&self, other: &Point3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Point halfway between two points
    pub fn midpoint(&self, other: &Point3) -> Point3 {
        Point3::new(
            (self.x + other.x) * 0.5,
            (self.y + other.y) * 0.5,
            (self.z + other.z) * 0.5,
        )
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point3) -> f32 {
        self.sub(other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A single estimator observation: position plus detection confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub position: Point3,
    pub confidence: f32,
}

impl Observation {
    pub fn new(position: Point3, confidence: f32) -> Self {
        Self {
            position,
            confidence,
        }
    }

    /// Is this observation trustworthy at the given threshold?
    ///
    /// Non-finite coordinates or confidences never pass.
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence.is_finite() && self.confidence >= threshold && self.position.is_finite()
    }
}

/// Raw per-frame keypoint set from the pose estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Landmark set version the estimator produced
    pub version: u16,
    /// Capture timestamp in milliseconds (informational)
    #[serde(default)]
    pub timestamp_ms: u64,
    /// Reported landmarks, serialized as a map keyed by landmark name
    #[serde(rename = "landmarks", with = "observation_map")]
    observations: [Option<Observation>; Landmark::COUNT],
}

impl LandmarkFrame {
    /// Empty frame: no landmark reported
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            version: LANDMARK_SET_VERSION,
            timestamp_ms,
            observations: [None; Landmark::COUNT],
        }
    }

    /// Builder-style setter
    pub fn with(mut self, landmark: Landmark, position: Point3, confidence: f32) -> Self {
        self.set(landmark, Observation::new(position, confidence));
        self
    }

    pub fn set(&mut self, landmark: Landmark, observation: Observation) {
        self.observations[landmark.index()] = Some(observation);
    }

    pub fn clear(&mut self, landmark: Landmark) {
        self.observations[landmark.index()] = None;
    }

    pub fn get(&self, landmark: Landmark) -> Option<&Observation> {
        self.observations[landmark.index()].as_ref()
    }

    /// Iterate over reported landmarks
    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &Observation)> {
        Landmark::all()
            .iter()
            .filter_map(move |lm| self.get(*lm).map(|obs| (*lm, obs)))
    }

    /// Number of reported landmarks, regardless of confidence
    pub fn reported(&self) -> usize {
        self.observations.iter().filter(|o| o.is_some()).count()
    }

    /// Build a frame from BlazePose output rows of `[x, y, z, visibility]`.
    ///
    /// Rows beyond the 33-point layout or not in this landmark set are ignored.
    pub fn from_blazepose(timestamp_ms: u64, rows: &[[f32; 4]]) -> Self {
        let mut frame = Self::new(timestamp_ms);
        for (idx, row) in rows.iter().enumerate() {
            let Ok(idx) = u8::try_from(idx) else {
                break;
            };
            if let Some(landmark) = Landmark::from_mediapipe_index(idx) {
                frame.set(
                    landmark,
                    Observation::new(Point3::new(row[0], row[1], row[2]), row[3]),
                );
            }
        }
        frame
    }
}

mod observation_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Landmark, Observation};

    pub fn serialize<S>(
        observations: &[Option<Observation>; Landmark::COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            Landmark::all()
                .iter()
                .filter_map(|lm| observations[lm.index()].as_ref().map(|obs| (*lm, obs))),
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[Option<Observation>; Landmark::COUNT], D::Error>
    where
        D: Deserializer<'de>,
    {
        let reported = BTreeMap::<Landmark, Observation>::deserialize(deserializer)?;
        let mut observations = [None; Landmark::COUNT];
        for (landmark, observation) in reported {
            observations[landmark.index()] = Some(observation);
        }
        Ok(observations)
    }
}
