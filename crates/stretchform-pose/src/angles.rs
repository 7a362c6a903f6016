//! Joint angle extraction
//!
//! Each angle is measured at a vertex between two arms using
//! cos(θ) = (v1 · v2) / (|v1| × |v2|). Arms can end at a landmark or at the
//! midpoint of a landmark pair, so axial angles (neck, spine) can be measured
//! against the shoulder and hip centres.

use std::fmt;

use serde::{Deserialize, Serialize};
use stretchform_core::{Category, Landmark, Point3};

use crate::NormalizedFrame;

/// Below this length an arm has no direction
const MIN_ARM_LENGTH: f32 = 1e-6;

/// Named joint angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AngleName {
    NeckTilt = 0,
    SpineCurvature = 1,
    LeftShoulderElevation = 2,
    RightShoulderElevation = 3,
    LeftElbowAngle = 4,
    RightElbowAngle = 5,
    LeftHipFlexion = 6,
    RightHipFlexion = 7,
    LeftKneeAngle = 8,
    RightKneeAngle = 9,
}

/// One end of an angle arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnglePoint {
    At(Landmark),
    Between(Landmark, Landmark),
}

impl AnglePoint {
    fn resolve(self, frame: &NormalizedFrame) -> Option<Point3> {
        match self {
            AnglePoint::At(lm) => frame.point(lm),
            AnglePoint::Between(a, b) => Some(frame.point(a)?.midpoint(&frame.point(b)?)),
        }
    }
}

/// How the measured angle is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleKind {
    /// The angle between the arms, 180° when straight
    Interior,
    /// Bend away from a straight line, 0° when straight
    Deviation,
}

/// Geometry of a named angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleDef {
    pub name: AngleName,
    pub from: AnglePoint,
    pub vertex: AnglePoint,
    pub to: AnglePoint,
    pub kind: AngleKind,
}

impl AngleName {
    /// Number of named angles
    pub const COUNT: usize = 10;

    pub fn all() -> &'static [AngleName] {
        &[
            AngleName::NeckTilt,
            AngleName::SpineCurvature,
            AngleName::LeftShoulderElevation,
            AngleName::RightShoulderElevation,
            AngleName::LeftElbowAngle,
            AngleName::RightElbowAngle,
            AngleName::LeftHipFlexion,
            AngleName::RightHipFlexion,
            AngleName::LeftKneeAngle,
            AngleName::RightKneeAngle,
        ]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AngleName::NeckTilt => "neck_tilt",
            AngleName::SpineCurvature => "spine_curvature",
            AngleName::LeftShoulderElevation => "left_shoulder_elevation",
            AngleName::RightShoulderElevation => "right_shoulder_elevation",
            AngleName::LeftElbowAngle => "left_elbow_angle",
            AngleName::RightElbowAngle => "right_elbow_angle",
            AngleName::LeftHipFlexion => "left_hip_flexion",
            AngleName::RightHipFlexion => "right_hip_flexion",
            AngleName::LeftKneeAngle => "left_knee_angle",
            AngleName::RightKneeAngle => "right_knee_angle",
        }
    }

    pub fn definition(self) -> AngleDef {
        use AngleKind::*;
        use AnglePoint::*;
        use Landmark::*;

        let (from, vertex, to, kind) = match self {
            AngleName::NeckTilt => (
                At(Nose),
                Between(LeftShoulder, RightShoulder),
                Between(LeftHip, RightHip),
                Deviation,
            ),
            AngleName::SpineCurvature => (
                Between(LeftEar, RightEar),
                Between(LeftShoulder, RightShoulder),
                Between(LeftHip, RightHip),
                Deviation,
            ),
            AngleName::LeftShoulderElevation => (At(LeftElbow), At(LeftShoulder), At(LeftHip), Interior),
            AngleName::RightShoulderElevation => {
                (At(RightElbow), At(RightShoulder), At(RightHip), Interior)
            }
            AngleName::LeftElbowAngle => (At(LeftShoulder), At(LeftElbow), At(LeftWrist), Interior),
            AngleName::RightElbowAngle => {
                (At(RightShoulder), At(RightElbow), At(RightWrist), Interior)
            }
            AngleName::LeftHipFlexion => (At(LeftShoulder), At(LeftHip), At(LeftKnee), Interior),
            AngleName::RightHipFlexion => (At(RightShoulder), At(RightHip), At(RightKnee), Interior),
            AngleName::LeftKneeAngle => (At(LeftHip), At(LeftKnee), At(LeftAnkle), Interior),
            AngleName::RightKneeAngle => (At(RightHip), At(RightKnee), At(RightAnkle), Interior),
        };

        AngleDef {
            name: self,
            from,
            vertex,
            to,
            kind,
        }
    }

    /// Angles measured for a category when no rule set says otherwise
    pub fn for_category(category: Category) -> &'static [AngleName] {
        match category {
            Category::Neck => &[
                AngleName::NeckTilt,
                AngleName::LeftShoulderElevation,
                AngleName::RightShoulderElevation,
            ],
            Category::Shoulder => &[
                AngleName::LeftShoulderElevation,
                AngleName::RightShoulderElevation,
                AngleName::NeckTilt,
            ],
            Category::Back => &[
                AngleName::LeftHipFlexion,
                AngleName::RightHipFlexion,
                AngleName::LeftKneeAngle,
                AngleName::RightKneeAngle,
            ],
            Category::General => &[
                AngleName::NeckTilt,
                AngleName::SpineCurvature,
                AngleName::LeftKneeAngle,
                AngleName::RightKneeAngle,
            ],
        }
    }
}

impl fmt::Display for AngleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Angle at `vertex` between `a` and `b`, in degrees within [0, 180].
///
/// `None` when either arm has zero length.
pub fn angle_between(a: Point3, vertex: Point3, b: Point3) -> Option<f32> {
    let v1 = a.sub(&vertex);
    let v2 = b.sub(&vertex);

    let mag1 = v1.length();
    let mag2 = v2.length();
    if mag1 < MIN_ARM_LENGTH || mag2 < MIN_ARM_LENGTH {
        return None;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    // f32 pi rounds up, keep straight lines at exactly 180
    Some(cos_angle.acos().to_degrees().min(180.0))
}

impl AngleDef {
    /// Measure this angle on a frame
    pub fn measure(&self, frame: &NormalizedFrame) -> AngleValue {
        match self.measure_degrees(frame) {
            Some(deg) => AngleValue::Measured(deg),
            None => AngleValue::Missing,
        }
    }

    fn measure_degrees(&self, frame: &NormalizedFrame) -> Option<f32> {
        let interior = angle_between(
            self.from.resolve(frame)?,
            self.vertex.resolve(frame)?,
            self.to.resolve(frame)?,
        )?;
        Some(match self.kind {
            AngleKind::Interior => interior,
            AngleKind::Deviation => 180.0 - interior,
        })
    }
}

/// A single angle measurement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AngleValue {
    Measured(f32),
    #[default]
    Missing,
}

impl AngleValue {
    pub fn degrees(&self) -> Option<f32> {
        match self {
            AngleValue::Measured(d) => Some(*d),
            AngleValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, AngleValue::Missing)
    }
}

/// Angles extracted from one frame; anything not measured is `Missing`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleSet {
    values: [AngleValue; AngleName::COUNT],
}

impl AngleSet {
    /// All angles missing
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: AngleName, degrees: f32) -> Self {
        self.set(name, AngleValue::Measured(degrees));
        self
    }

    pub fn set(&mut self, name: AngleName, value: AngleValue) {
        self.values[name.index()] = value;
    }

    pub fn get(&self, name: AngleName) -> AngleValue {
        self.values[name.index()]
    }

    pub fn degrees(&self, name: AngleName) -> Option<f32> {
        self.get(name).degrees()
    }

    /// Measured angles in name order
    pub fn measured(&self) -> impl Iterator<Item = (AngleName, f32)> + '_ {
        AngleName::all()
            .iter()
            .filter_map(move |name| self.degrees(*name).map(|d| (*name, d)))
    }

    pub fn measured_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }
}

/// Extract the named angles from a frame
pub fn extract_angles(frame: &NormalizedFrame, names: &[AngleName]) -> AngleSet {
    let mut set = AngleSet::new();
    for name in names {
        set.set(*name, name.definition().measure(frame));
    }
    set
}

/// Extract the angles relevant to a category
pub fn extract(frame: &NormalizedFrame, category: Category) -> AngleSet {
    extract_angles(frame, AngleName::for_category(category))
}
