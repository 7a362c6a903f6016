//! Synthetic pose frames
//!
//! `PoseBuilder` places a front-facing skeleton so that each named angle
//! comes out at exactly the requested value. Shoulders sit directly above
//! the hips, which keeps every arm and leg in a simple vertical reference.

use stretchform_core::{Landmark, LandmarkFrame, Observation, Point3};

const LEFT_SHOULDER: Point3 = Point3 { x: 0.6, y: 0.3, z: 0.0 };
const RIGHT_SHOULDER: Point3 = Point3 { x: 0.4, y: 0.3, z: 0.0 };
const LEFT_HIP: Point3 = Point3 { x: 0.6, y: 0.6, z: 0.0 };
const RIGHT_HIP: Point3 = Point3 { x: 0.4, y: 0.6, z: 0.0 };

const UP: Point3 = Point3 { x: 0.0, y: -1.0, z: 0.0 };
const DOWN: Point3 = Point3 { x: 0.0, y: 1.0, z: 0.0 };

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Rotation sign that swings a limb away from the body
    fn outward(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Rotate a planar vector by `degrees`, signed
fn rotate(v: Point3, degrees: f32, sign: f32) -> Point3 {
    let (sin, cos) = (sign * degrees).to_radians().sin_cos();
    Point3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

fn along(from: Point3, direction: Point3, length: f32) -> Point3 {
    let unit = direction.scale(1.0 / direction.length());
    Point3::new(
        from.x + unit.x * length,
        from.y + unit.y * length,
        from.z + unit.z * length,
    )
}

/// Builder for synthetic landmark frames
#[derive(Debug, Clone)]
pub struct PoseBuilder {
    timestamp_ms: u64,
    confidence: f32,
    neck_tilt: f32,
    spine_curvature: f32,
    shoulder_elevation: [f32; 2],
    elbow_angle: [f32; 2],
    hip_flexion: [f32; 2],
    knee_angle: [f32; 2],
    overrides: Vec<(Landmark, Option<f32>)>,
    offset: Point3,
    scale: f32,
}

impl Default for PoseBuilder {
    fn default() -> Self {
        Self::standing()
    }
}

impl PoseBuilder {
    /// Upright, arms hanging, legs straight, every landmark at 0.9 confidence
    pub fn standing() -> Self {
        PoseBuilder {
            timestamp_ms: 0,
            confidence: 0.9,
            neck_tilt: 0.0,
            spine_curvature: 0.0,
            shoulder_elevation: [0.0; 2],
            elbow_angle: [180.0; 2],
            hip_flexion: [180.0; 2],
            knee_angle: [180.0; 2],
            overrides: Vec::new(),
            offset: Point3::zero(),
            scale: 1.0,
        }
    }

    fn idx(side: Side) -> usize {
        match side {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Confidence for every landmark without an override
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn neck_tilt(mut self, degrees: f32) -> Self {
        self.neck_tilt = degrees;
        self
    }

    pub fn spine_curvature(mut self, degrees: f32) -> Self {
        self.spine_curvature = degrees;
        self
    }

    pub fn shoulder_elevation(mut self, side: Side, degrees: f32) -> Self {
        self.shoulder_elevation[Self::idx(side)] = degrees;
        self
    }

    pub fn arms_raised(self, degrees: f32) -> Self {
        self.shoulder_elevation(Side::Left, degrees)
            .shoulder_elevation(Side::Right, degrees)
    }

    pub fn elbow_angle(mut self, side: Side, degrees: f32) -> Self {
        self.elbow_angle[Self::idx(side)] = degrees;
        self
    }

    pub fn hip_flexion(mut self, side: Side, degrees: f32) -> Self {
        self.hip_flexion[Self::idx(side)] = degrees;
        self
    }

    pub fn forward_bend(self, degrees: f32) -> Self {
        self.hip_flexion(Side::Left, degrees)
            .hip_flexion(Side::Right, degrees)
    }

    pub fn knee_angle(mut self, side: Side, degrees: f32) -> Self {
        self.knee_angle[Self::idx(side)] = degrees;
        self
    }

    /// Report a landmark at a specific confidence
    pub fn dim(mut self, landmark: Landmark, confidence: f32) -> Self {
        self.overrides.push((landmark, Some(confidence)));
        self
    }

    /// Leave a landmark out of the frame entirely
    pub fn drop(mut self, landmark: Landmark) -> Self {
        self.overrides.push((landmark, None));
        self
    }

    /// Drop both hips and both shoulders
    pub fn without_anchors(self) -> Self {
        Landmark::ANCHORS.iter().fold(self, |b, lm| b.drop(*lm))
    }

    /// Move and resize the whole body in image space
    pub fn transformed(mut self, offset: Point3, scale: f32) -> Self {
        self.offset = offset;
        self.scale = scale;
        self
    }

    /// Canonical positions before confidence and transform are applied
    pub fn positions(&self) -> Vec<(Landmark, Point3)> {
        let shoulder_mid = LEFT_SHOULDER.midpoint(&RIGHT_SHOULDER);

        let nose = along(shoulder_mid, rotate(UP, self.neck_tilt, 1.0), 0.15);
        let ear_mid = along(shoulder_mid, rotate(UP, self.spine_curvature, 1.0), 0.13);
        let ear_offset = Point3::planar(0.03, 0.0);

        let mut positions = vec![
            (Landmark::Nose, nose),
            (Landmark::LeftEar, Point3::new(ear_mid.x + ear_offset.x, ear_mid.y, 0.0)),
            (Landmark::RightEar, Point3::new(ear_mid.x - ear_offset.x, ear_mid.y, 0.0)),
            (Landmark::LeftShoulder, LEFT_SHOULDER),
            (Landmark::RightShoulder, RIGHT_SHOULDER),
            (Landmark::LeftHip, LEFT_HIP),
            (Landmark::RightHip, RIGHT_HIP),
        ];

        let sides = [
            (Side::Left, LEFT_SHOULDER, LEFT_HIP),
            (Side::Right, RIGHT_SHOULDER, RIGHT_HIP),
        ];
        for (side, shoulder, hip) in sides {
            let i = Self::idx(side);
            let out = side.outward();
            let (elbow_lm, wrist_lm, knee_lm, ankle_lm) = match side {
                Side::Left => (
                    Landmark::LeftElbow,
                    Landmark::LeftWrist,
                    Landmark::LeftKnee,
                    Landmark::LeftAnkle,
                ),
                Side::Right => (
                    Landmark::RightElbow,
                    Landmark::RightWrist,
                    Landmark::RightKnee,
                    Landmark::RightAnkle,
                ),
            };

            // Upper arm swings outward from the shoulder-to-hip line
            let upper_arm = rotate(DOWN, self.shoulder_elevation[i], out);
            let elbow = along(shoulder, upper_arm, 0.15);
            // Forearm bends away from the elbow-to-shoulder direction
            let back_to_shoulder = shoulder.sub(&elbow);
            let wrist = along(elbow, rotate(back_to_shoulder, self.elbow_angle[i], out), 0.13);

            // Thigh swings away from the hip-to-shoulder line
            let thigh = rotate(UP, self.hip_flexion[i], out);
            let knee = along(hip, thigh, 0.2);
            let back_to_hip = hip.sub(&knee);
            let ankle = along(knee, rotate(back_to_hip, self.knee_angle[i], out), 0.18);

            positions.push((elbow_lm, elbow));
            positions.push((wrist_lm, wrist));
            positions.push((knee_lm, knee));
            positions.push((ankle_lm, ankle));
        }

        positions
    }

    pub fn build(&self) -> LandmarkFrame {
        let mut frame = LandmarkFrame::new(self.timestamp_ms);
        for (landmark, position) in self.positions() {
            let placed = Point3::new(
                position.x * self.scale + self.offset.x,
                position.y * self.scale + self.offset.y,
                position.z * self.scale + self.offset.z,
            );
            frame.set(landmark, Observation::new(placed, self.confidence));
        }
        for (landmark, confidence) in &self.overrides {
            match confidence {
                Some(c) => {
                    if let Some(obs) = frame.get(*landmark).copied() {
                        frame.set(*landmark, Observation::new(obs.position, *c));
                    }
                }
                None => frame.clear(*landmark),
            }
        }
        frame
    }
}

/// Neck stretch frame with relaxed shoulders
pub fn neck_stretch(tilt_degrees: f32) -> LandmarkFrame {
    PoseBuilder::standing().neck_tilt(tilt_degrees).build()
}
