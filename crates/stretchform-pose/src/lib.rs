//! Stretchform Pose - From raw keypoints to joint angles
//!
//! Two pure, per-frame stages:
//! - Normalization: confidence gating and a hip-centred, body-scaled frame
//! - Angle extraction: named joint angles from landmark triplets
//!
//! Neither stage keeps state between frames. A landmark that cannot be
//! trusted stays `Missing` all the way through; nothing is interpolated.

pub mod normalize;
pub mod angles;

pub use normalize::*;
pub use angles::*;
