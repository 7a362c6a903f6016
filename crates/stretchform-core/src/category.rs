//! Stretch categories
//!
//! A category decides which angle rules apply to a frame and which
//! landmarks must be visible for the frame to be scored at all:
//! - Neck: head tilt against a relaxed shoulder line
//! - Shoulder: arm elevation with a level head
//! - Back: forward hip hinge with straight knees
//! - General: upright whole-body posture

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Landmark;

/// Stretch category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Neck,
    Shoulder,
    Back,
    #[default]
    General,
}

/// Non-anchor landmarks a category needs, and how many of them must be visible
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LandmarkRequirement {
    pub landmarks: &'static [Landmark],
    pub min_present: usize,
}

impl Category {
    /// All categories
    pub fn all() -> &'static [Category] {
        &[
            Category::Neck,
            Category::Shoulder,
            Category::Back,
            Category::General,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Neck => "neck",
            Category::Shoulder => "shoulder",
            Category::Back => "back",
            Category::General => "general",
        }
    }

    /// Classify a free-form stretch name ("Neck Side Stretch", "Seated back twist").
    /// Anything unrecognised is a general stretch.
    pub fn from_stretch_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("neck") {
            Category::Neck
        } else if name.contains("shoulder") {
            Category::Shoulder
        } else if name.contains("back") {
            Category::Back
        } else {
            Category::General
        }
    }

    /// Landmarks (beyond the shoulder/hip anchors) needed to score this category
    pub fn requirement(self) -> LandmarkRequirement {
        match self {
            Category::Neck => LandmarkRequirement {
                landmarks: &[Landmark::Nose, Landmark::LeftEar, Landmark::RightEar],
                min_present: 1,
            },
            Category::Shoulder => LandmarkRequirement {
                landmarks: &[Landmark::LeftElbow, Landmark::RightElbow],
                min_present: 1,
            },
            Category::Back => LandmarkRequirement {
                landmarks: &[
                    Landmark::LeftKnee,
                    Landmark::RightKnee,
                    Landmark::LeftEar,
                    Landmark::RightEar,
                ],
                min_present: 2,
            },
            Category::General => LandmarkRequirement {
                landmarks: &[
                    Landmark::Nose,
                    Landmark::LeftElbow,
                    Landmark::RightElbow,
                    Landmark::LeftKnee,
                    Landmark::RightKnee,
                ],
                min_present: 2,
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stretch_name() {
        assert_eq!(Category::from_stretch_name("Neck Side Stretch"), Category::Neck);
        assert_eq!(Category::from_stretch_name("SHOULDER rolls"), Category::Shoulder);
        assert_eq!(Category::from_stretch_name("Seated back twist"), Category::Back);
        assert_eq!(Category::from_stretch_name("Wrist circles"), Category::General);
        assert_eq!(Category::from_stretch_name(""), Category::General);
    }

    #[test]
    fn test_requirements_never_include_anchors() {
        for category in Category::all() {
            let req = category.requirement();
            assert!(req.min_present <= req.landmarks.len());
            assert!(req.landmarks.iter().all(|lm| !lm.is_anchor()));
        }
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::Shoulder).unwrap();
        assert_eq!(json, "\"shoulder\"");
        let back: Category = serde_json::from_str("\"back\"").unwrap();
        assert_eq!(back, Category::Back);
    }
}
