//! Stretchform Score - Rule evaluation and rewards
//!
//! - Category rule sets: target angle ranges, weights and feedback
//! - Frame scoring: weighted 0-100 form score with feedback tags
//! - Reward tiers: session accuracy to bonus points

pub mod rules;
pub mod frame;
pub mod reward;

pub use rules::*;
pub use frame::*;
pub use reward::*;
