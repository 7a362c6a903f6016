//! Stretchform Session - Guided stretch sessions
//!
//! This crate ties the per-frame stages into a session lifecycle:
//! 1. Start a session for a user (one active session per user)
//! 2. Normalize each submitted frame
//! 3. Extract the angles the category's rules need
//! 4. Score the frame and update the session counters
//! 5. Complete (accuracy + bonus) or abort
//!
//! Sessions are plain values owned by the caller. The engine is shared and
//! only locks the small active-user registry on start and terminal
//! transitions, never per frame.

pub mod config;
pub mod pipeline;
pub mod session;
pub mod engine;

pub use config::*;
pub use pipeline::*;
pub use session::*;
pub use engine::*;
