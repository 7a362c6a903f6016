//! Stretchform Core - Fundamental types shared by every layer
//!
//! This crate defines the vocabulary of the stretch-form engine:
//! - Identifiers (UserId, StretchId, SessionId)
//! - The versioned landmark set and raw landmark frames
//! - Stretch categories and their landmark requirements
//! - The frame, session and configuration error taxonomy

pub mod id;
pub mod landmark;
pub mod category;
pub mod error;

pub use id::*;
pub use landmark::*;
pub use category::*;
pub use error::*;
