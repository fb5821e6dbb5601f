//! # Questline Common
//!
//! Common types and shared abstractions for Questline.
//!
//! This crate provides foundational types used across the Questline
//! subsystems:
//! - Achievement identifiers
//! - Reward value types
//! - Clock abstraction for calendar-date queries
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod ids;
pub mod reward;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::ids::*;
    pub use crate::reward::*;
}

pub use prelude::*;
