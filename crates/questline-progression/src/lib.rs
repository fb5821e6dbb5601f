//! # Questline Progression
//!
//! Progression systems for Questline.
//!
//! This crate is the rule engine behind the task tracker's gamification:
//! - Level curve mapping cumulative XP to levels and bonuses
//! - Daily streak tracking with calendar-day continuity
//! - Declarative achievement catalog with load-time validation
//! - Pure achievement evaluation against hero state
//! - Hero state record and cumulative stat counters
//! - Rank titles earned at level thresholds
//! - Event bus for notification collaborators
//! - Transition aggregator tying one event to one atomic state change

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod achievement;
pub mod evaluator;
pub mod events;
pub mod hero;
pub mod level;
pub mod progression;
pub mod streak;
pub mod title;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::achievement::*;
    pub use crate::evaluator::*;
    pub use crate::events::*;
    pub use crate::hero::*;
    pub use crate::level::*;
    pub use crate::progression::*;
    pub use crate::streak::*;
    pub use crate::title::*;
}

pub use prelude::*;
