//! Domain models for ProTrack.
//!
//! # Core Concepts
//!
//! - [`Member`]: A gym patron with a profile, an append-only attendance log,
//!   an append-only payment log and at most one assigned workout plan.
//! - [`WorkoutPlan`]: A reusable training program definition.
//! - [`Payment`]: One `(date, amount)` entry in a member's payment log.
//!
//! Members refer to their plan by id only. The plan itself is owned by the
//! [`GymManager`](crate::manager::GymManager), which resolves the reference
//! on demand and clears it when the plan goes away.

mod member;
mod workout_plan;

pub use member::*;
pub use workout_plan::*;
