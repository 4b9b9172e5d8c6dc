//! ProTrack: a single-tenant gym membership manager.
//!
//! The [`GymManager`] aggregate owns every [`Member`] and [`WorkoutPlan`] and
//! keeps the member-to-plan references consistent. [`codec`] converts the
//! aggregate to and from its persisted snapshot, and a [`Store`] reads and
//! writes that snapshot.

pub mod codec;
pub mod config;
pub mod dates;
pub mod error;
pub mod manager;
pub mod models;
pub mod render;
pub mod store;

pub use error::{EntityKind, GymError, Result};
pub use manager::{GymManager, GymSummary};
pub use models::{Member, Payment, WorkoutPlan};
pub use store::{JsonFileStore, SqliteStore, Store};
