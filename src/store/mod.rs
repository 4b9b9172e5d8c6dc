//! Durable storage for the gym aggregate.
//!
//! A store reads and writes the *whole* [`GymManager`]; there are no partial
//! updates. The in-memory manager stays the source of truth: a failed
//! [`Store::save`] reports an error and leaves the manager untouched.

mod json;
mod sqlite;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::manager::GymManager;

pub trait Store {
    /// Load the persisted aggregate. A store with nothing saved yet yields an
    /// empty manager.
    fn load(&self) -> Result<GymManager>;

    fn save(&self, manager: &GymManager) -> Result<()>;

    /// Human-readable description of where the data lives.
    fn location(&self) -> String;
}
