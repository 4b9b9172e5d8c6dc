use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The kind of entity an id refers to, used to qualify lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Member,
    WorkoutPlan,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::WorkoutPlan => "workout plan",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by the gym core and its stores.
#[derive(Debug, Error)]
pub enum GymError {
    #[error("{kind} '{id}' already exists")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("member '{member_id}' has no workout plan assigned")]
    NotAssigned { member_id: String },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("cannot access {}: {source}", .path.display())]
    PersistenceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot is not valid: {0}")]
    CorruptSnapshot(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl GymError {
    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PersistenceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True for failures that leave the aggregate untouched and only need
    /// to be reported back to the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId { .. }
                | Self::NotFound { .. }
                | Self::NotAssigned { .. }
                | Self::MalformedInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GymError>;
