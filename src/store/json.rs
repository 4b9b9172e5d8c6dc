use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::Store;
use crate::codec;
use crate::error::{GymError, Result};
use crate::manager::GymManager;

/// Keeps the snapshot in a single JSON file (`gym_data.json` layout).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<GymManager> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    "No saved data at {}, starting with an empty gym",
                    self.path.display()
                );
                return Ok(GymManager::new());
            }
            Err(e) => return Err(GymError::persistence(&self.path, e)),
        };

        let manager = codec::from_json(&json)?;
        tracing::info!(
            "Loaded {} workout plan(s) and {} member(s) from {}",
            manager.plan_count(),
            manager.member_count(),
            self.path.display()
        );
        Ok(manager)
    }

    /// Write to a temporary file next to the target, then rename it into
    /// place. The previous file survives any failure before the rename.
    fn save(&self, manager: &GymManager) -> Result<()> {
        let json = codec::to_json(manager)?;
        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| GymError::persistence(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| GymError::persistence(dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| GymError::persistence(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| GymError::persistence(&self.path, e.error))?;

        tracing::info!("Saved gym data to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
