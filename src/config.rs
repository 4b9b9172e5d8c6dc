//! Where the gym data lives and which backend reads it.
//!
//! Resolution order for each setting: explicit value (CLI flag), then the
//! environment, then the default.
//! - `PROTRACK_DATA` - path of the data file
//! - `PROTRACK_BACKEND` - `json` (default) or `sqlite`

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::store::{JsonFileStore, SqliteStore, Store};

pub const DATA_ENV: &str = "PROTRACK_DATA";
pub const BACKEND_ENV: &str = "PROTRACK_BACKEND";

const APP_NAME: &str = "protrack";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    fn default_file_name(&self) -> &'static str {
        match self {
            Self::Json => "gym_data.json",
            Self::Sqlite => "gym_data.db",
        }
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(anyhow!("unknown backend '{}', expected json or sqlite", other)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub backend: Backend,
}

impl Config {
    /// Resolve the configuration from explicit overrides and the environment.
    pub fn resolve(data_path: Option<PathBuf>, backend: Option<Backend>) -> Result<Self> {
        Self::resolve_with(data_path, backend, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        data_path: Option<PathBuf>,
        backend: Option<Backend>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let backend = match backend {
            Some(backend) => backend,
            None => env(BACKEND_ENV)
                .map(|value| value.parse::<Backend>())
                .transpose()?
                .unwrap_or_default(),
        };

        let data_path = match data_path.or_else(|| env(DATA_ENV).map(PathBuf::from)) {
            Some(path) => path,
            None => default_data_dir()?.join(backend.default_file_name()),
        };

        Ok(Self { data_path, backend })
    }

    pub fn open_store(&self) -> crate::Result<Box<dyn Store>> {
        tracing::debug!(
            "Opening {} store at {}",
            self.backend,
            self.data_path.display()
        );
        let store: Box<dyn Store> = match self.backend {
            Backend::Json => Box::new(JsonFileStore::new(&self.data_path)),
            Backend::Sqlite => Box::new(SqliteStore::open(&self.data_path)?),
        };
        Ok(store)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win_over_environment() {
        let config = Config::resolve_with(
            Some(PathBuf::from("/tmp/gym.json")),
            Some(Backend::Json),
            |_| Some("sqlite".to_string()),
        )
        .unwrap();

        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.data_path, PathBuf::from("/tmp/gym.json"));
    }

    #[test]
    fn reads_environment() {
        let config = Config::resolve_with(None, None, |key| match key {
            BACKEND_ENV => Some("SQLite".to_string()),
            DATA_ENV => Some("/var/lib/gym.db".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.data_path, PathBuf::from("/var/lib/gym.db"));
    }

    #[test]
    fn rejects_unknown_backend() {
        let result = Config::resolve_with(None, None, |key| {
            (key == BACKEND_ENV).then(|| "csv".to_string())
        });
        assert!(result.is_err());
    }
}
