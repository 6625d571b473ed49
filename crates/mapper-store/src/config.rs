//! Environment configuration.

use std::path::PathBuf;

/// Default storage directory.
pub const DEFAULT_DATA_DIR: &str = "./mapper-data";

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings for a Puzzle Mapper process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    /// RocksDB directory
    pub data_dir: PathBuf,

    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl MapperConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `MAPPER_DATA_DIR` (default `./mapper-data`)
    /// - `MAPPER_LOG_LEVEL` (default `info`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_dir: get("MAPPER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            log_level: get("MAPPER_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Override the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}
