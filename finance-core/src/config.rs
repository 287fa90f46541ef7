//! Configuration for the finance tracker

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// RocksDB configuration
    pub rocksdb: RocksDbConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/finance"),
            rocksdb: RocksDbConfig::default(),
        }
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_background_jobs: 2,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("FINANCE_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("./data/finance"));
        assert_eq!(config.rocksdb.write_buffer_size_mb, 64);
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tracker.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/finance\"\n\n[rocksdb]\nwrite_buffer_size_mb = 16\nmax_background_jobs = 1\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/finance"));
        assert_eq!(config.rocksdb.write_buffer_size_mb, 16);
    }

    #[test]
    fn test_config_from_file_rejects_bad_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tracker.toml");
        std::fs::write(&path, "data_dir = [").unwrap();

        assert!(Config::from_file(&path).is_err());
    }
}
