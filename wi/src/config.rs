//! Configuration for workoutindex

use eyre::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the workout metadata file (or the directory holding it)
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Number of hits returned when a search does not specify one
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
}

fn default_index_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workoutindex")
        .join(crate::METADATA_FILE)
}

fn default_top_k() -> usize {
    crate::DEFAULT_TOP_K
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            default_top_k: default_top_k(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, the first default location that exists, or defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::read(config_path);
        }

        // ~/.config/workoutindex/config.yml, then ./workoutindex.yml
        let default_paths = [
            dirs::config_dir().map(|p| p.join("workoutindex").join("config.yml")),
            Some(PathBuf::from("workoutindex.yml")),
        ];

        match default_paths.into_iter().flatten().find(|p| p.exists()) {
            Some(found) => Self::read(&found),
            None => {
                debug!("No workoutindex config found, using defaults");
                Ok(Config::default())
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).context(format!("Invalid config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
