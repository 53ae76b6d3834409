use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::AggregateOptions;
use crate::error::Result;
use crate::model::Column;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub refresh_interval_ms: u64,
    pub cpu_sample_interval_ms: u64,
    pub visible_columns: Vec<Column>,
    pub sort_column: Column,
    pub sort_descending: bool,
    pub name_filter: Option<String>,
    pub require_non_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
            cpu_sample_interval_ms: 100,
            visible_columns: Column::DEFAULT_DISPLAY.to_vec(),
            sort_column: Column::MemoryUsageBytes,
            sort_descending: true,
            name_filter: None,
            require_non_empty: false,
        }
    }
}

impl Config {
    /// Load from the user config dir, falling back to defaults.
    pub fn load() -> Self {
        Self::load_or_init(&config_path())
    }

    /// A missing file is created with the defaults so it can be edited;
    /// a malformed one is left alone.
    pub fn load_or_init(path: &Path) -> Self {
        if !path.exists() {
            let config = Config::default();
            if let Err(e) = config.save_to(path) {
                log::debug!("Could not write default config to {}: {}", path.display(), e);
            }
            return config;
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn cpu_sample_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_interval_ms)
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            sort_column: self.sort_column,
            descending: self.sort_descending,
            columns: if self.visible_columns.is_empty() {
                None
            } else {
                Some(self.visible_columns.clone())
            },
            name_filter: self.name_filter.clone(),
            require_non_empty: self.require_non_empty,
        }
    }
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("process-monitor-linux")
        .join("config.json")
}
