//! Global daybook configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use crate::error::{DaybookError, DaybookResult};
use crate::reminder::DEFAULT_SCAN_INTERVAL;
use crate::storage::FileStorage;
use crate::store::EventStore;
use crate::view::ViewKind;

static DEFAULT_DATA_DIR: &str = "~/.local/share/daybook";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_reminder_interval_secs() -> u64 {
    DEFAULT_SCAN_INTERVAL.as_secs()
}

/// Configuration at ~/.config/daybook/config.toml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DaybookConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_reminder_interval_secs")]
    pub reminder_interval_secs: u64,

    #[serde(default)]
    pub default_view: ViewKind,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            data_dir: default_data_dir(),
            reminder_interval_secs: default_reminder_interval_secs(),
            default_view: ViewKind::default(),
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> DaybookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DaybookError::Config("Could not determine config directory".into()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented-out default file first
    /// if none exists.
    pub fn load() -> DaybookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> DaybookResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| DaybookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DaybookError::Config(e.to_string()))
    }

    /// Where snapshots live, with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// Open the store kept under the data directory.
    pub fn open_store(&self) -> DaybookResult<EventStore> {
        EventStore::load(FileStorage::open(self.data_path())?)
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs.max(1))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DaybookResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where events, categories and theme are stored:
# data_dir = \"{}\"

# Seconds between reminder scans:
# reminder_interval_secs = {}

# View shown when none is given (month, week, day or agenda):
# default_view = \"month\"
",
            DEFAULT_DATA_DIR,
            default_reminder_interval_secs()
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DaybookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
