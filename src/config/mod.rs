//! Persisted settings for the selection history.
//!
//! Config keys (TOML): `history_max`, `navigation`, `session_dir`.

mod defaults;
mod errors;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde::de::Error as SerdeDeError;

use crate::app_dirs;
use crate::atomic_file::atomic_write;
use crate::history::NavigationPolicy;

pub use defaults::{DEFAULT_HISTORY_MAX, MAX_HISTORY_LIMIT};
pub use errors::ConfigError;

/// Default filename used to store the settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Filename of the history snapshot inside a session directory.
pub const SNAPSHOT_FILE_NAME: &str = "selection_history.json";

/// User-facing knobs for recording and navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of entries kept; the oldest are dropped first.
    #[serde(default = "defaults::default_history_max")]
    pub history_max: usize,
    /// How forward/backward steps treat entries whose object is gone.
    #[serde(default)]
    pub navigation: NavigationPolicy,
    /// Optional override for the directory holding session snapshots.
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            history_max: DEFAULT_HISTORY_MAX,
            navigation: NavigationPolicy::default(),
            session_dir: None,
        }
    }
}

impl HistorySettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.history_max = defaults::clamp_history_max(self.history_max);
        self
    }

    /// Resolve where the snapshot for `session` lives.
    pub fn snapshot_path(&self, session: &str) -> Result<PathBuf, ConfigError> {
        let base = match &self.session_dir {
            Some(dir) => dir.clone(),
            None => app_dirs::sessions_dir().map_err(map_app_dir_error)?,
        };
        Ok(base.join(session_dir_name(session)).join(SNAPSHOT_FILE_NAME))
    }
}

/// Resolve the settings file path inside the app root.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the app root, returning defaults if the file is missing.
pub fn load_or_default() -> Result<HistorySettings, ConfigError> {
    load_settings_from(&config_path()?)
}

/// Load settings from `path`, returning defaults if it does not exist.
pub fn load_settings_from(path: &Path) -> Result<HistorySettings, ConfigError> {
    if !path.exists() {
        return Ok(HistorySettings::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str::<HistorySettings>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(HistorySettings::normalized)
}

/// Persist settings into the app root.
pub fn save(settings: &HistorySettings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &HistorySettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, data.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn session_dir_name(session: &str) -> String {
    let name: String = session
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        "default".to_string()
    } else {
        name
    }
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
