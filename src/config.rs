use std::path::{Path, PathBuf};

use crate::ai::DEFAULT_ATTEMPTS;
use crate::error::ConfigError;
use crate::game::validate_name;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub automated: AutomatedConfig,
}

/// Where saves, win totals and history live.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub saves_file: String,
    pub scores_file: String,
    pub history_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            dir: PathBuf::from("."),
            saves_file: "game_saves.txt".into(),
            scores_file: "player_scores.txt".into(),
            history_file: "game_history.txt".into(),
        }
    }
}

/// Settings for the computer opponent.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutomatedConfig {
    pub name: String,
    pub attempts: usize,
    pub thinking_delay_ms: u64,
}

impl Default for AutomatedConfig {
    fn default() -> Self {
        AutomatedConfig {
            name: "Computer".into(),
            attempts: DEFAULT_ATTEMPTS,
            thinking_delay_ms: 1000,
        }
    }
}

/// Where a loaded [`AppConfig`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file was missing and built-in defaults were used.
    Defaults,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist. Logging is not set up yet at this point, so the caller
    /// reports a [`ConfigSource::Defaults`] fallback.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if path.exists() {
            Ok((Self::load(path)?, ConfigSource::File))
        } else {
            Ok((Self::default(), ConfigSource::Defaults))
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let files = [
            ("storage.saves_file", &self.storage.saves_file),
            ("storage.scores_file", &self.storage.scores_file),
            ("storage.history_file", &self.storage.history_file),
        ];
        for (key, file) in files {
            if file.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.storage.saves_file == self.storage.scores_file
            || self.storage.saves_file == self.storage.history_file
            || self.storage.scores_file == self.storage.history_file
        {
            return Err(ConfigError::Validation(
                "storage files must all be distinct".into(),
            ));
        }

        if self.automated.attempts == 0 {
            return Err(ConfigError::Validation(
                "automated.attempts must be >= 1".into(),
            ));
        }
        validate_name(&self.automated.name)
            .map_err(|e| ConfigError::Validation(format!("automated.name: {e}")))?;

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
