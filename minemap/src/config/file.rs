//! Reading and writing `~/.minemap/config.ini`.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// A key holds a value its setting cannot accept
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

const CONFIG_DIR_NAME: &str = ".minemap";
const CONFIG_FILE_NAME: &str = "config.ini";

impl ConfigFile {
    /// Reads `~/.minemap/config.ini`.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Reads the settings at `path`. A missing file yields the stock
    /// geoportal settings; a present but unreadable one is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        match Ini::load_from_file(path) {
            Ok(ini) => super::parser::parse_ini(&ini),
            Err(ini::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Writes the commented INI rendering, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = parent {
            std::fs::create_dir_all(dir).map_err(ConfigFileError::DirectoryError)?;
        }

        std::fs::write(path, super::writer::to_config_string(self))
            .map_err(|e| ConfigFileError::WriteError(format!("{}: {}", path.display(), e)))
    }

    /// Seeds `~/.minemap/config.ini` for `minemap config init`; an existing
    /// file is left untouched.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.is_file() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// `~/.minemap`, or `./.minemap` when no home directory is known.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.timeout, DEFAULT_API_TIMEOUT_SECS);
        assert_eq!(config.api.per_page, 50);
        assert_eq!(config.reconciler.fetch_timeout, 30);
        assert_eq!(config.reconciler.fetch_retries, 0);
        assert_eq!(config.sync.poll_interval, 30);
        assert!(config.logging.file.ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_unreadable_path_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        let result = ConfigFile::load_from(temp_dir.path());
        assert!(matches!(result, Err(ConfigFileError::ReadError(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.api.base_url = "https://geo.example.org/api/geospatial".to_string();
        config.api.per_page = 25;
        config.reconciler.fetch_retries = 2;
        config.sync.poll_interval = 120;
        config.logging.file = temp_dir.path().join("custom.log");

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[sync]\npoll_interval = 5\n").unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config.sync.poll_interval, 5);
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_runtime_config_conversion() {
        let mut config = ConfigFile::default();
        config.reconciler.fetch_timeout = 10;
        config.reconciler.fetch_retries = 3;
        config.sync.poll_interval = 60;
        config.api.per_page = 20;

        let reconciler = config.reconciler_config();
        assert_eq!(reconciler.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(reconciler.fetch_retries(), 3);

        let sync = config.sync_config();
        assert_eq!(sync.poll_interval(), Duration::from_secs(60));
        assert_eq!(sync.query().per_page(), 20);
    }

    #[test]
    fn test_config_file_path_is_in_config_directory() {
        assert!(config_file_path().starts_with(config_directory()));
        assert!(config_file_path().ends_with("config.ini"));
    }
}
