//! User configuration stored in `~/.minemap/config.ini`.
//!
//! The INI file is the persistent layer; [`ConfigFile::reconciler_config`]
//! and [`ConfigFile::sync_config`] turn it into the builder-style runtime
//! configs the engine consumes.
//!
//! # Example
//!
//! ```
//! use minemap::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::default();
//! let key: ConfigKey = "sync.poll_interval".parse().unwrap();
//! key.set(&mut config, "60").unwrap();
//!
//! assert_eq!(config.sync_config().poll_interval().as_secs(), 60);
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_file, DEFAULT_API_BASE_URL, DEFAULT_API_PER_PAGE, DEFAULT_API_TIMEOUT_SECS,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_LOG_FILE_NAME, DEFAULT_RECONCILER_FETCH_RETRIES,
    DEFAULT_SYNC_POLL_INTERVAL_SECS, MAX_FETCH_RETRIES,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{ApiSettings, ConfigFile, LoggingSettings, ReconcilerSettings, SyncSettings};
