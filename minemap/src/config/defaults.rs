//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::catalog::DEFAULT_PER_PAGE;
use crate::http::DEFAULT_HTTP_TIMEOUT_SECS;
use crate::reconcile::{DEFAULT_FETCH_RETRIES, DEFAULT_FETCH_TIMEOUT};
use crate::sync::DEFAULT_POLL_INTERVAL_SECS;

/// Base URL of the geoportal REST API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/geospatial";

/// HTTP request timeout for catalog and geometry calls, in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = DEFAULT_HTTP_TIMEOUT_SECS;

/// Catalog page size requested from the API.
pub const DEFAULT_API_PER_PAGE: u32 = DEFAULT_PER_PAGE;

/// Per-layer geometry fetch deadline, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = DEFAULT_FETCH_TIMEOUT.as_secs();

/// Extra attempts after a transient geometry fetch failure.
pub const DEFAULT_RECONCILER_FETCH_RETRIES: u32 = DEFAULT_FETCH_RETRIES;

/// Catalog poll interval of the sync daemon, in seconds.
pub const DEFAULT_SYNC_POLL_INTERVAL_SECS: u64 = DEFAULT_POLL_INTERVAL_SECS;

/// Maximum fetch retries accepted from the config file.
pub const MAX_FETCH_RETRIES: u32 = 10;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "minemap.log";

/// Default log file path (~/.minemap/minemap.log).
pub fn default_log_file() -> PathBuf {
    super::file::config_directory().join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                timeout: DEFAULT_API_TIMEOUT_SECS,
                per_page: DEFAULT_API_PER_PAGE,
            },
            reconciler: ReconcilerSettings {
                fetch_timeout: DEFAULT_FETCH_TIMEOUT_SECS,
                fetch_retries: DEFAULT_RECONCILER_FETCH_RETRIES,
            },
            sync: SyncSettings {
                poll_interval: DEFAULT_SYNC_POLL_INTERVAL_SECS,
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
