//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::MAX_FETCH_RETRIES;
use super::settings::ConfigFile;
use crate::catalog::MAX_PER_PAGE;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[api]
; Base URL of the geoportal REST API (layers are read from <base_url>/layers)
base_url = {}
; HTTP request timeout in seconds
timeout = {}
; Layers requested per catalog page (1-{})
per_page = {}

[reconciler]
; Deadline in seconds for fetching one layer's geometry
fetch_timeout = {}
; Extra attempts after a network error or timeout (0-{}, 0 = fail on first error)
fetch_retries = {}

[sync]
; Seconds between catalog refreshes in watch mode
poll_interval = {}

[logging]
; Log file path (~ is expanded to the home directory)
file = {}
"#,
        config.api.base_url,
        config.api.timeout,
        MAX_PER_PAGE,
        config.api.per_page,
        config.reconciler.fetch_timeout,
        MAX_FETCH_RETRIES,
        config.reconciler.fetch_retries,
        config.sync.poll_interval,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
