//! Settings structs for each INI section of `config.ini`.
//!
//! These are pure data containers with no logic beyond conversions into
//! the runtime configs. Defaults live in [`super::defaults`].

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::LayerQuery;
use crate::reconcile::ReconcilerConfig;
use crate::sync::SyncConfig;

/// User configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub api: ApiSettings,
    pub reconciler: ReconcilerSettings,
    pub sync: SyncSettings,
    pub logging: LoggingSettings,
}

/// Geoportal REST API settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    /// Base URL, e.g. `http://localhost:5000/api/geospatial`
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout: u64,
    /// Catalog page size
    pub per_page: u32,
}

/// Reconciler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerSettings {
    /// Per-layer geometry fetch deadline in seconds
    pub fetch_timeout: u64,
    /// Extra attempts after a transient fetch failure
    pub fetch_retries: u32,
}

/// Sync daemon settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    /// Seconds between catalog refreshes
    pub poll_interval: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl ConfigFile {
    /// Builds the reconciler runtime config from the `[reconciler]` section.
    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig::new()
            .with_fetch_timeout(Duration::from_secs(self.reconciler.fetch_timeout))
            .with_fetch_retries(self.reconciler.fetch_retries)
    }

    /// Builds the sync daemon config from the `[sync]` and `[api]` sections.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::new()
            .with_poll_interval(Duration::from_secs(self.sync.poll_interval))
            .with_query(LayerQuery::new().with_per_page(self.api.per_page))
    }
}
