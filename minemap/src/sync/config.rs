//! Sync daemon configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::catalog::LayerQuery;
use crate::layer::LayerId;

/// Default delay between catalog refreshes.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Configuration for the [`SyncDaemon`](super::SyncDaemon).
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    poll_interval: Duration,
    query: LayerQuery,
    visibility_overrides: BTreeMap<LayerId, bool>,
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_query(mut self, query: LayerQuery) -> Self {
        self.query = query;
        self
    }

    /// Forces the visibility of `id` after every refresh, the way a local
    /// toggle does before the API has been updated.
    pub fn with_visibility(mut self, id: LayerId, visible: bool) -> Self {
        self.visibility_overrides.insert(id, visible);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn query(&self) -> &LayerQuery {
        &self.query
    }

    pub fn visibility_overrides(&self) -> &BTreeMap<LayerId, bool> {
        &self.visibility_overrides
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            query: LayerQuery::default(),
            visibility_overrides: BTreeMap::new(),
        }
    }
}
