//! Poll loop keeping the mounted overlays in step with the API.
//!
//! Every tick fetches the full catalog, applies local visibility overrides,
//! then runs a reconciliation pass. Catalog failures back off
//! exponentially (2^n seconds, capped at 5 minutes) and leave the mounted
//! overlays as they were.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::config::SyncConfig;
use crate::catalog::{CatalogError, LayerCatalog};
use crate::geometry::GeometryFetcher;
use crate::layer::LayerList;
use crate::reconcile::{PassReport, Reconciler};
use crate::surface::HostSurface;

/// Maximum backoff duration (5 minutes).
const MAX_BACKOFF: Duration = Duration::from_secs(300);

/// Progress reported by the daemon.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The catalog was fetched
    Refreshed {
        layers: usize,
        visible: usize,
        rejected: usize,
    },
    /// A reconciliation pass completed
    Reconciled(PassReport),
    /// The catalog could not be fetched
    CatalogFailed {
        error: CatalogError,
        consecutive_errors: u32,
    },
    /// The daemon stopped and unmounted everything
    Stopped,
}

/// Catalog polling daemon driving a [`Reconciler`].
pub struct SyncDaemon<C, F, S> {
    catalog: C,
    reconciler: Arc<Reconciler<F, S>>,
    events: mpsc::Sender<SyncEvent>,
    config: SyncConfig,
    list: LayerList,
}

impl<C, F, S> SyncDaemon<C, F, S>
where
    C: LayerCatalog + 'static,
    F: GeometryFetcher + 'static,
    S: HostSurface + 'static,
{
    pub fn new(
        catalog: C,
        reconciler: Arc<Reconciler<F, S>>,
        events: mpsc::Sender<SyncEvent>,
        config: SyncConfig,
    ) -> Self {
        Self {
            catalog,
            reconciler,
            events,
            config,
            list: LayerList::new(),
        }
    }

    /// The layer list as of the last successful refresh.
    pub fn layers(&self) -> &LayerList {
        &self.list
    }

    /// Start the daemon as an async task.
    pub fn start(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run(cancel).await;
        })
    }

    /// Refreshes the catalog and reconciles once.
    pub async fn sync_once(&mut self) -> Result<PassReport, CatalogError> {
        let snapshot = self.catalog.fetch_all(self.config.query()).await?;
        let rejected = snapshot.rejected.len();

        self.list.replace(snapshot.layers);
        for (id, visible) in self.config.visibility_overrides() {
            if !self.list.set_visibility(*id, *visible) {
                tracing::debug!(layer_id = %id, "Visibility override for unknown layer");
            }
        }

        let refreshed = SyncEvent::Refreshed {
            layers: self.list.len(),
            visible: self.list.visible_ids().len(),
            rejected,
        };
        // A closed channel only matters to the poll loop
        let _ = self.events.send(refreshed).await;

        Ok(self.reconciler.reconcile(self.list.as_slice()).await)
    }

    /// Run the poll loop until cancelled or the event receiver is dropped.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            poll_interval_secs = self.config.poll_interval().as_secs(),
            "Layer sync daemon started"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut consecutive_errors: u32 = 0;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            if consecutive_errors > 0 {
                let backoff = calculate_backoff(consecutive_errors);
                tracing::debug!(
                    backoff_secs = backoff.as_secs(),
                    consecutive_errors,
                    "Backing off after catalog errors"
                );
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }

            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.sync_once() => match result {
                    Ok(report) => {
                        consecutive_errors = 0;
                        SyncEvent::Reconciled(report)
                    }
                    Err(error) => {
                        consecutive_errors = consecutive_errors.saturating_add(1);
                        tracing::warn!(
                            error = %error,
                            consecutive_errors,
                            "Failed to refresh layer catalog"
                        );
                        SyncEvent::CatalogFailed {
                            error,
                            consecutive_errors,
                        }
                    }
                },
            };

            if self.events.send(event).await.is_err() {
                tracing::debug!("Sync event channel closed, stopping");
                break;
            }
        }

        let removed = self.reconciler.clear();
        tracing::info!(removed = removed.len(), "Layer sync daemon stopped");
        let _ = self.events.send(SyncEvent::Stopped).await;
    }
}

/// Calculate exponential backoff: 2^n seconds, capped at MAX_BACKOFF.
fn calculate_backoff(consecutive_errors: u32) -> Duration {
    let secs = 2u64.saturating_pow(consecutive_errors.min(20));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}
