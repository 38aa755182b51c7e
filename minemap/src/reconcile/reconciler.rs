//! The reconciliation engine.
//!
//! Each pass diffs the visible descriptors against the mounted overlays,
//! unmounts what is no longer wanted, then fetches, builds and mounts what
//! is missing. Additions run concurrently on the calling task.
//!
//! # Late arrivals
//!
//! Every addition carries a ticket registered in the in-flight table. A pass
//! that stops targeting a layer drops its ticket, so a fetch finishing after
//! the layer was hidden finds its ticket gone and is discarded. The check
//! happens under the state lock, at mount time, against the table as it is
//! then, not as it was when the fetch started.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::callbacks::LayerCallbacks;
use super::config::ReconcilerConfig;
use super::error::LayerError;
use super::report::PassReport;
use crate::geometry::{BoundingBox, FetchError, GeometryFetcher, GeometryPayload};
use crate::layer::{LayerDescriptor, LayerId};
use crate::overlay::{InteractionEffect, LiveOverlay, OverlayFactory, PointerEvent};
use crate::style;
use crate::surface::{HostSurface, SurfaceResources};

/// State guarded by the reconciler lock. Never held across an await.
struct Inner<S> {
    surface: S,
    mounted: HashMap<LayerId, Arc<LiveOverlay>>,
    in_flight: HashMap<LayerId, u64>,
}

/// Result of one addition, reported back to the pass.
enum Addition<'a> {
    Mounted(&'a LayerDescriptor, Arc<LiveOverlay>),
    Failed(&'a LayerDescriptor, LayerError),
    Superseded(LayerId),
}

/// Keeps a layer's in-flight entry consistent if its addition is dropped
/// before completing.
struct TicketGuard<'a, S> {
    inner: &'a Mutex<Inner<S>>,
    id: LayerId,
    ticket: u64,
    armed: bool,
}

impl<S> TicketGuard<'_, S> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<S> Drop for TicketGuard<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.in_flight.get(&self.id) == Some(&self.ticket) {
            inner.in_flight.remove(&self.id);
            debug!(layer_id = %self.id, "Abandoned addition released its ticket");
        }
    }
}

/// Keeps a set of live overlays in step with a list of layer descriptors.
///
/// # Example
///
/// ```
/// use minemap::geometry::{Feature, FetchError, Geometry, GeometryFetcher, GeometryPayload};
/// use minemap::layer::{LayerCategory, LayerDescriptor, LayerId};
/// use minemap::reconcile::Reconciler;
/// use minemap::surface::MemorySurface;
///
/// struct OnePoint;
///
/// impl GeometryFetcher for OnePoint {
///     async fn fetch(&self, _id: LayerId) -> Result<GeometryPayload, FetchError> {
///         Ok(GeometryPayload::new(vec![Feature::new(Geometry::Point {
///             coordinates: vec![-5.5, 7.5],
///         })]))
///     }
/// }
///
/// # tokio_test_block(async {
/// let reconciler = Reconciler::new(OnePoint, MemorySurface::new());
/// let layers = vec![LayerDescriptor::new(1, LayerCategory::Deposit).with_visibility(true)];
///
/// let report = reconciler.reconcile(&layers).await;
/// assert_eq!(report.mounted, vec![LayerId::new(1)]);
/// assert!(reconciler.is_mounted(LayerId::new(1)));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread()
/// #         .enable_all()
/// #         .build()
/// #         .unwrap()
/// #         .block_on(f);
/// # }
/// ```
pub struct Reconciler<F, S> {
    fetcher: F,
    factory: OverlayFactory,
    callbacks: LayerCallbacks,
    config: ReconcilerConfig,
    inner: Mutex<Inner<S>>,
    next_ticket: AtomicU64,
}

impl<F, S> Reconciler<F, S>
where
    F: GeometryFetcher,
    S: HostSurface,
{
    /// Creates a reconciler and registers the static resources on the
    /// surface. Nothing is mounted until the first pass.
    pub fn new(fetcher: F, mut surface: S) -> Self {
        surface.install(&SurfaceResources::default());

        Self {
            fetcher,
            factory: OverlayFactory::new(),
            callbacks: LayerCallbacks::default(),
            config: ReconcilerConfig::default(),
            inner: Mutex::new(Inner {
                surface,
                mounted: HashMap::new(),
                in_flight: HashMap::new(),
            }),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn with_callbacks(mut self, callbacks: LayerCallbacks) -> Self {
        self.factory = match &callbacks.on_layer_click {
            Some(handler) => OverlayFactory::new().with_click_handler(Arc::clone(handler)),
            None => OverlayFactory::new(),
        };
        self.callbacks = callbacks;
        self
    }

    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Runs one reconciliation pass against the full descriptor list.
    ///
    /// Removals are applied before any fetch starts. Additions start in
    /// list order and complete in any order. Per-layer failures are
    /// reported, never propagated.
    pub async fn reconcile(&self, layers: &[LayerDescriptor]) -> PassReport {
        let mut report = PassReport::default();
        let additions = self.plan(layers, &mut report);

        let mut pending: FuturesUnordered<_> = additions
            .into_iter()
            .map(|(layer, ticket)| self.add_layer(layer, ticket))
            .collect();

        while let Some(addition) = pending.next().await {
            match addition {
                Addition::Mounted(layer, overlay) => {
                    self.callbacks.loaded(layer, &overlay);
                    report.mounted.push(layer.id);
                }
                Addition::Failed(layer, error) => {
                    warn!(
                        layer_id = %layer.id,
                        kind = error.kind(),
                        error = %error,
                        "Layer failed to load"
                    );
                    self.callbacks.failed(layer, &error);
                    report.failed.push((layer.id, error));
                }
                Addition::Superseded(id) => report.superseded.push(id),
            }
        }

        info!(
            mounted = report.mounted.len(),
            removed = report.removed.len(),
            failed = report.failed.len(),
            unchanged = report.unchanged.len(),
            pending = report.pending.len(),
            "Reconciliation pass complete"
        );
        report
    }

    /// Applies removals and registers tickets for additions, under the lock.
    fn plan<'a>(
        &self,
        layers: &'a [LayerDescriptor],
        report: &mut PassReport,
    ) -> Vec<(&'a LayerDescriptor, u64)> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for layer in layers {
            if !seen.insert(layer.id) {
                warn!(layer_id = %layer.id, "Ignoring duplicate layer id in descriptor list");
                continue;
            }
            if layer.visible {
                targets.push(layer);
            }
        }
        let target_ids: HashSet<LayerId> = targets.iter().map(|l| l.id).collect();

        let mut inner = self.inner.lock();
        let Inner {
            surface,
            mounted,
            in_flight,
        } = &mut *inner;

        let mut stale: Vec<LayerId> = mounted
            .keys()
            .filter(|id| !target_ids.contains(id))
            .copied()
            .collect();
        stale.sort();
        for id in stale {
            if let Some(overlay) = mounted.remove(&id) {
                surface.unmount(&overlay);
                debug!(layer_id = %id, "Layer unmounted");
                report.removed.push(id);
            }
        }

        in_flight.retain(|id, _| {
            let keep = target_ids.contains(id);
            if !keep {
                debug!(layer_id = %id, "In-flight fetch invalidated");
            }
            keep
        });

        let mut additions = Vec::new();
        for layer in targets {
            if mounted.contains_key(&layer.id) {
                report.unchanged.push(layer.id);
            } else if in_flight.contains_key(&layer.id) {
                report.pending.push(layer.id);
            } else {
                let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                in_flight.insert(layer.id, ticket);
                debug!(layer_id = %layer.id, ticket, "Layer fetching");
                additions.push((layer, ticket));
            }
        }
        additions
    }

    async fn add_layer<'a>(&self, layer: &'a LayerDescriptor, ticket: u64) -> Addition<'a> {
        let mut guard = TicketGuard {
            inner: &self.inner,
            id: layer.id,
            ticket,
            armed: true,
        };

        let built = self
            .fetch_geometry(layer.id, ticket)
            .await
            .map_err(LayerError::from)
            .and_then(|geometry| {
                let style = style::resolve(
                    layer.category,
                    layer.status,
                    layer.style_override.as_ref(),
                );
                self.factory
                    .build(layer, Arc::new(geometry), style)
                    .map_err(LayerError::from)
            });

        guard.disarm();
        self.complete(layer, ticket, built)
    }

    /// Mounts a built overlay if its ticket is still current.
    fn complete<'a>(
        &self,
        layer: &'a LayerDescriptor,
        ticket: u64,
        built: Result<LiveOverlay, LayerError>,
    ) -> Addition<'a> {
        let mut inner = self.inner.lock();

        if inner.in_flight.get(&layer.id) != Some(&ticket) {
            debug!(layer_id = %layer.id, ticket, "Discarding result for layer no longer targeted");
            return Addition::Superseded(layer.id);
        }
        inner.in_flight.remove(&layer.id);

        let overlay = match built {
            Ok(overlay) => Arc::new(overlay),
            Err(error) => return Addition::Failed(layer, error),
        };

        if let Err(error) = inner.surface.mount(&overlay) {
            return Addition::Failed(layer, error.into());
        }
        inner.mounted.insert(layer.id, Arc::clone(&overlay));
        debug!(
            layer_id = %layer.id,
            parts = overlay.parts().len(),
            "Layer mounted"
        );
        Addition::Mounted(layer, overlay)
    }

    /// Fetches with the configured timeout, retrying transient failures
    /// while the layer is still targeted.
    async fn fetch_geometry(&self, id: LayerId, ticket: u64) -> Result<GeometryPayload, FetchError> {
        let timeout = self.config.fetch_timeout();
        let mut attempt = 0;

        loop {
            let result = match tokio::time::timeout(timeout, self.fetcher.fetch(id)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            };

            match result {
                Err(error)
                    if error.is_transient()
                        && attempt < self.config.fetch_retries()
                        && self.ticket_is_current(id, ticket) =>
                {
                    let delay = self.config.retry_delay(attempt);
                    warn!(
                        layer_id = %id,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Geometry fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn ticket_is_current(&self, id: LayerId, ticket: u64) -> bool {
        self.inner.lock().in_flight.get(&id) == Some(&ticket)
    }

    /// Ids with a mounted overlay, sorted.
    pub fn mounted_ids(&self) -> Vec<LayerId> {
        let mut ids: Vec<LayerId> = self.inner.lock().mounted.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn is_mounted(&self, id: LayerId) -> bool {
        self.inner.lock().mounted.contains_key(&id)
    }

    /// Ids whose geometry is currently being fetched, sorted.
    pub fn fetching_ids(&self) -> Vec<LayerId> {
        let mut ids: Vec<LayerId> = self.inner.lock().in_flight.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Shared handle on a mounted overlay.
    pub fn overlay(&self, id: LayerId) -> Option<Arc<LiveOverlay>> {
        self.inner.lock().mounted.get(&id).cloned()
    }

    /// Runs `f` on a mounted overlay, outside the state lock.
    pub fn with_overlay<R>(&self, id: LayerId, f: impl FnOnce(&LiveOverlay) -> R) -> Option<R> {
        let overlay = self.overlay(id)?;
        Some(f(&overlay))
    }

    /// Runs `f` on the host surface, under the state lock.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.lock().surface)
    }

    /// Combined bounds of every mounted overlay, for "fit to visible
    /// layers".
    pub fn fit_bounds(&self) -> Option<BoundingBox> {
        let inner = self.inner.lock();
        if inner.mounted.is_empty() {
            return None;
        }
        inner.surface.combined_bounds()
    }

    /// Routes a host pointer event to an overlay part.
    ///
    /// Hover restyles go through the surface; clicks are forwarded to
    /// `on_layer_click` after the lock is released. Returns false when the
    /// event had no effect.
    pub fn dispatch(&self, id: LayerId, part: usize, event: &PointerEvent) -> bool {
        let click = {
            let mut inner = self.inner.lock();
            let Some(overlay) = inner.mounted.get(&id).cloned() else {
                return false;
            };
            match overlay.handle(part, event) {
                Some(InteractionEffect::Restyle(style)) => {
                    inner.surface.restyle(id, part, &style);
                    return true;
                }
                Some(InteractionEffect::Click(click)) => click,
                None => return false,
            }
        };

        click.fire();
        true
    }

    /// Unmounts everything and forgets in-flight fetches. Returns the
    /// removed ids, sorted.
    pub fn clear(&self) -> Vec<LayerId> {
        let mut inner = self.inner.lock();
        let Inner {
            surface,
            mounted,
            in_flight,
        } = &mut *inner;

        in_flight.clear();
        let mut ids: Vec<LayerId> = mounted.keys().copied().collect();
        ids.sort();
        for id in &ids {
            if let Some(overlay) = mounted.remove(id) {
                surface.unmount(&overlay);
            }
        }
        if !ids.is_empty() {
            info!(removed = ids.len(), "All layers unmounted");
        }
        ids
    }
}
