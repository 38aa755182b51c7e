//! Integration tests driving the engine through its HTTP seams.
//!
//! These tests verify the complete workflow from REST payloads to mounted
//! overlays:
//! - Catalog listing feeding a reconciliation pass
//! - Geometry envelopes turned into markers, polylines and polygons
//! - Popup content derived from descriptor metadata
//! - Visibility changes while a geometry request is still in flight
//! - The sync daemon lifecycle

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use minemap::catalog::{HttpLayerCatalog, LayerCatalog, LayerQuery};
use minemap::geometry::HttpGeometryFetcher;
use minemap::http::{AsyncHttpClient, HttpError};
use minemap::layer::{LayerCategory, LayerDescriptor, LayerId, LayerList, LayerStatus};
use minemap::overlay::Primitive;
use minemap::reconcile::{LayerCallbacks, LayerError, Reconciler};
use minemap::surface::MemorySurface;
use minemap::sync::{SyncConfig, SyncDaemon, SyncEvent};

const BASE: &str = "http://geoportal.test/api/geospatial";

// =============================================================================
// Test Helpers
// =============================================================================

/// HTTP client answering from a route table; unknown URLs get a 404.
///
/// A route can be gated: the request then waits until the test releases it.
/// Clones share their routes.
#[derive(Clone, Default)]
struct RouteClient {
    routes: Arc<Mutex<HashMap<String, String>>>,
    gates: Arc<Mutex<HashMap<String, oneshot::Receiver<()>>>>,
    requests: Arc<AtomicUsize>,
}

impl RouteClient {
    fn route(&self, url: impl Into<String>, body: impl Into<String>) {
        self.routes.lock().insert(url.into(), body.into());
    }

    fn gate(&self, url: impl Into<String>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(url.into(), rx);
        tx
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for RouteClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().remove(url);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let body = self.routes.lock().get(url).cloned();
        body.map(String::into_bytes).ok_or_else(|| HttpError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn geometry_url(id: u64) -> String {
    format!("{}/layers/{}?include_geojson=true", BASE, id)
}

fn list_url(page: u32) -> String {
    format!("{}/layers?page={}&per_page=50", BASE, page)
}

fn geometry_body(geojson: &str) -> String {
    format!(r#"{{"success": true, "data": {{"geojson": {}}}}}"#, geojson)
}

const POINT: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {"nom": "Puits A"},
     "geometry": {"type": "Point", "coordinates": [-5.55, 7.54]}}
]}"#;

const ROAD: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {},
     "geometry": {"type": "LineString", "coordinates": [[-5.0, 7.0], [-4.5, 7.2]]}}
]}"#;

const PERMIT: &str = r#"{"type": "Feature", "properties": {},
    "geometry": {"type": "Polygon", "coordinates": [[[-6.0, 8.0], [-5.0, 8.0], [-5.0, 9.0], [-6.0, 8.0]]]}}"#;

type Engine = Reconciler<HttpGeometryFetcher<RouteClient>, MemorySurface>;

fn engine(client: &RouteClient, callbacks: LayerCallbacks) -> (MemorySurface, Engine) {
    let surface = MemorySurface::new();
    let fetcher = HttpGeometryFetcher::new(client.clone(), BASE);
    let engine = Reconciler::new(fetcher, surface.clone()).with_callbacks(callbacks);
    (surface, engine)
}

fn deposit(id: u64, visible: bool) -> LayerDescriptor {
    LayerDescriptor::new(id, LayerCategory::Deposit)
        .with_name(format!("Gisement {}", id))
        .with_status(LayerStatus::Active)
        .with_visibility(visible)
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn test_single_point_deposit_mounts_one_marker_with_popup() {
    let client = RouteClient::default();
    client.route(geometry_url(1), geometry_body(POINT));

    let loads = Arc::new(AtomicUsize::new(0));
    let loads_seen = loads.clone();
    let callbacks = LayerCallbacks::new().on_layer_load(move |_, _| {
        loads_seen.fetch_add(1, Ordering::SeqCst);
    });
    let (surface, engine) = engine(&client, callbacks);

    let report = engine.reconcile(&[deposit(1, true)]).await;

    assert_eq!(report.mounted, vec![LayerId::new(1)]);
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    let overlay = engine.overlay(LayerId::new(1)).unwrap();
    assert_eq!(overlay.parts().len(), 1);
    assert_eq!(overlay.marker_count(), 1);
    assert!(matches!(
        overlay.parts()[0].primitive,
        Primitive::Marker { .. }
    ));

    let popup = &overlay.popup().text;
    assert!(popup.contains("Gisement 1"));
    assert!(popup.contains("Type: Gisement Minier"));

    assert_eq!(surface.mounted_ids(), vec![LayerId::new(1)]);
    assert_eq!(surface.mounted(LayerId::new(1)).unwrap().markers, 1);
}

#[tokio::test]
async fn test_emptied_list_unmounts_everything() {
    let client = RouteClient::default();
    client.route(geometry_url(1), geometry_body(POINT));
    let (surface, engine) = engine(&client, LayerCallbacks::new());

    engine.reconcile(&[deposit(1, true)]).await;
    let report = engine.reconcile(&[]).await;

    assert_eq!(report.removed, vec![LayerId::new(1)]);
    assert!(engine.mounted_ids().is_empty());
    assert!(surface.mounted_ids().is_empty());
    assert_eq!(surface.unmount_count(LayerId::new(1)), 1);
}

#[tokio::test]
async fn test_hidden_while_request_in_flight_never_mounts() {
    let client = RouteClient::default();
    client.route(geometry_url(2), geometry_body(ROAD));
    let release = client.gate(geometry_url(2));
    let (surface, engine) = engine(&client, LayerCallbacks::new());

    let shown = [deposit(2, true)];
    let first = engine.reconcile(&shown);
    let second = async {
        while client.request_count() == 0 {
            tokio::task::yield_now().await;
        }
        let report = engine.reconcile(&[deposit(2, false)]).await;
        let _ = release.send(());
        report
    };
    let (first, second) = tokio::join!(first, second);

    assert!(second.removed.is_empty());
    assert!(first.mounted.is_empty());
    assert_eq!(first.superseded, vec![LayerId::new(2)]);
    assert!(!engine.is_mounted(LayerId::new(2)));
    assert_eq!(surface.mount_count(LayerId::new(2)), 0);
}

#[tokio::test]
async fn test_missing_geometry_is_reported_per_layer() {
    let client = RouteClient::default();
    client.route(geometry_url(1), geometry_body(POINT));
    client.route(
        geometry_url(2),
        r#"{"success": true, "data": {"geojson": null}}"#,
    );
    client.route(geometry_url(3), r#"{"success": true, "data": "#);

    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_seen = errors.clone();
    let callbacks = LayerCallbacks::new().on_layer_error(move |layer, error| {
        errors_seen.lock().push((layer.id, error.kind()));
    });
    let (_surface, engine) = engine(&client, callbacks);

    let layers = [deposit(1, true), deposit(2, true), deposit(3, true)];
    let report = engine.reconcile(&layers).await;

    assert_eq!(report.mounted, vec![LayerId::new(1)]);
    let mut failed = report.failed.clone();
    failed.sort_by_key(|(id, _)| *id);
    assert!(matches!(failed[0].1, LayerError::MissingGeometry(_)));
    assert!(matches!(failed[1].1, LayerError::GeometryFetch(_)));

    let mut seen = errors.lock().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec![
            (LayerId::new(2), "missing_geometry"),
            (LayerId::new(3), "geometry_fetch"),
        ]
    );
}

#[tokio::test]
async fn test_fit_bounds_covers_all_primitive_kinds() {
    let client = RouteClient::default();
    client.route(geometry_url(1), geometry_body(POINT));
    client.route(geometry_url(2), geometry_body(ROAD));
    client.route(geometry_url(3), geometry_body(PERMIT));
    let (_surface, engine) = engine(&client, LayerCallbacks::new());

    let layers = [
        deposit(1, true),
        LayerDescriptor::new(2, LayerCategory::Infrastructure).with_visibility(true),
        LayerDescriptor::new(3, LayerCategory::AdministrativeZone).with_visibility(true),
    ];
    let report = engine.reconcile(&layers).await;
    assert!(report.is_clean());

    let kinds: Vec<&str> = [1, 2, 3]
        .iter()
        .map(|id| engine.overlay(LayerId::new(*id)).unwrap().parts()[0].primitive.kind())
        .collect();
    assert_eq!(kinds, vec!["marker", "polyline", "polygon"]);

    let bounds = engine.fit_bounds().unwrap();
    assert_eq!(bounds.west, -6.0);
    assert_eq!(bounds.east, -4.5);
    assert_eq!(bounds.south, 7.0);
    assert_eq!(bounds.north, 9.0);
}

#[tokio::test]
async fn test_catalog_listing_drives_a_pass() {
    let client = RouteClient::default();
    client.route(
        list_url(1),
        r#"{"success": true, "data": [
            {"id": 1, "name": "Or - Bouaflé", "layerType": "deposit", "status": "actif", "isVisible": true},
            {"id": 2, "name": "Route minière", "layerType": "infrastructure", "isVisible": false},
            {"id": 3, "name": "Permis", "layerType": "zone", "isVisible": "yes"}
        ], "pagination": {"page": 1, "pages": 1, "total": 3, "has_next": false}}"#,
    );
    client.route(geometry_url(1), geometry_body(POINT));
    client.route(geometry_url(2), geometry_body(ROAD));

    let catalog = HttpLayerCatalog::new(client.clone(), BASE);
    let snapshot = catalog.fetch_all(&LayerQuery::new()).await.unwrap();
    assert_eq!(snapshot.layers.len(), 2);
    assert_eq!(snapshot.rejected.len(), 1);
    assert_eq!(snapshot.rejected[0].id, Some(3));

    let (_surface, engine) = engine(&client, LayerCallbacks::new());
    let mut list = LayerList::from(snapshot.layers);
    engine.reconcile(list.as_slice()).await;
    assert_eq!(engine.mounted_ids(), vec![LayerId::new(1)]);

    // Local toggle, as the dashboard does before the API is updated
    list.toggle_visibility(LayerId::new(1));
    list.toggle_visibility(LayerId::new(2));
    let report = engine.reconcile(list.as_slice()).await;
    assert_eq!(report.removed, vec![LayerId::new(1)]);
    assert_eq!(report.mounted, vec![LayerId::new(2)]);
}

#[tokio::test]
async fn test_daemon_syncs_then_unmounts_on_cancel() {
    let client = RouteClient::default();
    client.route(
        list_url(1),
        r#"{"success": true, "data": [
            {"id": 1, "name": "Or", "layerType": "deposit", "isVisible": false}
        ]}"#,
    );
    client.route(geometry_url(1), geometry_body(POINT));

    let (surface, engine) = engine(&client, LayerCallbacks::new());
    let engine = Arc::new(engine);
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let config = SyncConfig::new()
        .with_poll_interval(Duration::from_millis(10))
        .with_visibility(LayerId::new(1), true);
    let daemon = SyncDaemon::new(
        HttpLayerCatalog::new(client.clone(), BASE),
        engine.clone(),
        events_tx,
        config,
    );

    let cancel = CancellationToken::new();
    let handle = daemon.start(cancel.clone());

    let mut reconciled = None;
    while let Some(event) = events_rx.recv().await {
        if let SyncEvent::Reconciled(report) = event {
            reconciled = Some(report);
            break;
        }
    }
    let report = reconciled.unwrap();
    assert_eq!(report.mounted, vec![LayerId::new(1)]);
    assert_eq!(surface.mounted_ids(), vec![LayerId::new(1)]);

    cancel.cancel();
    let mut stopped = false;
    while let Some(event) = events_rx.recv().await {
        if event == SyncEvent::Stopped {
            stopped = true;
            break;
        }
    }
    handle.await.unwrap();

    assert!(stopped);
    assert!(engine.mounted_ids().is_empty());
    assert!(surface.mounted_ids().is_empty());
}
