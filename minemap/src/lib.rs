//! minemap - Geospatial layer reconciliation for a mining geoportal
//!
//! This library keeps a map surface in sync with a declarative list of
//! layer descriptors: visible layers have their geometry fetched, styled
//! and mounted; hidden or removed layers are unmounted.
//!
//! # High-Level API
//!
//! ```ignore
//! use minemap::geometry::HttpGeometryFetcher;
//! use minemap::http::AsyncReqwestClient;
//! use minemap::reconcile::{LayerCallbacks, Reconciler};
//! use minemap::surface::MemorySurface;
//!
//! let fetcher = HttpGeometryFetcher::new(AsyncReqwestClient::new()?, api_base);
//! let reconciler = Reconciler::new(fetcher, MemorySurface::new())
//!     .with_callbacks(LayerCallbacks::new().on_layer_error(|layer, err| {
//!         eprintln!("{}: {}", layer.id, err);
//!     }));
//!
//! let report = reconciler.reconcile(layers.as_slice()).await;
//! ```

pub mod catalog;
pub mod config;
pub mod geometry;
pub mod http;
pub mod layer;
pub mod logging;
pub mod overlay;
pub mod reconcile;
pub mod style;
pub mod surface;
pub mod sync;

/// Version of the minemap library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
