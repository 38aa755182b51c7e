//! Layer geometry: GeoJSON feature collections and their retrieval.
//!
//! Geometry is fetched on demand when a layer becomes visible and is never
//! cached across reconciliation passes.

mod fetcher;
mod types;

pub use fetcher::{FetchError, GeometryFetcher, HttpGeometryFetcher};
pub use types::{BoundingBox, Feature, GeoJsonError, Geometry, GeometryPayload, Position};
