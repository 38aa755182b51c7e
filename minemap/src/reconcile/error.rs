//! Per-layer reconciliation errors.

use thiserror::Error;

use crate::geometry::FetchError;
use crate::layer::LayerId;
use crate::overlay::OverlayError;
use crate::surface::SurfaceError;

/// Why a targeted layer could not be mounted in a pass.
///
/// Always scoped to one layer. The layer stays unmounted and is retried on
/// the next pass that still targets it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    /// Network or parse failure while retrieving the geometry
    #[error("Geometry fetch failed: {0}")]
    GeometryFetch(FetchError),

    /// The fetch succeeded but carried no usable feature data
    #[error("Layer {0} has no geometry data")]
    MissingGeometry(LayerId),

    /// The geometry could not be turned into an overlay
    #[error("Overlay construction failed: {0}")]
    OverlayConstruction(#[from] OverlayError),

    /// The host surface refused the overlay
    #[error("Host surface mount failed: {0}")]
    HostMount(#[from] SurfaceError),
}

impl LayerError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerError::GeometryFetch(_) => "geometry_fetch",
            LayerError::MissingGeometry(_) => "missing_geometry",
            LayerError::OverlayConstruction(_) => "overlay_construction",
            LayerError::HostMount(_) => "host_mount",
        }
    }
}

impl From<FetchError> for LayerError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::MissingGeometry(id) => LayerError::MissingGeometry(id),
            other => LayerError::GeometryFetch(other),
        }
    }
}
