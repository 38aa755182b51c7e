//! The host map surface the reconciler mounts overlays onto.
//!
//! The surface is the only stateful external collaborator. The reconciler
//! serializes every call to it.

mod memory;
mod resources;

pub use memory::{MemorySurface, MountedEntry, SurfaceCall};
pub use resources::{SurfaceResources, STYLESHEET_ID};

use thiserror::Error;

use crate::geometry::BoundingBox;
use crate::layer::LayerId;
use crate::overlay::LiveOverlay;
use crate::style::StyleRecord;

/// Errors raised by a host surface when mounting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface refused the overlay
    #[error("Surface rejected layer {id}: {reason}")]
    Rejected { id: LayerId, reason: String },

    /// An overlay with this id is already on the surface
    #[error("Layer {0} is already mounted")]
    AlreadyMounted(LayerId),
}

/// Interface to the interactive map view.
pub trait HostSurface: Send {
    /// One-time registration of static resources.
    fn install(&mut self, resources: &SurfaceResources);

    fn mount(&mut self, overlay: &LiveOverlay) -> Result<(), SurfaceError>;

    fn unmount(&mut self, overlay: &LiveOverlay);

    /// Repaints one part of a mounted overlay.
    fn restyle(&mut self, id: LayerId, part: usize, style: &StyleRecord);

    /// Bounds of everything mounted, `None` when nothing has extent.
    fn combined_bounds(&self) -> Option<BoundingBox>;
}
