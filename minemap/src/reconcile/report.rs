//! Summary of one reconciliation pass.

use std::fmt;

use super::error::LayerError;
use crate::layer::LayerId;

/// What a pass did, per layer id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Unmounted because no longer visible or no longer listed
    pub removed: Vec<LayerId>,
    /// Fetched, built and mounted in this pass
    pub mounted: Vec<LayerId>,
    /// Targeted but failed; the error was also sent to `on_layer_error`
    pub failed: Vec<(LayerId, LayerError)>,
    /// Fetch completed after the layer stopped being targeted; discarded
    pub superseded: Vec<LayerId>,
    /// Already mounted and still visible
    pub unchanged: Vec<LayerId>,
    /// Still being fetched by an earlier pass
    pub pending: Vec<LayerId>,
}

impl PassReport {
    /// True when no targeted layer failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// True when the pass changed nothing on the surface.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.mounted.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<LayerId> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mounted, {} removed, {} failed, {} unchanged",
            self.mounted.len(),
            self.removed.len(),
            self.failed.len(),
            self.unchanged.len()
        )?;
        if !self.pending.is_empty() {
            write!(f, ", {} pending", self.pending.len())?;
        }
        if !self.superseded.is_empty() {
            write!(f, ", {} superseded", self.superseded.len())?;
        }
        Ok(())
    }
}
