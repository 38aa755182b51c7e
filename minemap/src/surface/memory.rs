//! In-process host surface that records every call.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{HostSurface, SurfaceError, SurfaceResources};
use crate::geometry::BoundingBox;
use crate::layer::LayerId;
use crate::overlay::LiveOverlay;
use crate::style::StyleRecord;

/// A call received by a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Install(&'static str),
    Mount(LayerId),
    Unmount(LayerId),
    Restyle {
        id: LayerId,
        part: usize,
        style: StyleRecord,
    },
}

/// What the surface keeps about a mounted overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedEntry {
    pub name: Option<String>,
    pub parts: usize,
    pub markers: usize,
    pub bounds: Option<BoundingBox>,
}

#[derive(Debug, Default)]
struct MemoryState {
    calls: Vec<SurfaceCall>,
    mounted: BTreeMap<LayerId, MountedEntry>,
    stylesheets: Vec<&'static str>,
    rejected: HashSet<LayerId>,
    peak_mounted: usize,
}

/// Host surface kept in memory.
///
/// Clones share state, so a test can keep a handle on a surface owned by
/// the reconciler.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later mount of `id` fail.
    pub fn reject(&self, id: LayerId) {
        self.state.lock().rejected.insert(id);
    }

    /// Accepts mounts of `id` again.
    pub fn accept(&self, id: LayerId) {
        self.state.lock().rejected.remove(&id);
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Mounted ids, sorted.
    pub fn mounted_ids(&self) -> Vec<LayerId> {
        self.state.lock().mounted.keys().copied().collect()
    }

    pub fn mounted(&self, id: LayerId) -> Option<MountedEntry> {
        self.state.lock().mounted.get(&id).cloned()
    }

    pub fn mount_count(&self, id: LayerId) -> usize {
        self.count(|call| *call == SurfaceCall::Mount(id))
    }

    pub fn unmount_count(&self, id: LayerId) -> usize {
        self.count(|call| *call == SurfaceCall::Unmount(id))
    }

    /// Largest number of simultaneously mounted overlays seen so far.
    pub fn peak_mounted(&self) -> usize {
        self.state.lock().peak_mounted
    }

    pub fn stylesheets(&self) -> Vec<&'static str> {
        self.state.lock().stylesheets.clone()
    }

    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&SurfaceCall) -> bool,
    {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }
}

impl HostSurface for MemorySurface {
    fn install(&mut self, resources: &SurfaceResources) {
        let mut state = self.state.lock();
        state.calls.push(SurfaceCall::Install(resources.stylesheet_id));
        if !state.stylesheets.contains(&resources.stylesheet_id) {
            state.stylesheets.push(resources.stylesheet_id);
        }
    }

    fn mount(&mut self, overlay: &LiveOverlay) -> Result<(), SurfaceError> {
        let id = overlay.id();
        let mut state = self.state.lock();

        if state.rejected.contains(&id) {
            return Err(SurfaceError::Rejected {
                id,
                reason: "surface refused overlay".to_string(),
            });
        }
        if state.mounted.contains_key(&id) {
            return Err(SurfaceError::AlreadyMounted(id));
        }

        state.calls.push(SurfaceCall::Mount(id));
        state.mounted.insert(
            id,
            MountedEntry {
                name: overlay.descriptor().name.clone(),
                parts: overlay.parts().len(),
                markers: overlay.marker_count(),
                bounds: overlay.bounds(),
            },
        );
        state.peak_mounted = state.peak_mounted.max(state.mounted.len());
        Ok(())
    }

    fn unmount(&mut self, overlay: &LiveOverlay) {
        let id = overlay.id();
        let mut state = self.state.lock();
        state.calls.push(SurfaceCall::Unmount(id));
        state.mounted.remove(&id);
    }

    fn restyle(&mut self, id: LayerId, part: usize, style: &StyleRecord) {
        self.state.lock().calls.push(SurfaceCall::Restyle {
            id,
            part,
            style: style.clone(),
        });
    }

    fn combined_bounds(&self) -> Option<BoundingBox> {
        self.state
            .lock()
            .mounted
            .values()
            .filter_map(|entry| entry.bounds)
            .reduce(|a, b| a.union(&b))
    }
}
