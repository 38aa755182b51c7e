//! Local, optimistically-updated copy of the layer list.
//!
//! The dashboard edits its copy of the list immediately (toggle, rename,
//! delete) and refreshes it from the API later. The reconciler is always
//! handed the whole list.

use std::collections::HashSet;

use super::descriptor::LayerDescriptor;
use super::types::LayerId;

/// Ordered collection of descriptors with unique ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerList {
    layers: Vec<LayerDescriptor>,
}

impl LayerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list, e.g. after a catalog refresh.
    ///
    /// Later records sharing an id with an earlier one are dropped.
    pub fn replace(&mut self, layers: Vec<LayerDescriptor>) {
        let mut seen = HashSet::with_capacity(layers.len());
        self.layers = layers
            .into_iter()
            .filter(|layer| {
                let first = seen.insert(layer.id);
                if !first {
                    tracing::warn!(layer_id = %layer.id, "Dropping duplicate layer id");
                }
                first
            })
            .collect();
    }

    /// Adds a new layer at the top of the list. An existing layer with the
    /// same id is replaced instead.
    pub fn add(&mut self, layer: LayerDescriptor) {
        self.layers.retain(|l| l.id != layer.id);
        self.layers.insert(0, layer);
    }

    /// Applies `update` to the layer with `id`. Returns false when absent.
    pub fn update<F>(&mut self, id: LayerId, update: F) -> bool
    where
        F: FnOnce(&mut LayerDescriptor),
    {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                update(layer);
                layer.id = id;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the layer with `id`.
    pub fn remove(&mut self, id: LayerId) -> Option<LayerDescriptor> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(index))
    }

    /// Flips visibility. Returns the new value, or `None` when absent.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id == id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    pub fn set_visibility(&mut self, id: LayerId, visible: bool) -> bool {
        self.update(id, |layer| layer.visible = visible)
    }

    pub fn get(&self, id: LayerId) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn as_slice(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Ids of the layers currently flagged visible, in list order.
    pub fn visible_ids(&self) -> Vec<LayerId> {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.id)
            .collect()
    }
}

impl From<Vec<LayerDescriptor>> for LayerList {
    fn from(layers: Vec<LayerDescriptor>) -> Self {
        let mut list = Self::new();
        list.replace(layers);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerCategory;

    fn layer(id: u64, visible: bool) -> LayerDescriptor {
        LayerDescriptor::new(id, LayerCategory::Custom).with_visibility(visible)
    }

    #[test]
    fn test_replace_drops_duplicates() {
        let list = LayerList::from(vec![layer(1, true), layer(2, false), layer(1, false)]);
        assert_eq!(list.len(), 2);
        assert!(list.get(LayerId::new(1)).unwrap().visible);
    }

    #[test]
    fn test_replace_full_catalog_keeps_first_of_each_id() {
        let mut list = LayerList::from(vec![layer(99_999, true)]);
        let refresh: Vec<LayerDescriptor> = (0..10_000)
            .chain(0..10_000)
            .map(|id| layer(id, id % 2 == 0))
            .collect();

        list.replace(refresh);

        assert_eq!(list.len(), 10_000);
        assert!(list.get(LayerId::new(99_999)).is_none());
        assert_eq!(list.as_slice()[0].id, LayerId::new(0));
        assert_eq!(list.as_slice()[9_999].id, LayerId::new(9_999));
        assert_eq!(list.visible_ids().len(), 5_000);
    }

    #[test]
    fn test_add_prepends_and_replaces() {
        let mut list = LayerList::from(vec![layer(1, false), layer(2, false)]);
        list.add(layer(3, true));
        assert_eq!(list.as_slice()[0].id, LayerId::new(3));

        list.add(layer(1, true));
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_slice()[0].id, LayerId::new(1));
        assert!(list.as_slice()[0].visible);
    }

    #[test]
    fn test_toggle_visibility() {
        let mut list = LayerList::from(vec![layer(1, false)]);
        assert_eq!(list.toggle_visibility(LayerId::new(1)), Some(true));
        assert_eq!(list.toggle_visibility(LayerId::new(1)), Some(false));
        assert_eq!(list.toggle_visibility(LayerId::new(99)), None);
    }

    #[test]
    fn test_update_cannot_change_identity() {
        let mut list = LayerList::from(vec![layer(1, false)]);
        let updated = list.update(LayerId::new(1), |l| {
            l.name = Some("Renamed".to_string());
            l.id = LayerId::new(50);
        });
        assert!(updated);
        assert_eq!(
            list.get(LayerId::new(1)).unwrap().name.as_deref(),
            Some("Renamed")
        );
    }

    #[test]
    fn test_remove_and_visible_ids() {
        let mut list = LayerList::from(vec![layer(1, true), layer(2, true), layer(3, false)]);
        assert!(list.remove(LayerId::new(2)).is_some());
        assert!(list.remove(LayerId::new(2)).is_none());
        assert_eq!(list.visible_ids(), vec![LayerId::new(1)]);
        assert!(list.set_visibility(LayerId::new(3), true));
        assert_eq!(list.visible_ids(), vec![LayerId::new(1), LayerId::new(3)]);
    }
}
