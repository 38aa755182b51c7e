//! Output callbacks exposed to the hosting application.

use std::fmt;
use std::sync::Arc;

use super::error::LayerError;
use crate::geometry::Feature;
use crate::layer::LayerDescriptor;
use crate::overlay::{ClickHandler, LiveOverlay, PointerEvent};

/// Called once per layer mounted in a pass.
pub type LoadHandler = Arc<dyn Fn(&LayerDescriptor, &LiveOverlay) + Send + Sync>;

/// Called once per targeted layer that failed in a pass.
pub type ErrorHandler = Arc<dyn Fn(&LayerDescriptor, &LayerError) + Send + Sync>;

/// Caller hooks. Every hook is optional and fires with no engine lock held.
#[derive(Clone, Default)]
pub struct LayerCallbacks {
    pub(crate) on_layer_click: Option<ClickHandler>,
    pub(crate) on_layer_load: Option<LoadHandler>,
    pub(crate) on_layer_error: Option<ErrorHandler>,
}

impl LayerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_layer_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LayerDescriptor, &Feature, &PointerEvent) + Send + Sync + 'static,
    {
        self.on_layer_click = Some(Arc::new(handler));
        self
    }

    pub fn on_layer_load<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LayerDescriptor, &LiveOverlay) + Send + Sync + 'static,
    {
        self.on_layer_load = Some(Arc::new(handler));
        self
    }

    pub fn on_layer_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LayerDescriptor, &LayerError) + Send + Sync + 'static,
    {
        self.on_layer_error = Some(Arc::new(handler));
        self
    }

    pub(crate) fn loaded(&self, descriptor: &LayerDescriptor, overlay: &LiveOverlay) {
        if let Some(handler) = &self.on_layer_load {
            handler(descriptor, overlay);
        }
    }

    pub(crate) fn failed(&self, descriptor: &LayerDescriptor, error: &LayerError) {
        if let Some(handler) = &self.on_layer_error {
            handler(descriptor, error);
        }
    }
}

impl fmt::Debug for LayerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerCallbacks")
            .field("on_layer_click", &self.on_layer_click.is_some())
            .field("on_layer_load", &self.on_layer_load.is_some())
            .field("on_layer_error", &self.on_layer_error.is_some())
            .finish()
    }
}
