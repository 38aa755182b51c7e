//! Overlay construction and interaction.
//!
//! The [`OverlayFactory`] turns a descriptor, its geometry and its resolved
//! style into a [`LiveOverlay`]: markers for points, polylines for lines,
//! filled shapes for polygons, with a popup, a tooltip and pointer handlers
//! bound to every part.

mod factory;
mod popup;
mod types;

pub use factory::{OverlayError, OverlayFactory, TOOLTIP_CLASS};
pub use popup::{escape_html, PopupContent, POPUP_CLASS, POPUP_MAX_WIDTH};
pub use types::{
    ClickHandler, ClickInvocation, InteractionEffect, InteractionKind, LatLng, LiveOverlay,
    MarkerIcon, OverlayPart, PointerEvent, Popup, Primitive, Tooltip, TooltipDirection,
};
