//! Overlay primitives and the mounted overlay itself.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::geometry::{BoundingBox, Feature, GeometryPayload};
use crate::layer::{LayerCategory, LayerDescriptor, LayerId};
use crate::style::StyleRecord;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Marker icon for point features, one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub glyph: &'static str,
    /// Class of the inner element, carries the category colours
    pub marker_class: &'static str,
    /// Class of the icon container
    pub container_class: &'static str,
    pub size: (u32, u32),
    pub anchor: (i32, i32),
    pub popup_anchor: (i32, i32),
}

impl MarkerIcon {
    pub fn for_category(category: LayerCategory) -> Self {
        let (glyph, marker_class) = match category {
            LayerCategory::Deposit => ("⛏️", "deposit-marker"),
            LayerCategory::Infrastructure => ("🏗️", "infrastructure-marker"),
            LayerCategory::AdministrativeZone => ("🗺️", "zone-marker"),
            LayerCategory::Custom => ("📍", "custom-marker-icon"),
        };

        Self {
            glyph,
            marker_class,
            container_class: "custom-div-icon",
            size: (32, 32),
            anchor: (16, 32),
            popup_anchor: (0, -32),
        }
    }

    /// Inner HTML of the icon.
    pub fn html(&self) -> String {
        format!(
            r#"<div class="custom-marker {}">{}</div>"#,
            self.marker_class, self.glyph
        )
    }
}

/// Drawable shape of one overlay part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Point feature with a category icon. Not stroked.
    Marker { position: LatLng, icon: MarkerIcon },
    /// One or more paths
    Polyline { paths: Vec<Vec<LatLng>> },
    /// One or more polygons, each an outer ring followed by holes
    Polygon { polygons: Vec<Vec<Vec<LatLng>>> },
}

impl Primitive {
    pub fn is_marker(&self) -> bool {
        matches!(self, Primitive::Marker { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Marker { .. } => "marker",
            Primitive::Polyline { .. } => "polyline",
            Primitive::Polygon { .. } => "polygon",
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        let points: Box<dyn Iterator<Item = &LatLng> + '_> = match self {
            Primitive::Marker { position, .. } => Box::new(std::iter::once(position)),
            Primitive::Polyline { paths } => Box::new(paths.iter().flatten()),
            Primitive::Polygon { polygons } => Box::new(polygons.iter().flatten().flatten()),
        };

        points
            .map(|p| BoundingBox::point(p.lat, p.lng))
            .reduce(|a, b| a.union(&b))
    }
}

/// Popup bound to every part of an overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    /// Plain text rendering, one line per row
    pub text: String,
    /// Escaped HTML rendering
    pub html: String,
    pub max_width: u32,
    pub class_name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipDirection {
    Top,
    Bottom,
    Left,
    Right,
}

/// Hover tooltip. Shows the layer name only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub permanent: bool,
    pub direction: TooltipDirection,
    pub class_name: &'static str,
}

/// One renderable piece of an overlay, built from one feature (or one
/// member of a multi-geometry).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPart {
    /// Index of the source feature in the geometry payload
    pub feature_index: usize,
    pub primitive: Primitive,
}

/// Pointer interaction reported by the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    HoverIn,
    HoverOut,
}

/// A host pointer event targeting one part of an overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: InteractionKind,
    /// Map position under the pointer, when the host knows it
    pub position: Option<LatLng>,
}

impl PointerEvent {
    pub fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }

    pub fn at(mut self, position: LatLng) -> Self {
        self.position = Some(position);
        self
    }
}

/// Caller-supplied click handler: `(descriptor, feature, event)`.
pub type ClickHandler = Arc<dyn Fn(&LayerDescriptor, &Feature, &PointerEvent) + Send + Sync>;

/// A click ready to be forwarded to the caller.
///
/// Firing is separated from handling so the reconciler can release its
/// state lock first.
#[derive(Clone)]
pub struct ClickInvocation {
    handler: ClickHandler,
    descriptor: Arc<LayerDescriptor>,
    geometry: Arc<GeometryPayload>,
    feature_index: usize,
    event: PointerEvent,
}

impl ClickInvocation {
    pub fn fire(&self) {
        if let Some(feature) = self.geometry.features.get(self.feature_index) {
            (self.handler)(&self.descriptor, feature, &self.event);
        }
    }

    pub fn feature_index(&self) -> usize {
        self.feature_index
    }
}

impl fmt::Debug for ClickInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickInvocation")
            .field("layer_id", &self.descriptor.id)
            .field("feature_index", &self.feature_index)
            .field("event", &self.event)
            .finish()
    }
}

/// Outcome of routing a pointer event into an overlay.
#[derive(Debug, Clone)]
pub enum InteractionEffect {
    /// The part must be repainted with this style
    Restyle(StyleRecord),
    /// The caller's click handler must be invoked
    Click(ClickInvocation),
}

/// A layer as mounted on the host surface.
///
/// Holds a snapshot of the descriptor it was built from, the resolved
/// style, the shared geometry and one part per renderable feature.
pub struct LiveOverlay {
    descriptor: Arc<LayerDescriptor>,
    style: StyleRecord,
    geometry: Arc<GeometryPayload>,
    parts: Vec<OverlayPart>,
    popup: Popup,
    tooltip: Option<Tooltip>,
    on_click: Option<ClickHandler>,
    hovered: Mutex<Vec<bool>>,
}

impl LiveOverlay {
    pub(crate) fn new(
        descriptor: Arc<LayerDescriptor>,
        style: StyleRecord,
        geometry: Arc<GeometryPayload>,
        parts: Vec<OverlayPart>,
        popup: Popup,
        tooltip: Option<Tooltip>,
        on_click: Option<ClickHandler>,
    ) -> Self {
        let hovered = Mutex::new(vec![false; parts.len()]);
        Self {
            descriptor,
            style,
            geometry,
            parts,
            popup,
            tooltip,
            on_click,
            hovered,
        }
    }

    pub fn id(&self) -> LayerId {
        self.descriptor.id
    }

    pub fn descriptor(&self) -> &LayerDescriptor {
        &self.descriptor
    }

    /// The resolved, non-hovered style.
    pub fn style(&self) -> &StyleRecord {
        &self.style
    }

    pub fn geometry(&self) -> &Arc<GeometryPayload> {
        &self.geometry
    }

    pub fn parts(&self) -> &[OverlayPart] {
        &self.parts
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Number of marker parts.
    pub fn marker_count(&self) -> usize {
        self.parts.iter().filter(|p| p.primitive.is_marker()).count()
    }

    /// Style currently painted on `part`, `None` for markers and unknown
    /// parts.
    pub fn current_style(&self, part: usize) -> Option<StyleRecord> {
        let primitive = &self.parts.get(part)?.primitive;
        if primitive.is_marker() {
            return None;
        }
        let hovered = self.hovered.lock().get(part).copied().unwrap_or(false);
        Some(if hovered {
            self.style.highlighted()
        } else {
            self.style.clone()
        })
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.parts
            .iter()
            .filter_map(|p| p.primitive.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Routes a pointer event to the part's handlers.
    ///
    /// Hover only affects stroked parts; markers ignore it. Repeated
    /// hover-in (or hover-out) events on the same part produce no effect.
    pub fn handle(&self, part: usize, event: &PointerEvent) -> Option<InteractionEffect> {
        let target = self.parts.get(part)?;

        match event.kind {
            InteractionKind::Click => {
                let handler = self.on_click.clone()?;
                Some(InteractionEffect::Click(ClickInvocation {
                    handler,
                    descriptor: Arc::clone(&self.descriptor),
                    geometry: Arc::clone(&self.geometry),
                    feature_index: target.feature_index,
                    event: event.clone(),
                }))
            }
            InteractionKind::HoverIn | InteractionKind::HoverOut => {
                if target.primitive.is_marker() {
                    return None;
                }
                let entering = event.kind == InteractionKind::HoverIn;
                let mut hovered = self.hovered.lock();
                let slot = hovered.get_mut(part)?;
                if *slot == entering {
                    return None;
                }
                *slot = entering;
                Some(InteractionEffect::Restyle(if entering {
                    self.style.highlighted()
                } else {
                    self.style.clone()
                }))
            }
        }
    }
}

impl fmt::Debug for LiveOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveOverlay")
            .field("id", &self.descriptor.id)
            .field("parts", &self.parts.len())
            .field("style", &self.style)
            .field("clickable", &self.on_click.is_some())
            .finish()
    }
}
