//! Builds [`LiveOverlay`]s from a descriptor, its geometry and its style.

use std::sync::Arc;

use thiserror::Error;

use super::popup::PopupContent;
use super::types::{
    ClickHandler, LatLng, LiveOverlay, MarkerIcon, OverlayPart, Primitive, Tooltip,
    TooltipDirection,
};
use crate::geometry::{Geometry, GeometryPayload, Position};
use crate::layer::LayerDescriptor;
use crate::style::StyleRecord;

pub const TOOLTIP_CLASS: &str = "geospatial-tooltip";

/// Errors raised while turning geometry into overlay parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("Invalid geometry in feature {feature}: {reason}")]
    InvalidGeometry { feature: usize, reason: String },
}

/// Constructs overlays. Holds the interaction wiring shared by all of them.
#[derive(Clone, Default)]
pub struct OverlayFactory {
    on_click: Option<ClickHandler>,
}

impl OverlayFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards clicks on any part to `handler`.
    pub fn with_click_handler(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    /// Builds an overlay. Neither the descriptor nor the geometry is
    /// modified; the descriptor is snapshotted into the overlay.
    ///
    /// Features without geometry are skipped. Any invalid position fails
    /// the whole overlay.
    pub fn build(
        &self,
        descriptor: &LayerDescriptor,
        geometry: Arc<GeometryPayload>,
        style: StyleRecord,
    ) -> Result<LiveOverlay, OverlayError> {
        let icon = MarkerIcon::for_category(descriptor.category);
        let mut parts = Vec::new();

        for (index, feature) in geometry.features.iter().enumerate() {
            if let Some(shape) = &feature.geometry {
                push_parts(shape, index, icon, &mut parts)?;
            }
        }

        let popup = PopupContent::from_descriptor(descriptor).into_popup();
        let tooltip = descriptor.name.as_ref().map(|name| Tooltip {
            text: name.clone(),
            permanent: false,
            direction: TooltipDirection::Top,
            class_name: TOOLTIP_CLASS,
        });

        Ok(LiveOverlay::new(
            Arc::new(descriptor.clone()),
            style,
            geometry,
            parts,
            popup,
            tooltip,
            self.on_click.clone(),
        ))
    }
}

impl std::fmt::Debug for OverlayFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayFactory")
            .field("clickable", &self.on_click.is_some())
            .finish()
    }
}

fn push_parts(
    geometry: &Geometry,
    feature: usize,
    icon: MarkerIcon,
    parts: &mut Vec<OverlayPart>,
) -> Result<(), OverlayError> {
    let part = |primitive| OverlayPart {
        feature_index: feature,
        primitive,
    };

    match geometry {
        Geometry::Point { coordinates } => {
            let position = lat_lng(coordinates, feature)?;
            parts.push(part(Primitive::Marker { position, icon }));
        }
        Geometry::MultiPoint { coordinates } => {
            for coordinates in coordinates {
                let position = lat_lng(coordinates, feature)?;
                parts.push(part(Primitive::Marker { position, icon }));
            }
        }
        Geometry::LineString { coordinates } => {
            parts.push(part(Primitive::Polyline {
                paths: vec![path(coordinates, feature)?],
            }));
        }
        Geometry::MultiLineString { coordinates } => {
            let paths = coordinates
                .iter()
                .map(|line| path(line, feature))
                .collect::<Result<Vec<_>, _>>()?;
            parts.push(part(Primitive::Polyline { paths }));
        }
        Geometry::Polygon { coordinates } => {
            parts.push(part(Primitive::Polygon {
                polygons: vec![rings(coordinates, feature)?],
            }));
        }
        Geometry::MultiPolygon { coordinates } => {
            let polygons = coordinates
                .iter()
                .map(|polygon| rings(polygon, feature))
                .collect::<Result<Vec<_>, _>>()?;
            parts.push(part(Primitive::Polygon { polygons }));
        }
        Geometry::GeometryCollection { geometries } => {
            for member in geometries {
                push_parts(member, feature, icon, parts)?;
            }
        }
    }

    Ok(())
}

fn invalid(feature: usize, reason: impl Into<String>) -> OverlayError {
    OverlayError::InvalidGeometry {
        feature,
        reason: reason.into(),
    }
}

fn lat_lng(position: &Position, feature: usize) -> Result<LatLng, OverlayError> {
    let [lng, lat, ..] = position[..] else {
        return Err(invalid(
            feature,
            format!("position has {} ordinates, expected at least 2", position.len()),
        ));
    };
    if !lng.is_finite() || !lat.is_finite() {
        return Err(invalid(feature, "position has non-finite ordinates"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(invalid(feature, format!("latitude {} out of range", lat)));
    }
    Ok(LatLng::new(lat, lng))
}

fn path(positions: &[Position], feature: usize) -> Result<Vec<LatLng>, OverlayError> {
    if positions.len() < 2 {
        return Err(invalid(
            feature,
            format!("line has {} positions, expected at least 2", positions.len()),
        ));
    }
    positions.iter().map(|p| lat_lng(p, feature)).collect()
}

fn rings(polygon: &[Vec<Position>], feature: usize) -> Result<Vec<Vec<LatLng>>, OverlayError> {
    if polygon.is_empty() {
        return Err(invalid(feature, "polygon has no rings"));
    }
    polygon
        .iter()
        .map(|ring| {
            if ring.len() < 4 {
                return Err(invalid(
                    feature,
                    format!("ring has {} positions, expected at least 4", ring.len()),
                ));
            }
            ring.iter().map(|p| lat_lng(p, feature)).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Feature;
    use crate::layer::LayerCategory;
    use crate::layer::LayerStatus;
    use crate::overlay::{InteractionEffect, InteractionKind, PointerEvent};
    use crate::style::resolve;
    use parking_lot::Mutex;
    use serde_json::json;

    fn deposit() -> LayerDescriptor {
        LayerDescriptor::new(1, LayerCategory::Deposit)
            .with_name("Gisements d'or")
            .with_status(LayerStatus::Active)
            .with_visibility(true)
    }

    fn style_for(descriptor: &LayerDescriptor) -> StyleRecord {
        resolve(descriptor.category, descriptor.status, None)
    }

    fn payload(value: serde_json::Value) -> Arc<GeometryPayload> {
        Arc::new(GeometryPayload::from_geojson(value).unwrap())
    }

    fn square() -> serde_json::Value {
        json!({"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]})
    }

    #[test]
    fn test_point_becomes_category_marker() {
        let descriptor = deposit();
        let overlay = OverlayFactory::new()
            .build(
                &descriptor,
                payload(json!({"type": "Point", "coordinates": [-5.5, 7.5]})),
                style_for(&descriptor),
            )
            .unwrap();

        assert_eq!(overlay.parts().len(), 1);
        match &overlay.parts()[0].primitive {
            Primitive::Marker { position, icon } => {
                assert_eq!(*position, LatLng::new(7.5, -5.5));
                assert_eq!(icon.glyph, "⛏️");
                assert_eq!(icon.size, (32, 32));
                assert_eq!(icon.anchor, (16, 32));
                assert_eq!(icon.popup_anchor, (0, -32));
            }
            other => panic!("expected marker, got {:?}", other),
        }
        assert!(overlay.popup().text.contains("Gisements d'or"));
        assert!(overlay.popup().text.contains("Type: Gisement Minier"));
    }

    #[test]
    fn test_primitives_per_geometry_type() {
        let descriptor = LayerDescriptor::new(2, LayerCategory::Infrastructure);
        let geometry = payload(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}},
                {"type": "Feature", "geometry": square()},
                {"type": "Feature", "geometry": {"type": "MultiPoint", "coordinates": [[0.0, 0.0], [2.0, 2.0]]}},
                {"type": "Feature", "geometry": null},
                {"type": "Feature", "geometry": {"type": "GeometryCollection", "geometries": [
                    {"type": "Point", "coordinates": [3.0, 3.0]}, square()
                ]}}
            ]
        }));

        let overlay = OverlayFactory::new()
            .build(&descriptor, geometry, style_for(&descriptor))
            .unwrap();

        let kinds: Vec<_> = overlay.parts().iter().map(|p| p.primitive.kind()).collect();
        assert_eq!(
            kinds,
            vec!["polyline", "polygon", "marker", "marker", "marker", "polygon"]
        );
        let features: Vec<_> = overlay.parts().iter().map(|p| p.feature_index).collect();
        assert_eq!(features, vec![0, 1, 2, 2, 4, 4]);
        assert_eq!(overlay.marker_count(), 3);
    }

    #[test]
    fn test_empty_geometry_builds_empty_overlay() {
        let descriptor = deposit();
        let overlay = OverlayFactory::new()
            .build(
                &descriptor,
                Arc::new(GeometryPayload::default()),
                style_for(&descriptor),
            )
            .unwrap();
        assert!(overlay.parts().is_empty());
        assert_eq!(overlay.bounds(), None);
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let descriptor = deposit();
        let cases = [
            json!({"type": "Point", "coordinates": [1.0]}),
            json!({"type": "Point", "coordinates": [1.0, 95.0]}),
            json!({"type": "LineString", "coordinates": [[0.0, 0.0]]}),
            json!({"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]}),
            json!({"type": "Polygon", "coordinates": []}),
        ];

        for case in cases {
            let result = OverlayFactory::new().build(&descriptor, payload(case.clone()), style_for(&descriptor));
            assert!(
                matches!(result, Err(OverlayError::InvalidGeometry { feature: 0, .. })),
                "accepted {}",
                case
            );
        }
    }

    #[test]
    fn test_non_finite_position_is_rejected() {
        let descriptor = deposit();
        let geometry = Arc::new(GeometryPayload::new(vec![Feature::new(Geometry::Point {
            coordinates: vec![f64::NAN, 1.0],
        })]));
        assert!(OverlayFactory::new()
            .build(&descriptor, geometry, style_for(&descriptor))
            .is_err());
    }

    #[test]
    fn test_build_does_not_mutate_inputs() {
        let descriptor = deposit();
        let geometry = payload(square());
        let before = (descriptor.clone(), (*geometry).clone());

        let overlay = OverlayFactory::new()
            .build(&descriptor, Arc::clone(&geometry), style_for(&descriptor))
            .unwrap();

        assert_eq!(before, (descriptor, (*geometry).clone()));
        assert!(Arc::ptr_eq(overlay.geometry(), &geometry));
    }

    #[test]
    fn test_tooltip_shows_name_only() {
        let descriptor = deposit().with_description("long description");
        let overlay = OverlayFactory::new()
            .build(&descriptor, payload(square()), style_for(&descriptor))
            .unwrap();
        let tooltip = overlay.tooltip().unwrap();
        assert_eq!(tooltip.text, "Gisements d'or");
        assert!(!tooltip.permanent);
        assert_eq!(tooltip.direction, TooltipDirection::Top);

        let unnamed = LayerDescriptor::new(9, LayerCategory::Custom);
        let overlay = OverlayFactory::new()
            .build(&unnamed, payload(square()), style_for(&unnamed))
            .unwrap();
        assert!(overlay.tooltip().is_none());
    }

    #[test]
    fn test_hover_in_and_out() {
        let descriptor = deposit();
        let style = style_for(&descriptor);
        let overlay = OverlayFactory::new()
            .build(&descriptor, payload(square()), style.clone())
            .unwrap();

        let effect = overlay.handle(0, &PointerEvent::new(InteractionKind::HoverIn));
        match effect {
            Some(InteractionEffect::Restyle(hover)) => assert_eq!(hover, style.highlighted()),
            other => panic!("expected restyle, got {:?}", other),
        }
        assert_eq!(overlay.current_style(0), Some(style.highlighted()));
        assert!(overlay
            .handle(0, &PointerEvent::new(InteractionKind::HoverIn))
            .is_none());

        match overlay.handle(0, &PointerEvent::new(InteractionKind::HoverOut)) {
            Some(InteractionEffect::Restyle(back)) => assert_eq!(back, style),
            other => panic!("expected restyle, got {:?}", other),
        }
        assert_eq!(overlay.current_style(0), Some(style));
    }

    #[test]
    fn test_markers_ignore_hover() {
        let descriptor = deposit();
        let overlay = OverlayFactory::new()
            .build(
                &descriptor,
                payload(json!({"type": "Point", "coordinates": [0.0, 0.0]})),
                style_for(&descriptor),
            )
            .unwrap();
        assert!(overlay
            .handle(0, &PointerEvent::new(InteractionKind::HoverIn))
            .is_none());
        assert_eq!(overlay.current_style(0), None);
    }

    #[test]
    fn test_click_forwards_descriptor_and_feature() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let factory = OverlayFactory::new().with_click_handler(Arc::new(
            move |descriptor: &LayerDescriptor, feature: &Feature, event: &PointerEvent| {
                sink.lock().push((
                    descriptor.id,
                    feature.properties.get("name").cloned(),
                    event.position,
                ));
            },
        ));

        let descriptor = deposit();
        let geometry = payload(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}, "properties": {"name": "A"}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}, "properties": {"name": "B"}}
            ]
        }));
        let overlay = factory
            .build(&descriptor, geometry, style_for(&descriptor))
            .unwrap();

        let event = PointerEvent::new(InteractionKind::Click).at(LatLng::new(1.0, 1.0));
        match overlay.handle(1, &event) {
            Some(InteractionEffect::Click(click)) => click.fire(),
            other => panic!("expected click, got {:?}", other),
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, descriptor.id);
        assert_eq!(seen[0].1, Some(json!("B")));
        assert_eq!(seen[0].2, Some(LatLng::new(1.0, 1.0)));
    }

    #[test]
    fn test_click_without_handler_is_ignored() {
        let descriptor = deposit();
        let overlay = OverlayFactory::new()
            .build(&descriptor, payload(square()), style_for(&descriptor))
            .unwrap();
        assert!(overlay
            .handle(0, &PointerEvent::new(InteractionKind::Click))
            .is_none());
        assert!(overlay
            .handle(7, &PointerEvent::new(InteractionKind::Click))
            .is_none());
    }
}
