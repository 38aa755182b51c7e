//! Feature collection types and bounding boxes.
//!
//! Positions follow GeoJSON ordering: `[longitude, latitude, (altitude)]`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A GeoJSON position. Extra ordinates beyond the second are carried but
/// never interpreted.
pub type Position = Vec<f64>;

/// Why a JSON value is not a usable GeoJSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoJsonError {
    #[error("GeoJSON value must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("Unsupported GeoJSON type: {0}")]
    UnsupportedType(String),

    #[error("Invalid {kind}: {message}")]
    Invalid { kind: String, message: String },
}

/// GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// The GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Calls `f` with every position, recursing into collections.
    pub fn for_each_position<F>(&self, f: &mut F)
    where
        F: FnMut(&[f64]),
    {
        match self {
            Geometry::Point { coordinates } => f(coordinates.as_slice()),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().for_each(|p| f(p.as_slice()))
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().flatten().for_each(|p| f(p.as_slice()))
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(|p| f(p.as_slice()))
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.for_each_position(f);
                }
            }
        }
    }
}

/// A geometry plus its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Geometry of one layer, as a feature collection.
///
/// Immutable once loaded and shared with the overlay through an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeometryPayload {
    pub features: Vec<Feature>,
}

impl GeometryPayload {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Parses a GeoJSON object.
    ///
    /// A `FeatureCollection` is taken as-is; a bare `Feature` or a bare
    /// geometry becomes a one-feature collection.
    pub fn from_geojson(value: Value) -> Result<Self, GeoJsonError> {
        let object = match &value {
            Value::Object(object) => object,
            other => return Err(GeoJsonError::NotAnObject(json_kind(other))),
        };

        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match kind.as_str() {
            "FeatureCollection" => {
                #[derive(Deserialize)]
                struct Collection {
                    features: Vec<Feature>,
                }
                let collection: Collection =
                    serde_json::from_value(value).map_err(|e| invalid(&kind, e))?;
                Ok(Self::new(collection.features))
            }
            "Feature" => {
                let feature: Feature =
                    serde_json::from_value(value).map_err(|e| invalid(&kind, e))?;
                Ok(Self::new(vec![feature]))
            }
            "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon"
            | "MultiPolygon" | "GeometryCollection" => {
                let geometry: Geometry =
                    serde_json::from_value(value).map_err(|e| invalid(&kind, e))?;
                Ok(Self::new(vec![Feature::new(geometry)]))
            }
            _ => Err(GeoJsonError::UnsupportedType(kind)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Bounding box of all finite positions, or `None` when there are none.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut bounds: Option<BoundingBox> = None;
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            geometry.for_each_position(&mut |position| {
                if let [lon, lat, ..] = *position {
                    if lon.is_finite() && lat.is_finite() {
                        let point = BoundingBox::point(lat, lon);
                        bounds = Some(match bounds {
                            Some(b) => b.union(&point),
                            None => point,
                        });
                    }
                }
            });
        }
        bounds
    }
}

fn invalid(kind: &str, e: serde_json::Error) -> GeoJsonError {
    GeoJsonError::Invalid {
        kind: kind.to_string(),
        message: e.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// A degenerate box around a single point.
    pub fn point(lat: f64, lon: f64) -> Self {
        Self::new(lat, lon, lat, lon)
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Centre as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}
