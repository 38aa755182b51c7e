//! The declarative layer record and its validation boundary.
//!
//! Descriptors arrive from the geoportal API as JSON. Field names are
//! accepted in both camelCase (`isVisible`, as the backend serializes) and
//! snake_case (`is_visible`, as the dashboard's local updates write them).
//!
//! Visibility is the one field whose typing matters for reconciliation:
//! a JSON boolean is taken as-is, an absent or `null` value is `false`, and
//! anything else rejects the record. There is no truthiness coercion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::types::{LayerCategory, LayerId, LayerStatus};
use crate::style::StyleOverride;

/// Placeholder shown for layers without a name.
pub const UNTITLED: &str = "Sans nom";

/// Errors raised when a raw API record cannot become a [`LayerDescriptor`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescriptorError {
    /// The visibility flag was present but not a boolean.
    #[error("Layer {id}: visibility must be a boolean, got {found}")]
    InvalidVisibility { id: LayerId, found: &'static str },

    /// The record is structurally invalid (missing id, wrong types, ...).
    #[error("Malformed layer record: {0}")]
    Malformed(String),
}

/// Display-only metadata. Never consulted by reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMetadata {
    /// Geometry type reported by the backend (e.g. "Point", "Polygon")
    pub geometry_type: Option<String>,
    /// Format the layer was imported from (e.g. "kml", "geojson")
    pub source_format: Option<String>,
    /// Computed area in square kilometres
    pub area_km2: Option<f64>,
    /// Computed length in kilometres
    pub length_km: Option<f64>,
    /// Number of point features
    pub point_count: Option<u64>,
    /// Creation timestamp (local time of the backend)
    pub created_at: Option<NaiveDateTime>,
}

/// Declarative description of one map layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct LayerDescriptor {
    pub id: LayerId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: LayerCategory,
    pub status: Option<LayerStatus>,
    pub visible: bool,
    pub style_override: Option<StyleOverride>,
    pub metadata: LayerMetadata,
}

impl LayerDescriptor {
    /// Creates a hidden descriptor with no name, status or metadata.
    pub fn new(id: u64, category: LayerCategory) -> Self {
        Self {
            id: LayerId::new(id),
            name: None,
            description: None,
            category,
            status: None,
            visible: false,
            style_override: None,
            metadata: LayerMetadata::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: LayerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_style_override(mut self, style: StyleOverride) -> Self {
        self.style_override = Some(style);
        self
    }

    pub fn with_metadata(mut self, metadata: LayerMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The name, or a placeholder for unnamed layers.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNTITLED)
    }

    /// Validates a raw API record.
    ///
    /// Unlike going through `serde_json::from_value`, this keeps the typed
    /// [`DescriptorError`] so callers can report rejected records precisely.
    pub fn from_value(value: &Value) -> Result<Self, DescriptorError> {
        let raw = RawDescriptor::deserialize(value)
            .map_err(|e| DescriptorError::Malformed(e.to_string()))?;
        Self::try_from(raw)
    }
}

/// Wire shape of a layer record, before validation.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "layerType", alias = "layer_type")]
    layer_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "isVisible", alias = "is_visible")]
    is_visible: Option<Value>,
    #[serde(default, rename = "styleConfig", alias = "style_config")]
    style_config: Option<Value>,
    #[serde(default, rename = "geometryType", alias = "geometry_type")]
    geometry_type: Option<String>,
    #[serde(default, rename = "sourceFormat", alias = "source_format")]
    source_format: Option<String>,
    #[serde(default, rename = "areaKm2", alias = "area_km2")]
    area_km2: Option<Value>,
    #[serde(default, rename = "lengthKm", alias = "length_km")]
    length_km: Option<Value>,
    #[serde(default, rename = "pointCount", alias = "point_count", alias = "featureCount")]
    point_count: Option<Value>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    created_at: Option<String>,
}

impl TryFrom<RawDescriptor> for LayerDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        let id = LayerId::new(raw.id);
        let visible = match raw.is_visible {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => b,
            Some(other) => {
                return Err(DescriptorError::InvalidVisibility {
                    id,
                    found: json_type_name(&other),
                })
            }
        };

        let style_override = raw.style_config.and_then(|value| {
            if value.is_null() {
                return None;
            }
            match serde_json::from_value::<StyleOverride>(value) {
                Ok(style) if !style.is_empty() => Some(style),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(layer_id = %id, error = %e, "Ignoring malformed style override");
                    None
                }
            }
        });

        Ok(Self {
            id,
            name: non_blank(raw.name),
            description: non_blank(raw.description),
            category: raw
                .layer_type
                .as_deref()
                .map(LayerCategory::from_api)
                .unwrap_or_default(),
            status: raw.status.as_deref().and_then(LayerStatus::from_api),
            visible,
            style_override,
            metadata: LayerMetadata {
                geometry_type: non_blank(raw.geometry_type),
                source_format: non_blank(raw.source_format),
                area_km2: raw.area_km2.as_ref().and_then(lenient_f64),
                length_km: raw.length_km.as_ref().and_then(lenient_f64),
                point_count: raw.point_count.as_ref().and_then(lenient_u64),
                created_at: raw.created_at.as_deref().and_then(parse_timestamp),
            },
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// The backend serializes Decimal columns either as numbers or as strings.
fn lenient_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Parses RFC 3339 timestamps and the offset-less ISO form Python emits.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    tracing::debug!(value, "Unparseable layer timestamp");
    None
}
