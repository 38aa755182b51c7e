//! Paint styles for layer overlays.
//!
//! A [`StyleRecord`] is the concrete paint applied to an overlay part. It is
//! produced by [`resolve`] from the layer's category, its status and an
//! optional per-layer [`StyleOverride`].
//!
//! # Example
//!
//! ```
//! use minemap::layer::{LayerCategory, LayerStatus};
//! use minemap::style::{resolve, StyleOverride};
//!
//! let style = resolve(LayerCategory::Deposit, Some(LayerStatus::Exploratory), None);
//! assert_eq!(style.color, "#f59e0b");
//! assert_eq!(style.dash_array.as_deref(), Some("10, 5"));
//!
//! let custom = StyleOverride::new().with_color("#ff0000");
//! let style = resolve(LayerCategory::Deposit, None, Some(&custom));
//! assert_eq!(style.color, "#ff0000");
//! assert_eq!(style.fill_color, "#fbbf24");
//! ```

mod resolver;

pub use resolver::{base_style, resolve, status_modifier, StatusModifier};

use serde::{Deserialize, Serialize};

/// Stroke weight added on hover.
pub const HOVER_WEIGHT_DELTA: f64 = 2.0;

/// Opacity added on hover, capped at 1.0.
pub const HOVER_OPACITY_DELTA: f64 = 0.2;

/// Concrete paint for one overlay part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    /// Stroke colour (CSS hex)
    pub color: String,
    /// Fill colour (CSS hex)
    pub fill_color: String,
    /// Stroke weight in pixels
    pub weight: f64,
    /// Stroke opacity in `[0, 1]`
    pub opacity: f64,
    /// Fill opacity in `[0, 1]`
    pub fill_opacity: f64,
    /// SVG dash pattern, `None` for a solid stroke
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

impl StyleRecord {
    /// The hover style: thicker and more opaque stroke, same hue.
    pub fn highlighted(&self) -> StyleRecord {
        StyleRecord {
            weight: self.weight + HOVER_WEIGHT_DELTA,
            opacity: (self.opacity + HOVER_OPACITY_DELTA).min(1.0),
            ..self.clone()
        }
    }
}

/// Per-layer style overrides (API field `styleConfig`).
///
/// Every field is optional and replaces only its own counterpart in the
/// resolved style. An empty `dash_array` string forces a solid stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(alias = "fill_color", skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(alias = "fill_opacity", skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(alias = "dash_array", skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

impl StyleOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn with_dash_array(mut self, dash: impl Into<String>) -> Self {
        self.dash_array = Some(dash.into());
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.fill_color.is_none()
            && self.weight.is_none()
            && self.opacity.is_none()
            && self.fill_opacity.is_none()
            && self.dash_array.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StyleRecord {
        StyleRecord {
            color: "#3b82f6".to_string(),
            fill_color: "#60a5fa".to_string(),
            weight: 2.0,
            opacity: 0.8,
            fill_opacity: 0.6,
            dash_array: None,
        }
    }

    #[test]
    fn test_highlighted_intensifies_stroke() {
        let hover = record().highlighted();
        assert_eq!(hover.weight, 4.0);
        assert!((hover.opacity - 1.0).abs() < 1e-9);
        assert_eq!(hover.color, "#3b82f6");
        assert_eq!(hover.fill_opacity, 0.6);
    }

    #[test]
    fn test_highlighted_caps_opacity() {
        let mut style = record();
        style.opacity = 0.95;
        assert_eq!(style.highlighted().opacity, 1.0);
    }

    #[test]
    fn test_override_accepts_camel_and_snake_case() {
        let camel: StyleOverride =
            serde_json::from_str(r##"{"fillColor": "#000", "dashArray": "2, 2"}"##).unwrap();
        let snake: StyleOverride =
            serde_json::from_str(r##"{"fill_color": "#000", "dash_array": "2, 2"}"##).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.fill_color.as_deref(), Some("#000"));
    }

    #[test]
    fn test_override_ignores_unknown_keys() {
        let style: StyleOverride =
            serde_json::from_str(r#"{"iconUrl": "x.png", "weight": 4}"#).unwrap();
        assert_eq!(style.weight, Some(4.0));
        assert!(!style.is_empty());
    }

    #[test]
    fn test_empty_override() {
        assert!(StyleOverride::new().is_empty());
        let style: StyleOverride = serde_json::from_str("{}").unwrap();
        assert!(style.is_empty());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["fillColor"], "#60a5fa");
        assert!(json.get("dashArray").is_none());
    }
}
