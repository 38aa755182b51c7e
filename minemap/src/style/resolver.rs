//! Category, status and override precedence.

use super::{StyleOverride, StyleRecord};
use crate::layer::{LayerCategory, LayerStatus};

/// Stroke weight shared by every category.
pub const BASE_WEIGHT: f64 = 2.0;

/// Opacity and dash adjustments applied on top of the category base.
///
/// Status never changes hue so the category stays recognisable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusModifier {
    pub opacity: f64,
    pub fill_opacity: f64,
    pub dash_array: Option<&'static str>,
}

/// Base style for a category.
pub fn base_style(category: LayerCategory) -> StyleRecord {
    let (color, fill_color) = match category {
        LayerCategory::Deposit => ("#f59e0b", "#fbbf24"),
        LayerCategory::Infrastructure => ("#3b82f6", "#60a5fa"),
        LayerCategory::AdministrativeZone => ("#10b981", "#34d399"),
        LayerCategory::Custom => ("#8b5cf6", "#a78bfa"),
    };

    StyleRecord {
        color: color.to_string(),
        fill_color: fill_color.to_string(),
        weight: BASE_WEIGHT,
        opacity: 0.8,
        fill_opacity: 0.6,
        dash_array: None,
    }
}

/// Modifier for a status. Unknown status uses the active treatment.
pub fn status_modifier(status: Option<LayerStatus>) -> StatusModifier {
    match status {
        Some(LayerStatus::InDevelopment) => StatusModifier {
            opacity: 0.6,
            fill_opacity: 0.4,
            dash_array: Some("5, 5"),
        },
        Some(LayerStatus::Exploratory) => StatusModifier {
            opacity: 0.5,
            fill_opacity: 0.3,
            dash_array: Some("10, 5"),
        },
        Some(LayerStatus::Completed) => StatusModifier {
            opacity: 0.4,
            fill_opacity: 0.2,
            dash_array: None,
        },
        Some(LayerStatus::Active) | None => StatusModifier {
            opacity: 0.8,
            fill_opacity: 0.6,
            dash_array: None,
        },
    }
}

/// Resolves the paint style of a layer.
///
/// Precedence is base-by-category, then status modifier, then override,
/// applied field by field. Override opacities are clamped to `[0, 1]` and
/// weight to `>= 0`; non-finite override numbers are ignored.
pub fn resolve(
    category: LayerCategory,
    status: Option<LayerStatus>,
    style_override: Option<&StyleOverride>,
) -> StyleRecord {
    let mut style = base_style(category);

    let modifier = status_modifier(status);
    style.opacity = modifier.opacity;
    style.fill_opacity = modifier.fill_opacity;
    style.dash_array = modifier.dash_array.map(str::to_string);

    let Some(custom) = style_override else {
        return style;
    };

    if let Some(color) = non_blank(&custom.color) {
        style.color = color;
    }
    if let Some(fill_color) = non_blank(&custom.fill_color) {
        style.fill_color = fill_color;
    }
    if let Some(weight) = finite(custom.weight) {
        style.weight = weight.max(0.0);
    }
    if let Some(opacity) = finite(custom.opacity) {
        style.opacity = opacity.clamp(0.0, 1.0);
    }
    if let Some(fill_opacity) = finite(custom.fill_opacity) {
        style.fill_opacity = fill_opacity.clamp(0.0, 1.0);
    }
    if let Some(dash) = &custom.dash_array {
        let dash = dash.trim();
        style.dash_array = (!dash.is_empty()).then(|| dash.to_string());
    }

    style
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
