//! Style command - show the resolved style for a category and status.
//!
//! Runs the style resolver offline, which is handy when tuning a layer's
//! `style_config` before saving it in the geoportal.

use minemap::layer::LayerCategory;
use minemap::style::{resolve, StyleOverride, StyleRecord};

use super::common::{CategoryArg, StatusArg};
use crate::error::CliError;

/// Arguments for the style command.
#[derive(Debug, Clone)]
pub struct StyleArgs {
    pub category: CategoryArg,
    pub status: Option<StatusArg>,
    pub color: Option<String>,
    pub fill_color: Option<String>,
    pub weight: Option<f64>,
    pub opacity: Option<f64>,
    pub fill_opacity: Option<f64>,
    pub dash_array: Option<String>,
    pub json: bool,
}

impl StyleArgs {
    fn style_override(&self) -> StyleOverride {
        StyleOverride {
            color: self.color.clone(),
            fill_color: self.fill_color.clone(),
            weight: self.weight,
            opacity: self.opacity,
            fill_opacity: self.fill_opacity,
            dash_array: self.dash_array.clone(),
        }
    }
}

/// Run the style command.
pub fn run(args: StyleArgs) -> Result<(), CliError> {
    let category = LayerCategory::from(args.category);
    let status = args.status.map(Into::into);
    let style_override = args.style_override();
    let style = resolve(
        category,
        status,
        (!style_override.is_empty()).then_some(&style_override),
    );

    if args.json {
        let body = serde_json::json!({
            "style": style,
            "hover": style.highlighted(),
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| CliError::Config(format!("Failed to encode style: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!(
        "{} / {}",
        category.label(),
        status.map(|s| s.label()).unwrap_or("Non défini")
    );
    println!();
    print_style("Style", &style);
    println!();
    print_style("Hover", &style.highlighted());

    Ok(())
}

fn print_style(title: &str, style: &StyleRecord) {
    println!("{}", title);
    println!("  color        = {}", style.color);
    println!("  fill_color   = {}", style.fill_color);
    println!("  weight       = {}", style.weight);
    println!("  opacity      = {}", style.opacity);
    println!("  fill_opacity = {}", style.fill_opacity);
    println!(
        "  dash_array   = {}",
        style.dash_array.as_deref().unwrap_or("(solid)")
    );
}
