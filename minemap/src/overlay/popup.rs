//! Popup content derived from descriptor metadata.
//!
//! Every row has a French placeholder, so a descriptor with nothing but an
//! id still renders a complete popup.

use super::types::Popup;
use crate::layer::LayerDescriptor;

pub const POPUP_MAX_WIDTH: u32 = 300;
pub const POPUP_CLASS: &str = "geospatial-popup-container";

const NO_DESCRIPTION: &str = "Aucune description";
const UNKNOWN_FORMAT: &str = "Inconnu";
const UNDEFINED: &str = "Non défini";
const UNKNOWN_DATE: &str = "Date inconnue";
const NO_STATS: &str = "Non disponibles";

/// Structured popup content, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub description: String,
    /// `(label, value)` detail rows, in display order
    pub rows: Vec<(&'static str, String)>,
    /// CSS class of the status value
    pub status_class: String,
    /// Statistic lines; empty when none are known
    pub stats: Vec<String>,
    pub created: String,
}

impl PopupContent {
    pub fn from_descriptor(descriptor: &LayerDescriptor) -> Self {
        let metadata = &descriptor.metadata;

        let mut stats = Vec::new();
        if let Some(area) = metadata.area_km2.filter(|a| *a != 0.0) {
            stats.push(format!("Superficie: {:.2} km²", area));
        }
        if let Some(length) = metadata.length_km.filter(|l| *l != 0.0) {
            stats.push(format!("Longueur: {:.2} km", length));
        }
        if let Some(points) = metadata.point_count.filter(|p| *p != 0) {
            stats.push(format!("Points: {}", points));
        }

        Self {
            title: descriptor.display_name().to_string(),
            description: descriptor
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            rows: vec![
                ("Type", descriptor.category.label().to_string()),
                (
                    "Statut",
                    descriptor
                        .status
                        .map(|s| s.label().to_string())
                        .unwrap_or_else(|| UNDEFINED.to_string()),
                ),
                (
                    "Format",
                    metadata
                        .source_format
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_FORMAT.to_string()),
                ),
                (
                    "Géométrie",
                    metadata
                        .geometry_type
                        .clone()
                        .unwrap_or_else(|| UNDEFINED.to_string()),
                ),
            ],
            status_class: format!(
                "status-{}",
                descriptor.status.map(|s| s.as_api_str()).unwrap_or("inconnu")
            ),
            stats,
            created: metadata
                .created_at
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        }
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec![self.title.clone(), self.description.clone()];
        lines.extend(
            self.rows
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value)),
        );
        if self.stats.is_empty() {
            lines.push(format!("Statistiques: {}", NO_STATS));
        } else {
            lines.push("Statistiques:".to_string());
            lines.extend(self.stats.iter().cloned());
        }
        lines.push(format!("Créé le: {}", self.created));
        lines.join("\n")
    }

    pub fn render_html(&self) -> String {
        let mut html = String::from(r#"<div class="geospatial-popup">"#);
        html.push_str(&format!(
            r#"<h3 class="popup-title">{}</h3>"#,
            escape_html(&self.title)
        ));
        html.push_str(&format!(
            r#"<p class="popup-description">{}</p>"#,
            escape_html(&self.description)
        ));
        html.push_str(r#"<div class="popup-details">"#);
        for (label, value) in &self.rows {
            let value = if *label == "Statut" {
                format!(
                    r#"<span class="{}">{}</span>"#,
                    escape_html(&self.status_class),
                    escape_html(value)
                )
            } else {
                escape_html(value)
            };
            html.push_str(&format!(
                r#"<div class="popup-row"><strong>{}:</strong> {}</div>"#,
                label, value
            ));
        }
        html.push_str(r#"<div class="popup-stats"><strong>Statistiques:</strong>"#);
        if self.stats.is_empty() {
            html.push_str(&format!(" {}", NO_STATS));
        } else {
            for line in &self.stats {
                html.push_str("<br>");
                html.push_str(&escape_html(line));
            }
        }
        html.push_str("</div>");
        html.push_str(&format!(
            r#"<div class="popup-date">Créé le: {}</div>"#,
            escape_html(&self.created)
        ));
        html.push_str("</div></div>");
        html
    }

    pub fn into_popup(self) -> Popup {
        Popup {
            text: self.render_text(),
            html: self.render_html(),
            max_width: POPUP_MAX_WIDTH,
            class_name: POPUP_CLASS,
        }
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerCategory, LayerMetadata, LayerStatus};
    use chrono::NaiveDate;

    #[test]
    fn test_placeholders_for_bare_descriptor() {
        let descriptor = LayerDescriptor::new(1, LayerCategory::Custom);
        let text = PopupContent::from_descriptor(&descriptor).render_text();

        assert_eq!(
            text,
            "Sans nom\n\
             Aucune description\n\
             Type: Personnalisé\n\
             Statut: Non défini\n\
             Format: Inconnu\n\
             Géométrie: Non défini\n\
             Statistiques: Non disponibles\n\
             Créé le: Date inconnue"
        );
    }

    #[test]
    fn test_full_metadata() {
        let created = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let descriptor = LayerDescriptor::new(3, LayerCategory::AdministrativeZone)
            .with_name("Permis Bondoukou")
            .with_description("Zone d'exploration")
            .with_status(LayerStatus::InDevelopment)
            .with_metadata(LayerMetadata {
                geometry_type: Some("MultiPolygon".to_string()),
                source_format: Some("kml".to_string()),
                area_km2: Some(152.456),
                length_km: None,
                point_count: Some(12),
                created_at: Some(created),
            });

        let content = PopupContent::from_descriptor(&descriptor);
        let text = content.render_text();
        assert!(text.contains("Type: Zone Administrative"));
        assert!(text.contains("Statut: En Développement"));
        assert!(text.contains("Format: kml"));
        assert!(text.contains("Géométrie: MultiPolygon"));
        assert!(text.contains("Statistiques:\nSuperficie: 152.46 km²\nPoints: 12"));
        assert!(text.ends_with("Créé le: 05/03/2024"));
        assert_eq!(content.status_class, "status-en_développement");
    }

    #[test]
    fn test_zero_statistics_are_omitted() {
        let descriptor = LayerDescriptor::new(1, LayerCategory::Deposit).with_metadata(
            LayerMetadata {
                area_km2: Some(0.0),
                point_count: Some(0),
                ..LayerMetadata::default()
            },
        );
        let content = PopupContent::from_descriptor(&descriptor);
        assert!(content.stats.is_empty());
    }

    #[test]
    fn test_html_is_escaped() {
        let descriptor = LayerDescriptor::new(1, LayerCategory::Deposit)
            .with_name("<script>alert('x')</script>")
            .with_description("Or & diamant");
        let html = PopupContent::from_descriptor(&descriptor).render_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Or &amp; diamant"));
        assert!(html.contains("<strong>Type:</strong> Gisement Minier"));
        assert!(html.contains(r#"<span class="status-inconnu">Non défini</span>"#));
    }

    #[test]
    fn test_popup_settings() {
        let popup = PopupContent::from_descriptor(&LayerDescriptor::new(1, LayerCategory::Custom))
            .into_popup();
        assert_eq!(popup.max_width, 300);
        assert_eq!(popup.class_name, "geospatial-popup-container");
    }
}
