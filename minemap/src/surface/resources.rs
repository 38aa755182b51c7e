//! Static resources registered once on the host surface.

/// Identifier of the injected stylesheet.
pub const STYLESHEET_ID: &str = "geospatial-styles";

const STYLESHEET: &str = r#".custom-div-icon {
  background: none !important;
  border: none !important;
}
.custom-marker {
  width: 32px;
  height: 32px;
  display: flex;
  align-items: center;
  justify-content: center;
  font-size: 20px;
  background: white;
  border: 2px solid #333;
  border-radius: 50%;
  box-shadow: 0 2px 4px rgba(0,0,0,0.3);
}
.deposit-marker { border-color: #f59e0b; background: #fef3c7; }
.infrastructure-marker { border-color: #3b82f6; background: #dbeafe; }
.zone-marker { border-color: #10b981; background: #d1fae5; }
.custom-marker-icon { border-color: #8b5cf6; background: #ede9fe; }
.geospatial-popup-container .leaflet-popup-content { margin: 8px 12px; line-height: 1.4; }
.geospatial-popup { font-family: system-ui, -apple-system, sans-serif; }
.popup-title { font-size: 16px; font-weight: 600; margin: 0 0 8px 0; color: #1f2937; }
.popup-description { font-size: 14px; color: #6b7280; margin: 0 0 12px 0; }
.popup-details { font-size: 13px; }
.popup-row { margin: 4px 0; }
.popup-stats { margin: 8px 0; padding: 8px; background: #f9fafb; border-radius: 4px; }
.popup-date { margin-top: 8px; font-size: 12px; color: #9ca3af; }
.status-actif { color: #059669; font-weight: 500; }
.status-en_développement { color: #d97706; font-weight: 500; }
.status-exploration { color: #2563eb; font-weight: 500; }
.status-terminé { color: #6b7280; font-weight: 500; }
.geospatial-tooltip {
  background: rgba(0, 0, 0, 0.8) !important;
  border: none !important;
  border-radius: 4px !important;
  color: white !important;
  font-size: 12px !important;
  padding: 4px 8px !important;
}
.geospatial-tooltip::before { border-top-color: rgba(0, 0, 0, 0.8) !important; }
"#;

/// Stylesheet for markers, popups and tooltips.
///
/// Registered through [`HostSurface::install`](super::HostSurface::install)
/// once per surface lifetime, never per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceResources {
    pub stylesheet_id: &'static str,
    pub css: &'static str,
}

impl Default for SurfaceResources {
    fn default() -> Self {
        Self {
            stylesheet_id: STYLESHEET_ID,
            css: STYLESHEET,
        }
    }
}
