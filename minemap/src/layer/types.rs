//! Identity, category and status types for layer descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, list-unique identity of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(u64);

impl LayerId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for LayerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a layer represents. Drives hue and marker icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayerCategory {
    /// Mining deposit sites (gold, diamond, ...)
    Deposit,
    /// Roads, plants, camps
    Infrastructure,
    /// Concessions, permits, administrative boundaries
    AdministrativeZone,
    /// Anything else, and the fallback for unknown API values
    #[default]
    Custom,
}

impl LayerCategory {
    /// All categories, in display order.
    pub const ALL: [LayerCategory; 4] = [
        LayerCategory::Deposit,
        LayerCategory::Infrastructure,
        LayerCategory::AdministrativeZone,
        LayerCategory::Custom,
    ];

    /// Maps an API `layer_type` string. Unknown values fall back to `Custom`.
    pub fn from_api(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "deposit" => LayerCategory::Deposit,
            "infrastructure" => LayerCategory::Infrastructure,
            "zone" | "administrative_zone" | "administrative-zone" => {
                LayerCategory::AdministrativeZone
            }
            _ => LayerCategory::Custom,
        }
    }

    /// The API string for this category.
    pub fn as_api_str(self) -> &'static str {
        match self {
            LayerCategory::Deposit => "deposit",
            LayerCategory::Infrastructure => "infrastructure",
            LayerCategory::AdministrativeZone => "zone",
            LayerCategory::Custom => "custom",
        }
    }

    /// Human-readable label shown in popups.
    pub fn label(self) -> &'static str {
        match self {
            LayerCategory::Deposit => "Gisement Minier",
            LayerCategory::Infrastructure => "Infrastructure",
            LayerCategory::AdministrativeZone => "Zone Administrative",
            LayerCategory::Custom => "Personnalisé",
        }
    }
}

impl fmt::Display for LayerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Project lifecycle status of a layer. Drives opacity and dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerStatus {
    Active,
    InDevelopment,
    Exploratory,
    Completed,
}

impl LayerStatus {
    pub const ALL: [LayerStatus; 4] = [
        LayerStatus::Active,
        LayerStatus::InDevelopment,
        LayerStatus::Exploratory,
        LayerStatus::Completed,
    ];

    /// Maps an API `status` string, returning `None` for unknown values.
    ///
    /// The backend stores French values with accents; ASCII spellings and
    /// English names are accepted as well.
    pub fn from_api(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "actif" | "active" => Some(LayerStatus::Active),
            "en_développement" | "en_developpement" | "in_development" => {
                Some(LayerStatus::InDevelopment)
            }
            "exploration" | "exploratory" => Some(LayerStatus::Exploratory),
            "terminé" | "termine" | "completed" => Some(LayerStatus::Completed),
            _ => None,
        }
    }

    pub fn as_api_str(self) -> &'static str {
        match self {
            LayerStatus::Active => "actif",
            LayerStatus::InDevelopment => "en_développement",
            LayerStatus::Exploratory => "exploration",
            LayerStatus::Completed => "terminé",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LayerStatus::Active => "Actif",
            LayerStatus::InDevelopment => "En Développement",
            LayerStatus::Exploratory => "Exploration",
            LayerStatus::Completed => "Terminé",
        }
    }
}

impl fmt::Display for LayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_api_known_values() {
        assert_eq!(LayerCategory::from_api("deposit"), LayerCategory::Deposit);
        assert_eq!(
            LayerCategory::from_api("Infrastructure"),
            LayerCategory::Infrastructure
        );
        assert_eq!(
            LayerCategory::from_api("zone"),
            LayerCategory::AdministrativeZone
        );
        assert_eq!(LayerCategory::from_api("custom"), LayerCategory::Custom);
    }

    #[test]
    fn test_category_unknown_falls_back_to_custom() {
        assert_eq!(LayerCategory::from_api("environment"), LayerCategory::Custom);
        assert_eq!(LayerCategory::from_api(""), LayerCategory::Custom);
    }

    #[test]
    fn test_category_api_round_trip() {
        for category in LayerCategory::ALL {
            assert_eq!(LayerCategory::from_api(category.as_api_str()), category);
        }
    }

    #[test]
    fn test_status_accepts_accented_and_ascii_spellings() {
        assert_eq!(
            LayerStatus::from_api("en_développement"),
            Some(LayerStatus::InDevelopment)
        );
        assert_eq!(
            LayerStatus::from_api("en_developpement"),
            Some(LayerStatus::InDevelopment)
        );
        assert_eq!(LayerStatus::from_api("terminé"), Some(LayerStatus::Completed));
        assert_eq!(LayerStatus::from_api("TERMINE"), Some(LayerStatus::Completed));
        assert_eq!(LayerStatus::from_api("actif"), Some(LayerStatus::Active));
    }

    #[test]
    fn test_status_unknown_is_none() {
        assert_eq!(LayerStatus::from_api("archived"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(LayerCategory::Deposit.label(), "Gisement Minier");
        assert_eq!(LayerStatus::InDevelopment.label(), "En Développement");
    }

    #[test]
    fn test_layer_id_display() {
        assert_eq!(LayerId::new(42).to_string(), "42");
        assert_eq!(LayerId::from(7).get(), 7);
    }
}
