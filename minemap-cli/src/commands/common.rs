//! Common types and utilities shared across CLI commands.

use clap::{Args, ValueEnum};
use minemap::catalog::LayerQuery;
use minemap::config::ConfigFile;
use minemap::layer::{LayerCategory, LayerId, LayerStatus};
use minemap::reconcile::LayerCallbacks;
use minemap::sync::SyncConfig;

/// Layer category selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum CategoryArg {
    /// Mining deposits
    Deposit,
    /// Roads, plants, camps
    Infrastructure,
    /// Concessions and administrative boundaries
    Zone,
    /// Anything else
    Custom,
}

impl From<CategoryArg> for LayerCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Deposit => LayerCategory::Deposit,
            CategoryArg::Infrastructure => LayerCategory::Infrastructure,
            CategoryArg::Zone => LayerCategory::AdministrativeZone,
            CategoryArg::Custom => LayerCategory::Custom,
        }
    }
}

/// Project status selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum StatusArg {
    /// Actif
    Active,
    /// En développement
    InDevelopment,
    /// Exploration
    Exploratory,
    /// Terminé
    Completed,
}

impl From<StatusArg> for LayerStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => LayerStatus::Active,
            StatusArg::InDevelopment => LayerStatus::InDevelopment,
            StatusArg::Exploratory => LayerStatus::Exploratory,
            StatusArg::Completed => LayerStatus::Completed,
        }
    }
}

/// Catalog filters and local visibility toggles shared by `sync` and `watch`.
#[derive(Debug, Clone, Default, Args)]
pub struct LayerSelection {
    /// Only list layers of this category
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Only list layers with this status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Only list layers whose name or description matches
    #[arg(long)]
    pub search: Option<String>,

    /// Show these layer ids regardless of their stored visibility
    #[arg(long, value_delimiter = ',')]
    pub show: Vec<u64>,

    /// Hide these layer ids regardless of their stored visibility
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<u64>,
}

impl LayerSelection {
    /// Catalog query for these filters, paged as configured.
    pub fn query(&self, config: &ConfigFile) -> LayerQuery {
        let mut query = LayerQuery::new().with_per_page(config.api.per_page);
        if let Some(category) = self.category {
            query = query.with_category(category.into());
        }
        if let Some(status) = self.status {
            query = query.with_status(status.into());
        }
        if let Some(search) = &self.search {
            query = query.with_search(search.clone());
        }
        query
    }

    /// Sync config from the file plus these filters and toggles.
    ///
    /// An id passed to both `--show` and `--hide` ends up hidden.
    pub fn sync_config(&self, config: &ConfigFile) -> SyncConfig {
        let mut sync = config.sync_config().with_query(self.query(config));
        for id in &self.show {
            sync = sync.with_visibility(LayerId::new(*id), true);
        }
        for id in &self.hide {
            sync = sync.with_visibility(LayerId::new(*id), false);
        }
        sync
    }
}

/// Callbacks printing one line per loaded or failed layer.
pub fn printing_callbacks() -> LayerCallbacks {
    LayerCallbacks::new()
        .on_layer_load(|layer, overlay| {
            println!(
                "  ✓ {:>5}  {:<32} {} part(s), {} marker(s)",
                layer.id,
                layer.display_name(),
                overlay.parts().len(),
                overlay.marker_count()
            );
        })
        .on_layer_error(|layer, error| {
            println!("  ✗ {:>5}  {:<32} {}", layer.id, layer.display_name(), error);
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_arg_mapping() {
        assert_eq!(
            LayerCategory::from(CategoryArg::Zone),
            LayerCategory::AdministrativeZone
        );
        assert_eq!(
            LayerStatus::from(StatusArg::InDevelopment),
            LayerStatus::InDevelopment
        );
    }

    #[test]
    fn test_selection_builds_query_and_overrides() {
        let config = ConfigFile::default();
        let selection = LayerSelection {
            category: Some(CategoryArg::Deposit),
            search: Some("or".to_string()),
            show: vec![1, 2],
            hide: vec![2],
            ..LayerSelection::default()
        };

        let sync = selection.sync_config(&config);
        assert_eq!(sync.query().category(), Some(LayerCategory::Deposit));
        assert_eq!(sync.query().search(), Some("or"));
        assert_eq!(sync.query().per_page(), config.api.per_page);
        assert_eq!(
            sync.visibility_overrides().get(&LayerId::new(1)),
            Some(&true)
        );
        assert_eq!(
            sync.visibility_overrides().get(&LayerId::new(2)),
            Some(&false)
        );
    }
}
