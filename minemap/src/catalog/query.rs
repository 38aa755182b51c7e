//! Filters for the layer listing.

use crate::layer::{LayerCategory, LayerStatus};

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Largest page size the API honours.
pub const MAX_PER_PAGE: u32 = 100;

/// Listing filters. All filters are optional and combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerQuery {
    category: Option<LayerCategory>,
    status: Option<LayerStatus>,
    search: Option<String>,
    per_page: u32,
}

impl LayerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: LayerCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_status(mut self, status: LayerStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Text search over name and description. Blank strings clear it.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into().trim().to_string();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    /// Page size, clamped to `1..=100`.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn category(&self) -> Option<LayerCategory> {
        self.category
    }

    pub fn status(&self) -> Option<LayerStatus> {
        self.status
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Query parameters for `page`, in a stable order.
    pub(crate) fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(category) = self.category {
            params.push(("layer_type", category.as_api_str().to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_api_str().to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}

impl Default for LayerQuery {
    fn default() -> Self {
        Self {
            category: None,
            status: None,
            search: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}
