//! The layer list as served by the geoportal API.
//!
//! The catalog walks the paginated `GET /layers` endpoint and validates each
//! record into a [`LayerDescriptor`]. Invalid records are set aside as
//! [`RejectedRecord`]s; they never abort the listing.

mod http;
mod query;

pub use http::{HttpLayerCatalog, DEFAULT_MAX_PAGES};
pub use query::{LayerQuery, DEFAULT_PER_PAGE, MAX_PER_PAGE};

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpError;
use crate::layer::{DescriptorError, LayerDescriptor};

/// Errors that prevent listing layers at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The body is not a layer list envelope
    #[error("Malformed layer list: {0}")]
    Malformed(String),

    /// The API answered with `success: false`
    #[error("API error: {0}")]
    Api(String),

    /// Pagination did not terminate
    #[error("Layer list exceeds {0} pages")]
    TooManyPages(u32),
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// A record that failed descriptor validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position of the record across the whole listing
    pub index: usize,
    /// Raw id, when the record had a usable one
    pub id: Option<u64>,
    pub error: DescriptorError,
}

/// One page of the listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub layers: Vec<LayerDescriptor>,
    pub rejected: Vec<RejectedRecord>,
    pub pagination: Pagination,
}

/// The complete listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub layers: Vec<LayerDescriptor>,
    pub rejected: Vec<RejectedRecord>,
    /// Total reported by the API, rejected records included
    pub total: u64,
}

impl CatalogSnapshot {
    pub fn visible_count(&self) -> usize {
        self.layers.iter().filter(|l| l.visible).count()
    }
}

/// Source of layer descriptors.
pub trait LayerCatalog: Send + Sync {
    /// Fetches every layer matching `query`.
    fn fetch_all(
        &self,
        query: &LayerQuery,
    ) -> impl Future<Output = Result<CatalogSnapshot, CatalogError>> + Send;
}
