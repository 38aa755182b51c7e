//! Paginated layer listing over HTTP.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    CatalogError, CatalogPage, CatalogSnapshot, LayerCatalog, LayerQuery, Pagination,
    RejectedRecord,
};
use crate::http::{url_with_query, AsyncHttpClient};
use crate::layer::LayerDescriptor;

/// Hard stop on pagination.
pub const DEFAULT_MAX_PAGES: u32 = 100;

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    error: Option<String>,
}

/// Lists layers with `GET {api_base}/layers?page=&per_page=...`.
pub struct HttpLayerCatalog<C> {
    client: C,
    api_base: String,
    max_pages: u32,
}

impl<C: AsyncHttpClient> HttpLayerCatalog<C> {
    pub fn new(client: C, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetches one page. `offset` is the listing position of its first
    /// record, used to number rejected records.
    pub async fn fetch_page(
        &self,
        query: &LayerQuery,
        page: u32,
        offset: usize,
    ) -> Result<CatalogPage, CatalogError> {
        let url = url_with_query(&format!("{}/layers", self.api_base), &query.params(page))?;
        let bytes = self.client.get(&url).await?;

        let envelope: ListEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::Malformed(e.to_string()))?;

        if envelope.success == Some(false) {
            return Err(CatalogError::Api(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        let records = envelope
            .data
            .ok_or_else(|| CatalogError::Malformed("missing data array".to_string()))?;

        let mut result = CatalogPage {
            pagination: envelope.pagination.unwrap_or_default(),
            ..CatalogPage::default()
        };
        for (i, record) in records.iter().enumerate() {
            match LayerDescriptor::from_value(record) {
                Ok(descriptor) => result.layers.push(descriptor),
                Err(error) => {
                    let id = record.get("id").and_then(Value::as_u64);
                    warn!(index = offset + i, id = ?id, error = %error, "Rejected layer record");
                    result.rejected.push(RejectedRecord {
                        index: offset + i,
                        id,
                        error,
                    });
                }
            }
        }

        debug!(
            page,
            layers = result.layers.len(),
            rejected = result.rejected.len(),
            has_next = result.pagination.has_next,
            "Layer page fetched"
        );
        Ok(result)
    }
}

impl<C: AsyncHttpClient> LayerCatalog for HttpLayerCatalog<C> {
    async fn fetch_all(&self, query: &LayerQuery) -> Result<CatalogSnapshot, CatalogError> {
        let mut snapshot = CatalogSnapshot::default();
        let mut page = 1;
        let mut offset = 0;

        loop {
            if page > self.max_pages {
                return Err(CatalogError::TooManyPages(self.max_pages));
            }

            let result = self.fetch_page(query, page, offset).await?;
            offset += result.layers.len() + result.rejected.len();
            snapshot.total = result.pagination.total.max(offset as u64);
            snapshot.layers.extend(result.layers);
            snapshot.rejected.extend(result.rejected);

            if !result.pagination.has_next {
                break;
            }
            page += 1;
        }

        Ok(snapshot)
    }
}
