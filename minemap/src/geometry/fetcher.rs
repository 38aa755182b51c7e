//! Geometry retrieval from the geoportal API.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::types::GeometryPayload;
use crate::http::{url_with_query, AsyncHttpClient, HttpError};
use crate::layer::LayerId;

/// Errors from fetching a layer's geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport or HTTP status failure
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Body is not JSON, or the geometry is not valid GeoJSON
    #[error("Malformed geometry payload: {0}")]
    Malformed(String),

    /// The request succeeded but carried no geometry
    #[error("No geometry available for layer {0}")]
    MissingGeometry(LayerId),

    /// No answer within the configured fetch timeout
    #[error("Geometry fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures, timeouts, 5xx and 429 answers qualify. Other
    /// statuses and malformed requests fail the same way on every attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(HttpError::Request { .. }) | FetchError::Timeout(_) => true,
            FetchError::Http(HttpError::Status { status, .. }) => {
                *status >= 500 || *status == 429
            }
            _ => false,
        }
    }
}

/// Retrieves the geometry of one layer.
///
/// Implementations neither cache nor retry; the reconciler owns both
/// concerns.
pub trait GeometryFetcher: Send + Sync {
    fn fetch(
        &self,
        id: LayerId,
    ) -> impl Future<Output = Result<GeometryPayload, FetchError>> + Send;
}

impl<T: GeometryFetcher> GeometryFetcher for Arc<T> {
    fn fetch(
        &self,
        id: LayerId,
    ) -> impl Future<Output = Result<GeometryPayload, FetchError>> + Send {
        (**self).fetch(id)
    }
}

/// Response envelope of `GET /layers/{id}`.
#[derive(Deserialize)]
struct LayerEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<LayerData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct LayerData {
    #[serde(default)]
    geojson: Option<Value>,
}

/// Fetches geometry with `GET {api_base}/layers/{id}?include_geojson=true`.
pub struct HttpGeometryFetcher<C> {
    client: C,
    api_base: String,
}

impl<C: AsyncHttpClient> HttpGeometryFetcher<C> {
    /// Creates a fetcher against `api_base`, e.g.
    /// `http://localhost:5000/api/geospatial`.
    pub fn new(client: C, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { client, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn layer_url(&self, id: LayerId) -> Result<String, HttpError> {
        url_with_query(
            &format!("{}/layers/{}", self.api_base, id),
            &[("include_geojson", "true".to_string())],
        )
    }
}

impl<C: AsyncHttpClient> GeometryFetcher for HttpGeometryFetcher<C> {
    async fn fetch(&self, id: LayerId) -> Result<GeometryPayload, FetchError> {
        let url = self.layer_url(id)?;
        let bytes = self.client.get(&url).await?;
        let payload = parse_envelope(id, &bytes)?;

        tracing::debug!(
            layer_id = %id,
            features = payload.len(),
            "Layer geometry fetched"
        );
        Ok(payload)
    }
}

fn parse_envelope(id: LayerId, bytes: &[u8]) -> Result<GeometryPayload, FetchError> {
    let envelope: LayerEnvelope =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if envelope.success == Some(false) {
        tracing::warn!(
            layer_id = %id,
            error = envelope.error.as_deref().unwrap_or("unknown"),
            "API reported failure for layer geometry"
        );
        return Err(FetchError::MissingGeometry(id));
    }

    let geojson = match envelope.data.and_then(|d| d.geojson) {
        None | Some(Value::Null) => return Err(FetchError::MissingGeometry(id)),
        // Some backends store the GeoJSON as a serialized string
        Some(Value::String(text)) => serde_json::from_str::<Value>(&text)
            .map_err(|e| FetchError::Malformed(e.to_string()))?,
        Some(value) => value,
    };

    GeometryPayload::from_geojson(geojson).map_err(|e| FetchError::Malformed(e.to_string()))
}
