//! Instance metadata adapters.

use async_trait::async_trait;
use tracing::{instrument, warn};

use payments_types::{InstanceMetadata, UpstreamError};

/// Region endpoint of the Google Compute Engine metadata server.
pub const GCE_REGION_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/region";

/// Reads the instance region from a GCE-style metadata server.
///
/// One attempt per call. The response status is not inspected; whatever body
/// comes back is the answer.
pub struct GceMetadata {
    client: reqwest::Client,
    url: String,
}

impl GceMetadata {
    pub fn new() -> Self {
        Self::with_url(GCE_REGION_URL)
    }

    /// Points the adapter at another metadata endpoint.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for GceMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstanceMetadata for GceMetadata {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn region(&self) -> Result<Vec<u8>, UpstreamError> {
        let resp = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;

        // A body that cannot be read counts as an empty answer, not an error.
        match resp.bytes().await {
            Ok(body) => Ok(body.to_vec()),
            Err(e) => {
                warn!(error = %e, "failed to read metadata response body");
                Ok(Vec::new())
            }
        }
    }
}

/// Static region, for deployments without a metadata server.
#[derive(Debug, Clone)]
pub struct FixedRegion(String);

impl FixedRegion {
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }
}

#[async_trait]
impl InstanceMetadata for FixedRegion {
    async fn region(&self) -> Result<Vec<u8>, UpstreamError> {
        Ok(self.0.clone().into_bytes())
    }
}
