//! Instance metadata port.
//!
//! Describes where the running instance lives. Implementations can be the
//! cloud metadata server, a fixed value, or a test stub.

use crate::error::UpstreamError;

#[async_trait::async_trait]
pub trait InstanceMetadata: Send + Sync + 'static {
    /// Raw region descriptor of the current instance.
    async fn region(&self) -> Result<Vec<u8>, UpstreamError>;
}
