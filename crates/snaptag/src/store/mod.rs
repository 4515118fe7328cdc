//! Metadata persistence collaborator boundary.

pub mod sidecar;

pub use sidecar::SidecarStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::metadata::ImageMetadata;

/// Durably stores metadata for one image.
///
/// Best-effort from the engine's perspective: a persist failure is surfaced
/// as a secondary note on the item, never as an item failure.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn persist(&self, file_id: &str, metadata: &ImageMetadata) -> Result<(), StoreError>;
}
