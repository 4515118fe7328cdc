//! Sidecar JSON persistence next to the image file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use super::MetadataStore;
use crate::error::StoreError;
use crate::metadata::ImageMetadata;

/// Writes `<image>.metadata.json` beside the image so metadata travels with
/// the file.
pub struct SidecarStore;

impl SidecarStore {
    /// Sidecar path for a given image path.
    pub fn sidecar_path(file_id: &str) -> PathBuf {
        let path = Path::new(file_id);
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".metadata.json");
        path.with_file_name(name)
    }
}

#[async_trait]
impl MetadataStore for SidecarStore {
    async fn persist(&self, file_id: &str, metadata: &ImageMetadata) -> Result<(), StoreError> {
        let sidecar = Self::sidecar_path(file_id);
        let json = serde_json::to_vec_pretty(metadata)?;

        tokio::fs::write(&sidecar, json)
            .await
            .map_err(|e| StoreError::WriteFile {
                path: sidecar.clone(),
                source: e,
            })?;

        debug!("Wrote metadata sidecar {}", sidecar.display());
        Ok(())
    }
}
