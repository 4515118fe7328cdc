//! Analysis collaborator boundary.
//!
//! The engine only ever talks to [`ImageAnalyzer`]; the shipped
//! implementation is the HTTP-backed [`HttpAnalyzer`].

pub mod http;

pub use http::HttpAnalyzer;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::BatchConfig;
use crate::metadata::ImageMetadata;

/// Errors from a single analysis attempt.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(String),

    #[error("Failed to read image '{path}': {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Provider rejected the request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to parse provider response: {0}")]
    ResponseParse(String),
}

/// Derives descriptive metadata for one image file.
///
/// Calls are serialized by the engine; an implementation never sees two
/// concurrent invocations from the same run.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        file_id: &str,
        config: &BatchConfig,
    ) -> Result<ImageMetadata, AnalyzeError>;
}
