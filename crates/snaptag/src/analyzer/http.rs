//! HTTP-backed image analyzer.
//!
//! Uploads the image as base64 together with the model identifier and
//! metadata constraints, and expects a JSON body carrying title, description
//! and keywords back.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{debug, warn};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{AnalyzeError, ImageAnalyzer};
use crate::config::BatchConfig;
use crate::metadata::ImageMetadata;

/// Maximum length for error bodies carried into error values and logs.
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Requests to a hung provider are abandoned at this boundary.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn sanitize_error_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LENGTH {
        format!("{}... (truncated)", &body[..MAX_ERROR_BODY_LENGTH])
    } else {
        body.to_string()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    model: &'a str,
    image: ImagePayload,
    constraints: Constraints,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagePayload {
    content_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Constraints {
    title_limit: u32,
    description_limit: u32,
    keyword_limit: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    keywords: Vec<String>,
}

fn detect_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Parses a provider response body, clamping keywords to the configured
/// limit. The provider is asked to honor the limits but is not trusted to.
fn parse_analysis_body(body: &str, keyword_limit: u32) -> Result<ImageMetadata, AnalyzeError> {
    let response: AnalysisResponse =
        serde_json::from_str(body).map_err(|e| AnalyzeError::ResponseParse(e.to_string()))?;

    let mut metadata =
        ImageMetadata::new(response.title, response.description, response.keywords);
    metadata.clamp_keywords(keyword_limit as usize);
    Ok(metadata)
}

pub struct HttpAnalyzer {
    client: Client,
}

impl HttpAnalyzer {
    pub fn new() -> Result<Self, AnalyzeError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnalyzeError::ClientInit(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageAnalyzer for HttpAnalyzer {
    async fn analyze(
        &self,
        file_id: &str,
        config: &BatchConfig,
    ) -> Result<ImageMetadata, AnalyzeError> {
        let path = Path::new(file_id);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AnalyzeError::ReadImage {
                path: path.to_path_buf(),
                source: e,
            })?;

        let request = AnalysisRequest {
            model: &config.provider.model,
            image: ImagePayload {
                content_type: detect_content_type(path),
                data: BASE64.encode(&bytes),
            },
            constraints: Constraints {
                title_limit: config.limits.title_limit,
                description_limit: config.limits.description_limit,
                keyword_limit: config.limits.keyword_limit,
            },
        };

        debug!("Requesting analysis for {}", path.display());

        let response = self
            .client
            .post(&config.provider.endpoint)
            .bearer_auth(config.provider.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzeError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzeError::Request(e.to_string()))?;

        if !status.is_success() {
            warn!(
                "Analysis request for {} rejected with HTTP {}",
                path.display(),
                status
            );
            return Err(AnalyzeError::Rejected {
                status: status.as_u16(),
                body: sanitize_error_body(&body),
            });
        }

        parse_analysis_body(&body, config.limits.keyword_limit)
    }
}
