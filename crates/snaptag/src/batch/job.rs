use serde::Serialize;

use crate::config::BatchConfig;
use crate::metadata::ImageMetadata;

/// One batch request: an ordered list of image paths plus the configuration
/// the whole run uses. Immutable once constructed; consumed by a single run.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub id: String,
    pub file_ids: Vec<String>,
    pub config: BatchConfig,
}

impl BatchJob {
    pub fn new(file_ids: Vec<String>, config: BatchConfig) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_ids,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.file_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_ids.is_empty()
    }
}

/// Outcome of processing one file. Produced exactly once per file per run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub file_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Secondary note: analysis succeeded but persistence failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

impl ItemResult {
    pub fn success(file_id: &str, metadata: ImageMetadata) -> Self {
        Self {
            file_id: file_id.to_string(),
            success: true,
            metadata: Some(metadata),
            error: None,
            persist_error: None,
        }
    }

    pub fn failure(file_id: &str, error: String) -> Self {
        Self {
            file_id: file_id.to_string(),
            success: false,
            metadata: None,
            error: Some(error),
            persist_error: None,
        }
    }

    pub fn with_persist_error(mut self, error: String) -> Self {
        self.persist_error = Some(error);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;

    fn test_config() -> BatchConfig {
        BatchConfig::new(ProviderSettings::new(
            "sk-test",
            "vision-1",
            "https://api.example.com/v1/analyze",
        ))
    }

    #[test]
    fn test_job_new() {
        let job = BatchJob::new(
            vec!["a.jpg".to_string(), "b.jpg".to_string()],
            test_config(),
        );
        assert!(!job.id.is_empty());
        assert_eq!(job.len(), 2);
        assert!(!job.is_empty());
        assert_eq!(job.file_ids[0], "a.jpg");
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = BatchJob::new(vec!["a.jpg".to_string()], test_config());
        let b = BatchJob::new(vec!["a.jpg".to_string()], test_config());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_item_result_success() {
        let metadata = ImageMetadata::new("T", "D", vec!["k1".to_string()]);
        let result = ItemResult::success("a.jpg", metadata.clone());

        assert!(result.success);
        assert_eq!(result.file_id, "a.jpg");
        assert_eq!(result.metadata, Some(metadata));
        assert!(result.error.is_none());
        assert!(result.persist_error.is_none());
    }

    #[test]
    fn test_item_result_failure() {
        let result = ItemResult::failure("b.jpg", "quota exceeded".to_string());

        assert!(!result.success);
        assert!(result.metadata.is_none());
        assert_eq!(result.error, Some("quota exceeded".to_string()));
    }

    #[test]
    fn test_item_result_persist_note_keeps_success() {
        let result = ItemResult::success("a.jpg", ImageMetadata::new("T", "D", vec![]))
            .with_persist_error("disk full".to_string());

        assert!(result.success);
        assert_eq!(result.persist_error, Some("disk full".to_string()));
    }
}
