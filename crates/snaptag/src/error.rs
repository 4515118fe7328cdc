use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnaptagError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Analysis error: {0}")]
    Analyze(#[from] crate::analyzer::AnalyzeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {field}: {value} (allowed range {min}-{max})")]
    LimitOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Provider model must not be empty")]
    MissingModel,

    #[error("Provider endpoint must not be empty")]
    MissingEndpoint,
}

/// Engine-level precondition failures. Per-item failures are never surfaced
/// through this type; they live in the item's own result.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("A batch run is already in progress")]
    Busy,

    #[error("Job contains no files")]
    EmptyJob,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write metadata file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnaptagError>;
