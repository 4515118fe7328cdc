pub mod analyzer;
pub mod batch;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod metadata;
pub mod store;

pub use analyzer::{AnalyzeError, HttpAnalyzer, ImageAnalyzer};
pub use batch::{
    BatchEngine, BatchJob, ItemResult, NoopObserver, RunObserver, RunStatus, Subscription,
};
pub use broadcast::{RunProgressBroadcaster, RunProgressEvent};
pub use config::{BatchConfig, MetadataLimits, ProviderSettings};
pub use error::{ConfigError, EngineError, Result, SnaptagError, StoreError};
pub use metadata::ImageMetadata;
pub use store::{MetadataStore, SidecarStore};
