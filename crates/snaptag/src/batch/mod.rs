//! Batch processing engine.
//!
//! Drives an ordered list of image files through the analysis collaborator
//! one at a time, keeps aggregate run state, and multicasts status changes
//! to subscribers.

pub mod engine;
pub mod job;
pub mod status;

pub use engine::{BatchEngine, NoopObserver, RunObserver, Subscription};
pub use job::{BatchJob, ItemResult};
pub use status::RunStatus;
