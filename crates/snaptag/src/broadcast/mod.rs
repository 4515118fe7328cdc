//! Broadcast channels bridging engine state to UI surfaces.

pub mod run_progress;

pub use run_progress::{RunProgressBroadcaster, RunProgressEvent};
