//! Run progress broadcaster for real-time batch status streaming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::batch::{BatchEngine, RunStatus, Subscription};

/// Progress event for a batch run, ready to stream to a frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProgressEvent {
    /// Number of files in the job.
    pub total: usize,
    /// Files finished with a successful result.
    pub completed: usize,
    /// Files finished with an error result.
    pub failed: usize,
    /// Whether the run is still active.
    pub in_progress: bool,
    /// Timestamp of this event.
    pub timestamp: DateTime<Utc>,
}

impl From<RunStatus> for RunProgressEvent {
    fn from(status: RunStatus) -> Self {
        Self {
            total: status.total,
            completed: status.completed,
            failed: status.failed,
            in_progress: status.in_progress,
            timestamp: Utc::now(),
        }
    }
}

/// Fans batch status transitions out to any number of stream consumers.
#[derive(Clone)]
pub struct RunProgressBroadcaster {
    sender: Arc<broadcast::Sender<RunProgressEvent>>,
}

impl RunProgressBroadcaster {
    /// Creates a new broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends an event to all subscribers.
    pub fn send(&self, event: RunProgressEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }

    /// Creates a new subscriber for progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<RunProgressEvent> {
        self.sender.subscribe()
    }

    /// Registers this broadcaster as an engine subscriber so every status
    /// transition is re-emitted as a stream event.
    pub fn attach(&self, engine: &BatchEngine) -> Subscription {
        let sender = Arc::clone(&self.sender);
        engine.subscribe(move |status| {
            let _ = sender.send(RunProgressEvent::from(status));
        })
    }
}

impl Default for RunProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_creation() {
        let broadcaster = RunProgressBroadcaster::new(10);
        let _rx = broadcaster.subscribe();
    }

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = RunProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        broadcaster.send(RunProgressEvent::from(RunStatus::started(5)));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.total, 5);
        assert_eq!(received.completed, 0);
        assert!(received.in_progress);
    }

    #[test]
    fn test_send_without_receivers_is_fine() {
        let broadcaster = RunProgressBroadcaster::new(10);
        broadcaster.send(RunProgressEvent::from(RunStatus::default()));
    }

    #[test]
    fn test_default_capacity() {
        let broadcaster = RunProgressBroadcaster::default();
        let _rx = broadcaster.subscribe();
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = RunProgressEvent::from(RunStatus::started(1));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"inProgress\":true"));
        assert!(json.contains("\"timestamp\""));
    }
}
