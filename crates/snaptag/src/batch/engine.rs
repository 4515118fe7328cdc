//! The batch engine: drives a job through analysis one file at a time,
//! publishes status transitions, and supports cooperative reset.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, info, warn};
use tracing::Instrument;

use crate::analyzer::ImageAnalyzer;
use crate::config::BatchConfig;
use crate::error::EngineError;
use crate::store::MetadataStore;

use super::job::{BatchJob, ItemResult};
use super::status::RunStatus;

/// Per-run hooks handed to [`BatchEngine::process`].
pub trait RunObserver: Send + Sync {
    /// Fires once, right after the job is accepted.
    fn started(&self, _status: &RunStatus) {}

    /// Fires after each item resolves, following the status notification for
    /// that item.
    fn item_finished(&self, _item: &ItemResult, _status: &RunStatus) {}
}

/// Observer for callers that only want the returned results.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

type SubscriberFn = Arc<dyn Fn(RunStatus) + Send + Sync>;
type SubscriberList = Mutex<Vec<(u64, SubscriberFn)>>;

/// Handle deregistering a subscriber.
///
/// Calling [`Subscription::unsubscribe`] more than once is a no-op. The
/// handle is cloneable so a callback can unsubscribe itself.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberList>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            let mut list = subscribers.lock().unwrap_or_else(PoisonError::into_inner);
            list.retain(|(id, _)| *id != self.id);
        }
    }
}

struct EngineState {
    status: RunStatus,
    /// Run token: bumped on every accepted job and every reset. A run whose
    /// token no longer matches must not start further items.
    generation: u64,
    results: HashMap<String, ItemResult>,
}

/// Drives batch metadata generation.
///
/// One engine per application: the composition root constructs it once and
/// shares it as `Arc<BatchEngine>` with every surface that needs it. Only
/// one job may be in progress at a time; a second [`BatchEngine::process`]
/// call is rejected with [`EngineError::Busy`].
///
/// Analysis calls are made strictly one at a time, in input order. The
/// external service and the UI both assume sequential progress; the bound is
/// a policy choice here, not a structural one.
pub struct BatchEngine {
    analyzer: Arc<dyn ImageAnalyzer>,
    store: Option<Arc<dyn MetadataStore>>,
    state: Mutex<EngineState>,
    subscribers: Arc<SubscriberList>,
    next_subscriber_id: AtomicU64,
}

impl BatchEngine {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self {
            analyzer,
            store: None,
            state: Mutex::new(EngineState {
                status: RunStatus::default(),
                generation: 0,
                results: HashMap::new(),
            }),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_subscriber_id: AtomicU64::new(0),
        }
    }

    /// Engine that also persists successful results through `store`.
    pub fn with_store(analyzer: Arc<dyn ImageAnalyzer>, store: Arc<dyn MetadataStore>) -> Self {
        let mut engine = Self::new(analyzer);
        engine.store = Some(store);
        engine
    }

    /// Current status, by value.
    pub fn status(&self) -> RunStatus {
        self.lock_state().status
    }

    /// Result recorded for `file_id` in the current or most recent run.
    pub fn item_result(&self, file_id: &str) -> Option<ItemResult> {
        self.lock_state().results.get(file_id).cloned()
    }

    /// Registers `callback` to receive every future status change.
    ///
    /// Multiple subscriptions by the same observer are independent.
    pub fn subscribe(&self, callback: impl Fn(RunStatus) + Send + Sync + 'static) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let callback: SubscriberFn = Arc::new(callback);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Forces `in_progress` off and invalidates the live run's token.
    ///
    /// The in-flight item (if any) finishes and is recorded; no further item
    /// starts. Counters are left untouched. Always publishes one status
    /// notification so observers can resynchronize, even when no run is
    /// active.
    pub fn reset(&self) {
        let status = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.status.in_progress = false;
            state.status
        };
        debug!("Batch engine reset");
        self.publish(status);
    }

    /// Processes `job` sequentially, in input order.
    ///
    /// Returns one [`ItemResult`] per attempted file. Per-item failures are
    /// captured in the results, never returned as `Err`; the run completes
    /// unless [`BatchEngine::reset`] cuts it short.
    pub async fn process(
        &self,
        job: BatchJob,
        observer: &dyn RunObserver,
    ) -> Result<Vec<ItemResult>, EngineError> {
        if job.is_empty() {
            return Err(EngineError::EmptyJob);
        }

        let (generation, initial) = {
            let mut state = self.lock_state();
            if state.status.in_progress {
                return Err(EngineError::Busy);
            }
            state.generation += 1;
            state.status = RunStatus::started(job.len());
            state.results.clear();
            (state.generation, state.status)
        };

        let span = tracing::info_span!("batch_run", job_id = %job.id, total = job.len());
        let results = self
            .drive(&job, generation, initial, observer)
            .instrument(span)
            .await;
        Ok(results)
    }

    async fn drive(
        &self,
        job: &BatchJob,
        generation: u64,
        initial: RunStatus,
        observer: &dyn RunObserver,
    ) -> Vec<ItemResult> {
        info!("Starting batch run {} with {} file(s)", job.id, job.len());
        self.publish(initial);
        observer.started(&initial);

        let mut results = Vec::with_capacity(job.len());
        for file_id in &job.file_ids {
            if !self.is_live(generation) {
                warn!(
                    "Batch run {} reset after {} of {} item(s)",
                    job.id,
                    results.len(),
                    job.len()
                );
                break;
            }

            let item = self.process_item(file_id, &job.config).await;

            let published = {
                let mut state = self.lock_state();
                state.results.insert(file_id.clone(), item.clone());
                if state.generation == generation {
                    if item.success {
                        state.status.completed += 1;
                    } else {
                        state.status.failed += 1;
                    }
                    if state.status.is_finished() {
                        state.status.in_progress = false;
                    }
                    Some(state.status)
                } else {
                    // A reset raced with this item. Its result is still
                    // recorded, but the run is no longer live: the reset
                    // already published the terminal status.
                    None
                }
            };

            if let Some(status) = published {
                self.publish(status);
                observer.item_finished(&item, &status);
            }
            results.push(item);
        }

        results
    }

    async fn process_item(&self, file_id: &str, config: &BatchConfig) -> ItemResult {
        match self.analyzer.analyze(file_id, config).await {
            Ok(metadata) if metadata.is_empty() => {
                warn!("Analysis returned no usable metadata for {}", file_id);
                ItemResult::failure(file_id, "analysis returned no usable metadata".to_string())
            }
            Ok(metadata) => {
                let persist_error = match &self.store {
                    Some(store) => store
                        .persist(file_id, &metadata)
                        .await
                        .err()
                        .map(|e| e.to_string()),
                    None => None,
                };

                let item = ItemResult::success(file_id, metadata);
                match persist_error {
                    Some(error) => {
                        warn!("Failed to persist metadata for {}: {}", file_id, error);
                        item.with_persist_error(error)
                    }
                    None => item,
                }
            }
            Err(e) => {
                debug!("Analysis failed for {}: {}", file_id, e);
                ItemResult::failure(file_id, e.to_string())
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_live(&self, generation: u64) -> bool {
        self.lock_state().generation == generation
    }

    /// Dispatches over a snapshot of the registry so callbacks can subscribe
    /// or unsubscribe (including themselves) mid-sweep.
    fn publish(&self, status: RunStatus) {
        let snapshot: Vec<SubscriberFn> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(status);
        }
    }
}
