use crate::engine::cluster::metadata::SegmentId;
use crate::engine::cluster::ops::ClusterOps;
use crate::engine::errors::ClusterOpError;
use crate::engine::lifecycle::dispatcher::ActionDispatcher;
use crate::engine::lifecycle::error_store::ErrorStore;
use crate::engine::lifecycle::explain::{self, ExplainReport};
use crate::engine::lifecycle::policy::evaluate_stream;
use crate::shared::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

const LOG_TARGET: &str = "lifecycle::orchestrator";

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub poll_interval: Duration,
}

/// Actions issued by one reconciliation pass. The pass is logically
/// complete once these are issued, not once they finish; the timer loop
/// drops the handles and lets outcomes land in the error store.
#[derive(Default)]
pub struct TickActions {
    handles: Vec<JoinHandle<()>>,
}

impl TickActions {
    pub fn issued(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every issued action to complete. Test and shutdown aid;
    /// the steady-state loop never calls this.
    pub async fn settle(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

/// The reconciliation control loop. Two states: idle between ticks and
/// running while a pass is active. A timer firing while a pass is still
/// running is skipped outright, never queued, which bounds the system to
/// one in-flight pass and at most one in-flight action per target.
///
/// Level-triggered: every pass re-derives its decisions from a fresh
/// snapshot, so a missed or crashed pass needs no recovery beyond waiting
/// for the next one.
pub struct LifecycleOrchestrator {
    cluster: Arc<dyn ClusterOps>,
    clock: Arc<dyn Clock>,
    errors: Arc<ErrorStore>,
    dispatcher: ActionDispatcher,
    settings: OrchestratorSettings,
    running: AtomicBool,
}

impl LifecycleOrchestrator {
    pub fn new(
        cluster: Arc<dyn ClusterOps>,
        clock: Arc<dyn Clock>,
        settings: OrchestratorSettings,
    ) -> Self {
        let errors = Arc::new(ErrorStore::new(Arc::clone(&clock)));
        let dispatcher = ActionDispatcher::new(Arc::clone(&cluster), Arc::clone(&errors));
        Self {
            cluster,
            clock,
            errors,
            dispatcher,
            settings,
            running: AtomicBool::new(false),
        }
    }

    pub fn error_store(&self) -> Arc<ErrorStore> {
        Arc::clone(&self.errors)
    }

    /// Drives ticks until the task is dropped or aborted.
    pub async fn run(self: Arc<Self>) {
        info!(
            target: LOG_TARGET,
            poll_interval_secs = self.settings.poll_interval.as_secs(),
            "Lifecycle orchestrator started"
        );
        let mut timer = tokio::time::interval(self.settings.poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick fires immediately; that one is the
        // startup pass.
        loop {
            timer.tick().await;
            self.try_tick().await;
        }
    }

    /// Runs one pass unless a previous one is still active, in which case
    /// the tick is skipped and `None` returned.
    pub async fn try_tick(&self) -> Option<TickActions> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(target: LOG_TARGET, "Previous pass still running; skipping tick");
            return None;
        }
        let actions = self.run_tick().await;
        self.running.store(false, Ordering::SeqCst);
        Some(actions)
    }

    async fn run_tick(&self) -> TickActions {
        let meta = match self.cluster.snapshot().await {
            Ok(meta) => meta,
            Err(err) => {
                error!(target: LOG_TARGET, error = %err, "Failed to snapshot cluster metadata");
                return TickActions::default();
            }
        };
        let now = self.clock.now_millis();

        // Entries for segments that no longer exist anywhere are dead;
        // everything else stays until a success clears it.
        self.errors.clear_unreferenced(&meta.all_segment_ids());

        let mut actions = TickActions::default();
        let mut evaluated = 0usize;
        let mut skipped = 0usize;

        for stream in meta.streams.values() {
            match evaluate_stream(stream, &meta, now) {
                Ok(decisions) => {
                    evaluated += 1;
                    for decision in decisions {
                        debug!(target: LOG_TARGET, stream = %stream.name, ?decision, "Dispatching");
                        actions.handles.push(self.dispatcher.dispatch(decision));
                    }
                }
                Err(err) => {
                    skipped += 1;
                    warn!(
                        target: LOG_TARGET,
                        stream = %stream.name,
                        error = %err,
                        "Skipping stream with invalid lifecycle configuration"
                    );
                }
            }
        }

        info!(
            target: LOG_TARGET,
            streams = evaluated,
            skipped,
            actions = actions.issued(),
            "Lifecycle pass issued"
        );
        actions
    }

    /// Diagnostic view of one segment against the current metadata and the
    /// in-memory error record.
    pub async fn explain(&self, segment: &SegmentId) -> Result<Option<ExplainReport>, ClusterOpError> {
        let meta = self.cluster.snapshot().await?;
        Ok(explain::explain(
            &meta,
            &self.errors,
            segment,
            self.clock.now_millis(),
        ))
    }
}
