use crate::engine::cluster::ops::ClusterOps;
use crate::engine::lifecycle::error_store::ErrorStore;
use crate::engine::lifecycle::policy::Decision;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const LOG_TARGET: &str = "lifecycle::dispatcher";

/// Translates evaluated decisions into cluster operations. Each dispatch
/// runs on its own task; the caller never waits on completion. Outcomes
/// land in the error store: success clears the target's entry, a benign
/// rollover conflict counts as success, anything else is recorded.
pub struct ActionDispatcher {
    cluster: Arc<dyn ClusterOps>,
    errors: Arc<ErrorStore>,
}

impl ActionDispatcher {
    pub fn new(cluster: Arc<dyn ClusterOps>, errors: Arc<ErrorStore>) -> Self {
        Self { cluster, errors }
    }

    pub fn dispatch(&self, decision: Decision) -> JoinHandle<()> {
        let cluster = Arc::clone(&self.cluster);
        let errors = Arc::clone(&self.errors);
        tokio::spawn(async move {
            let target = decision.target().clone();
            let outcome = match &decision {
                Decision::Rollover {
                    stream,
                    expected_generation,
                    ..
                } => cluster.rollover(stream, *expected_generation).await,
                Decision::Delete { segment } => cluster.delete_segment(segment).await,
                Decision::ForceMerge { segment } => cluster.force_merge(segment).await,
                Decision::UpdateMergeSettings { segment, settings } => {
                    cluster.update_merge_settings(segment, *settings).await
                }
            };

            match outcome {
                Ok(()) => {
                    debug!(target: LOG_TARGET, segment = %target, ?decision, "Action completed");
                    errors.clear(&target);
                }
                Err(err) if err.is_benign() => {
                    debug!(
                        target: LOG_TARGET,
                        segment = %target,
                        ?decision,
                        "Action superseded by concurrent change"
                    );
                    errors.clear(&target);
                }
                Err(err) => {
                    warn!(
                        target: LOG_TARGET,
                        segment = %target,
                        ?decision,
                        error = %err,
                        "Action failed"
                    );
                    errors.record(&target, err.to_string());
                }
            }
        })
    }
}
