use crate::engine::cluster::metadata::{
    ClusterMetadata, DataStream, LifecycleConfig, MergeSettings, RolloverConditions, Segment,
    SegmentId,
};
use crate::engine::errors::EvalError;
use std::collections::HashSet;
use tracing::debug;

const LOG_TARGET: &str = "lifecycle::policy";

/// One action the reconciler should take against the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Rollover {
        stream: String,
        /// Identity the failure is attributed to if the request errors.
        write_target: SegmentId,
        /// Generation the request is conditioned on; a mismatch at the
        /// cluster means another path already rolled the stream.
        expected_generation: u64,
    },
    Delete {
        segment: SegmentId,
    },
    ForceMerge {
        segment: SegmentId,
    },
    UpdateMergeSettings {
        segment: SegmentId,
        settings: MergeSettings,
    },
}

impl Decision {
    /// Target the outcome is recorded against in the error store.
    pub fn target(&self) -> &SegmentId {
        match self {
            Decision::Rollover { write_target, .. } => write_target,
            Decision::Delete { segment } => segment,
            Decision::ForceMerge { segment } => segment,
            Decision::UpdateMergeSettings { segment, .. } => segment,
        }
    }
}

/// Maps one stream to its decision set for this pass. Pure: same snapshot
/// and clock in, same decisions out, no state carried between calls.
///
/// Decisions are derived from the snapshot alone, so a rollover issued
/// during this pass cannot make its segment merge-eligible until the next
/// snapshot shows it as a non-write target.
pub fn evaluate_stream(
    stream: &DataStream,
    meta: &ClusterMetadata,
    now_millis: u64,
) -> Result<Vec<Decision>, EvalError> {
    let config = match stream.resolve_lifecycle(&meta.templates)? {
        Some(cfg) if cfg.enabled => cfg,
        _ => return Ok(Vec::new()),
    };

    let conditions = effective_rollover(stream, config, &meta.defaults.rollover)?;

    let mut decisions = Vec::new();

    // Delete-eligible segments first; nothing else is worth doing to a
    // segment that is about to be removed.
    let mut doomed: HashSet<&SegmentId> = HashSet::new();
    if let Some(retention) = config.retention_millis {
        for segment in non_write_targets(stream) {
            if past_retention(segment, retention, now_millis) {
                doomed.insert(&segment.id);
                decisions.push(Decision::Delete {
                    segment: segment.id.clone(),
                });
            }
        }
    }

    for segment in non_write_targets(stream) {
        if doomed.contains(&segment.id) {
            continue;
        }
        if segment.merged_at_millis.is_none() {
            decisions.push(Decision::ForceMerge {
                segment: segment.id.clone(),
            });
        }
    }

    for segment in &stream.segments {
        if doomed.contains(&segment.id) {
            continue;
        }
        if segment.merge != meta.defaults.merge {
            decisions.push(Decision::UpdateMergeSettings {
                segment: segment.id.clone(),
                settings: meta.defaults.merge,
            });
        }
    }

    if let Some(target) = stream.write_target() {
        if rollover_due(target, conditions, now_millis) {
            decisions.push(Decision::Rollover {
                stream: stream.name.clone(),
                write_target: target.id.clone(),
                expected_generation: stream.generation,
            });
        }
    }

    if !decisions.is_empty() {
        debug!(
            target: LOG_TARGET,
            stream = %stream.name,
            decisions = decisions.len(),
            "Evaluated stream"
        );
    }

    Ok(decisions)
}

/// Stream-level conditions win over the cluster defaults. There is always
/// an effective condition set; one that cannot ever fire is a
/// configuration error.
fn effective_rollover<'a>(
    stream: &DataStream,
    config: &'a LifecycleConfig,
    defaults: &'a RolloverConditions,
) -> Result<&'a RolloverConditions, EvalError> {
    let conditions = config.rollover.as_ref().unwrap_or(defaults);
    if !conditions.has_trigger() {
        return Err(EvalError::EmptyRolloverConditions(stream.name.clone()));
    }
    Ok(conditions)
}

fn non_write_targets(stream: &DataStream) -> impl Iterator<Item = &Segment> {
    stream.segments.iter().filter(|seg| !seg.write_target)
}

fn past_retention(segment: &Segment, retention_millis: u64, now_millis: u64) -> bool {
    now_millis.saturating_sub(segment.origination()) > retention_millis
}

fn rollover_due(target: &Segment, conditions: &RolloverConditions, now_millis: u64) -> bool {
    if target.stats.docs < conditions.min_docs {
        return false;
    }
    let age_exceeded = conditions
        .max_age_millis
        .is_some_and(|max| target.age_millis(now_millis) > max);
    let docs_exceeded = conditions.max_docs.is_some_and(|max| target.stats.docs >= max);
    let size_exceeded = conditions
        .max_primary_size_bytes
        .is_some_and(|max| target.stats.primary_size_bytes >= max);
    age_exceeded || docs_exceeded || size_exceeded
}
