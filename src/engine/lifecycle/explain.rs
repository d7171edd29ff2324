use crate::engine::cluster::metadata::{ClusterMetadata, SegmentId};
use crate::engine::lifecycle::error_store::{ErrorEntry, ErrorStore};
use serde::Serialize;

/// Operator-facing view of where one segment stands in its lifecycle.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    pub segment: SegmentId,
    pub stream: String,
    /// True when the owning stream resolves to an enabled lifecycle.
    pub is_managed: bool,
    pub is_write_target: bool,
    pub generation: u64,
    pub created_at_millis: u64,
    pub origination_millis: u64,
    pub retention_millis: Option<u64>,
    /// Remaining time before the segment ages out, when retention applies
    /// and the segment is eligible for deletion at all.
    pub time_until_delete_millis: Option<u64>,
    pub merged_at_millis: Option<u64>,
    pub last_error: Option<ErrorEntry>,
}

/// Resolves the explain view for `segment`, or `None` when no stream
/// references it. Reads only the given snapshot and store.
pub fn explain(
    meta: &ClusterMetadata,
    errors: &ErrorStore,
    segment: &SegmentId,
    now_millis: u64,
) -> Option<ExplainReport> {
    let (stream, seg) = meta.find_segment(segment)?;

    let config = stream.resolve_lifecycle(&meta.templates).ok().flatten();
    let is_managed = config.is_some_and(|cfg| cfg.enabled);
    let retention_millis = config.filter(|cfg| cfg.enabled).and_then(|cfg| cfg.retention_millis);

    let time_until_delete_millis = match (retention_millis, seg.write_target) {
        (Some(retention), false) => {
            let age = now_millis.saturating_sub(seg.origination());
            Some(retention.saturating_sub(age))
        }
        _ => None,
    };

    Some(ExplainReport {
        segment: seg.id.clone(),
        stream: stream.name.clone(),
        is_managed,
        is_write_target: seg.write_target,
        generation: seg.generation,
        created_at_millis: seg.created_at_millis,
        origination_millis: seg.origination(),
        retention_millis,
        time_until_delete_millis,
        merged_at_millis: seg.merged_at_millis,
        last_error: errors.get(segment),
    })
}
