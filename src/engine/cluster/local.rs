use crate::engine::cluster::metadata::{
    ClusterMetadata, DataStream, LifecycleAttachment, LifecycleConfig, LifecycleDefaults,
    MergeSettings, Segment, SegmentId, SegmentStats,
};
use crate::engine::cluster::ops::ClusterOps;
use crate::engine::errors::ClusterOpError;
use crate::shared::clock::Clock;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

const LOG_TARGET: &str = "cluster::local";

#[derive(Debug, Default)]
struct ClusterState {
    streams: BTreeMap<String, DataStream>,
    templates: BTreeMap<String, LifecycleConfig>,
    defaults: LifecycleDefaults,
}

/// In-memory cluster metadata service. Stands in for the real cluster in
/// the local binary and in scenario tests: it owns the authoritative
/// stream/segment state and implements the operation surface the
/// reconciler drives, plus the administrative mutations operators use
/// (create streams, tune retention, retune merge-policy defaults).
pub struct LocalCluster {
    clock: Arc<dyn Clock>,
    state: RwLock<ClusterState>,
}

impl LocalCluster {
    pub fn new(clock: Arc<dyn Clock>, defaults: LifecycleDefaults) -> Self {
        Self {
            clock,
            state: RwLock::new(ClusterState {
                streams: BTreeMap::new(),
                templates: BTreeMap::new(),
                defaults,
            }),
        }
    }

    /// Creates a stream with a single generation-1 write target.
    pub fn create_stream(&self, name: &str, lifecycle: LifecycleAttachment) -> SegmentId {
        let now = self.clock.now_millis();
        let mut state = self.state.write();
        let merge = state.defaults.merge;
        let mut segment = Segment::new(name, 1, now, merge);
        segment.write_target = true;
        let id = segment.id.clone();
        state.streams.insert(
            name.to_string(),
            DataStream {
                name: name.to_string(),
                generation: 1,
                segments: vec![segment],
                lifecycle,
            },
        );
        info!(target: LOG_TARGET, stream = name, "Created data stream");
        id
    }

    pub fn put_template(&self, name: &str, config: LifecycleConfig) {
        self.state
            .write()
            .templates
            .insert(name.to_string(), config);
    }

    /// Records freshly indexed documents against the write target. Stats
    /// are supplied externally; the cluster only keeps the running totals.
    pub fn index_docs(&self, stream: &str, docs: u64, bytes: u64) -> Result<(), ClusterOpError> {
        let mut state = self.state.write();
        let ds = state
            .streams
            .get_mut(stream)
            .ok_or_else(|| ClusterOpError::NotFound(stream.to_string()))?;
        let target = ds
            .segments
            .last_mut()
            .ok_or_else(|| ClusterOpError::NotFound(stream.to_string()))?;
        target.stats.docs += docs;
        target.stats.primary_size_bytes += bytes;
        Ok(())
    }

    pub fn set_lifecycle(
        &self,
        stream: &str,
        lifecycle: LifecycleAttachment,
    ) -> Result<(), ClusterOpError> {
        let mut state = self.state.write();
        let ds = state
            .streams
            .get_mut(stream)
            .ok_or_else(|| ClusterOpError::NotFound(stream.to_string()))?;
        ds.lifecycle = lifecycle;
        Ok(())
    }

    /// Flips the enabled flag on a directly attached configuration.
    pub fn set_enabled(&self, stream: &str, enabled: bool) -> Result<(), ClusterOpError> {
        self.mutate_config(stream, |cfg| cfg.enabled = enabled)
    }

    pub fn set_retention(
        &self,
        stream: &str,
        retention_millis: Option<u64>,
    ) -> Result<(), ClusterOpError> {
        self.mutate_config(stream, |cfg| cfg.retention_millis = retention_millis)
    }

    fn mutate_config(
        &self,
        stream: &str,
        apply: impl FnOnce(&mut LifecycleConfig),
    ) -> Result<(), ClusterOpError> {
        let mut state = self.state.write();
        let ds = state
            .streams
            .get_mut(stream)
            .ok_or_else(|| ClusterOpError::NotFound(stream.to_string()))?;
        match &mut ds.lifecycle {
            LifecycleAttachment::Config(cfg) => {
                apply(cfg);
                Ok(())
            }
            _ => Err(ClusterOpError::Blocked(format!(
                "stream {stream} has no directly attached lifecycle"
            ))),
        }
    }

    pub fn set_origination(
        &self,
        segment: &SegmentId,
        origination_millis: u64,
    ) -> Result<(), ClusterOpError> {
        self.mutate_segment(segment, |seg| {
            seg.origination_millis = Some(origination_millis)
        })
    }

    pub fn set_read_only(&self, segment: &SegmentId, read_only: bool) -> Result<(), ClusterOpError> {
        self.mutate_segment(segment, |seg| seg.read_only = read_only)
    }

    pub fn set_segment_stats(
        &self,
        segment: &SegmentId,
        stats: SegmentStats,
    ) -> Result<(), ClusterOpError> {
        self.mutate_segment(segment, |seg| seg.stats = stats)
    }

    /// Retunes the cluster-wide defaults. Existing segments converge on
    /// later passes; future rollovers are born with the new targets.
    pub fn set_defaults(&self, defaults: LifecycleDefaults) {
        self.state.write().defaults = defaults;
    }

    fn mutate_segment(
        &self,
        id: &SegmentId,
        apply: impl FnOnce(&mut Segment),
    ) -> Result<(), ClusterOpError> {
        let mut state = self.state.write();
        for ds in state.streams.values_mut() {
            if let Some(seg) = ds.segments.iter_mut().find(|seg| &seg.id == id) {
                apply(seg);
                return Ok(());
            }
        }
        Err(ClusterOpError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ClusterOps for LocalCluster {
    async fn snapshot(&self) -> Result<ClusterMetadata, ClusterOpError> {
        let state = self.state.read();
        Ok(ClusterMetadata {
            streams: state.streams.clone(),
            templates: state.templates.clone(),
            defaults: state.defaults.clone(),
        })
    }

    async fn rollover(
        &self,
        stream: &str,
        expected_generation: u64,
    ) -> Result<(), ClusterOpError> {
        let now = self.clock.now_millis();
        let mut state = self.state.write();
        let merge = state.defaults.merge;
        let ds = state
            .streams
            .get_mut(stream)
            .ok_or_else(|| ClusterOpError::NotFound(stream.to_string()))?;
        if ds.generation != expected_generation {
            debug!(
                target: LOG_TARGET,
                stream,
                expected = expected_generation,
                actual = ds.generation,
                "Rollover conflict"
            );
            return Err(ClusterOpError::Conflict);
        }

        if let Some(old) = ds.segments.last_mut() {
            old.write_target = false;
        }
        let next_generation = ds.generation + 1;
        let mut segment = Segment::new(stream, next_generation, now, merge);
        segment.write_target = true;
        info!(
            target: LOG_TARGET,
            stream,
            generation = next_generation,
            segment = %segment.id,
            "Rolled over write target"
        );
        ds.segments.push(segment);
        ds.generation = next_generation;
        Ok(())
    }

    async fn force_merge(&self, segment: &SegmentId) -> Result<(), ClusterOpError> {
        let now = self.clock.now_millis();
        self.mutate_segment(segment, |seg| {
            if seg.merged_at_millis.is_none() {
                seg.merged_at_millis = Some(now);
            }
        })?;
        info!(target: LOG_TARGET, segment = %segment, "Force merge completed");
        Ok(())
    }

    async fn update_merge_settings(
        &self,
        segment: &SegmentId,
        settings: MergeSettings,
    ) -> Result<(), ClusterOpError> {
        self.mutate_segment(segment, |seg| seg.merge = settings)?;
        debug!(
            target: LOG_TARGET,
            segment = %segment,
            factor = settings.factor,
            floor_segment_bytes = settings.floor_segment_bytes,
            "Applied merge settings"
        );
        Ok(())
    }

    async fn delete_segment(&self, segment: &SegmentId) -> Result<(), ClusterOpError> {
        let mut state = self.state.write();
        for ds in state.streams.values_mut() {
            if let Some(pos) = ds.segments.iter().position(|seg| &seg.id == segment) {
                if ds.segments[pos].write_target {
                    return Err(ClusterOpError::Blocked(format!(
                        "segment {segment} is the write target"
                    )));
                }
                if ds.segments[pos].read_only {
                    return Err(ClusterOpError::Blocked(format!(
                        "segment {segment} is read-only"
                    )));
                }
                ds.segments.remove(pos);
                info!(target: LOG_TARGET, segment = %segment, stream = %ds.name, "Deleted segment");
                return Ok(());
            }
        }
        Err(ClusterOpError::NotFound(segment.to_string()))
    }
}
