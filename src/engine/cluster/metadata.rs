use crate::engine::errors::EvalError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Identity of one backing segment. Rendered as `{stream}-{generation}`,
/// zero-padded so lexicographic order follows generation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(String);

impl SegmentId {
    pub fn new(stream: &str, generation: u64) -> Self {
        Self(format!("{stream}-{generation:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Merge-policy settings carried by a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSettings {
    pub factor: u32,
    pub floor_segment_bytes: u64,
}

impl Default for MergeSettings {
    /// Storage-engine defaults a segment is born with when nothing else
    /// has been applied to it.
    fn default() -> Self {
        Self {
            factor: 10,
            floor_segment_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Size and document statistics supplied by the storage engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub docs: u64,
    pub primary_size_bytes: u64,
}

/// One backing segment of a data stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Monotonic per stream.
    pub generation: u64,
    pub created_at_millis: u64,
    /// Overrides creation time for retention math, e.g. for data migrated
    /// in with an older "data born" timestamp. Falls back to creation.
    pub origination_millis: Option<u64>,
    pub write_target: bool,
    pub read_only: bool,
    pub merge: MergeSettings,
    pub stats: SegmentStats,
    /// Set once the segment has been force-merged after rolling over.
    /// Lives in cluster metadata so a reconciler restart does not merge
    /// the same generation twice.
    pub merged_at_millis: Option<u64>,
}

impl Segment {
    pub fn new(stream: &str, generation: u64, now_millis: u64, merge: MergeSettings) -> Self {
        Self {
            id: SegmentId::new(stream, generation),
            generation,
            created_at_millis: now_millis,
            origination_millis: None,
            write_target: false,
            read_only: false,
            merge,
            stats: SegmentStats::default(),
            merged_at_millis: None,
        }
    }

    /// Timestamp retention is measured from.
    pub fn origination(&self) -> u64 {
        self.origination_millis.unwrap_or(self.created_at_millis)
    }

    pub fn age_millis(&self, now_millis: u64) -> u64 {
        now_millis.saturating_sub(self.created_at_millis)
    }
}

/// Thresholds that trigger rollover of the write target. Any exceeded
/// max_* condition rolls the segment, provided min_docs is met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverConditions {
    pub max_age_millis: Option<u64>,
    pub max_docs: Option<u64>,
    pub max_primary_size_bytes: Option<u64>,
    pub min_docs: u64,
}

impl RolloverConditions {
    pub fn has_trigger(&self) -> bool {
        self.max_age_millis.is_some()
            || self.max_docs.is_some()
            || self.max_primary_size_bytes.is_some()
    }
}

/// Lifecycle configuration attached to a stream, directly or via template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    pub enabled: bool,
    /// None retains forever.
    pub retention_millis: Option<u64>,
    /// None falls back to the cluster-wide default conditions.
    pub rollover: Option<RolloverConditions>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_millis: None,
            rollover: None,
        }
    }
}

/// How a stream picks up its lifecycle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleAttachment {
    Config(LifecycleConfig),
    Template(String),
    Unmanaged,
}

/// A named, append-only collection backed by an ordered segment chain.
/// Segments run oldest to newest; the newest is the write target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStream {
    pub name: String,
    pub generation: u64,
    pub segments: Vec<Segment>,
    pub lifecycle: LifecycleAttachment,
}

impl DataStream {
    pub fn write_target(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Resolves the effective lifecycle configuration, following a template
    /// attachment through the snapshot's template map. `Ok(None)` means the
    /// stream is unmanaged.
    pub fn resolve_lifecycle<'a>(
        &'a self,
        templates: &'a BTreeMap<String, LifecycleConfig>,
    ) -> Result<Option<&'a LifecycleConfig>, EvalError> {
        match &self.lifecycle {
            LifecycleAttachment::Config(cfg) => Ok(Some(cfg)),
            LifecycleAttachment::Template(name) => templates
                .get(name)
                .map(Some)
                .ok_or_else(|| EvalError::UnknownTemplate(name.clone())),
            LifecycleAttachment::Unmanaged => Ok(None),
        }
    }
}

/// Cluster-wide lifecycle defaults in force when a snapshot was cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleDefaults {
    pub rollover: RolloverConditions,
    pub merge: MergeSettings,
}

impl Default for LifecycleDefaults {
    fn default() -> Self {
        Self {
            rollover: RolloverConditions {
                max_age_millis: Some(7 * 24 * 60 * 60 * 1_000),
                max_docs: Some(200_000_000),
                max_primary_size_bytes: Some(50 * 1024 * 1024 * 1024),
                min_docs: 1,
            },
            merge: MergeSettings {
                factor: 16,
                floor_segment_bytes: 100 * 1024 * 1024,
            },
        }
    }
}

/// Point-in-time, read-only view of cluster metadata. One snapshot backs
/// one whole reconciliation pass; it is never re-read mid-pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterMetadata {
    pub streams: BTreeMap<String, DataStream>,
    pub templates: BTreeMap<String, LifecycleConfig>,
    #[serde(default)]
    pub defaults: LifecycleDefaults,
}

impl ClusterMetadata {
    pub fn find_segment(&self, id: &SegmentId) -> Option<(&DataStream, &Segment)> {
        self.streams.values().find_map(|stream| {
            stream
                .segments
                .iter()
                .find(|seg| &seg.id == id)
                .map(|seg| (stream, seg))
        })
    }

    /// Every segment id referenced by any stream. Targets outside this set
    /// no longer exist and their error entries can be dropped.
    pub fn all_segment_ids(&self) -> HashSet<SegmentId> {
        self.streams
            .values()
            .flat_map(|stream| stream.segments.iter().map(|seg| seg.id.clone()))
            .collect()
    }
}
