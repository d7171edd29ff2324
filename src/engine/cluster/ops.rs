use crate::engine::cluster::metadata::{ClusterMetadata, MergeSettings, SegmentId};
use crate::engine::errors::ClusterOpError;
use async_trait::async_trait;

/// Remote operations the lifecycle reconciler drives. Implemented by the
/// cluster service; everything here reports success or failure
/// asynchronously and must be safe to repeat across passes.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Point-in-time, read-only metadata view.
    async fn snapshot(&self) -> Result<ClusterMetadata, ClusterOpError>;

    /// Conditional rollover: applies only if the stream is still at
    /// `expected_generation`. A mismatch yields [`ClusterOpError::Conflict`],
    /// meaning another path already advanced the stream.
    async fn rollover(&self, stream: &str, expected_generation: u64)
    -> Result<(), ClusterOpError>;

    async fn force_merge(&self, segment: &SegmentId) -> Result<(), ClusterOpError>;

    async fn update_merge_settings(
        &self,
        segment: &SegmentId,
        settings: MergeSettings,
    ) -> Result<(), ClusterOpError>;

    async fn delete_segment(&self, segment: &SegmentId) -> Result<(), ClusterOpError>;
}
