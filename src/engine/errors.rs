use std::io;
use thiserror::Error;

/// Outcomes reported by the remote cluster operations the lifecycle
/// reconciler invokes.
#[derive(Debug, Error)]
pub enum ClusterOpError {
    /// The stream advanced past the snapshot this request was based on.
    /// Another path already rolled it over; not a failure.
    #[error("stream state changed since snapshot was taken")]
    Conflict,

    #[error("target not found: {0}")]
    NotFound(String),

    /// The target exists but refuses the operation in its current state,
    /// e.g. a read-only segment rejecting deletion.
    #[error("operation blocked: {0}")]
    Blocked(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ClusterOpError {
    /// Benign races are treated as no-op successes and never recorded.
    pub fn is_benign(&self) -> bool {
        matches!(self, ClusterOpError::Conflict)
    }
}

/// Configuration problems found while evaluating a stream. These skip the
/// affected stream for the current pass; other streams proceed.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unknown lifecycle template: {0}")]
    UnknownTemplate(String),

    #[error("rollover conditions for stream {0} define no trigger")]
    EmptyRolloverConditions(String),
}
