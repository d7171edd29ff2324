use crate::engine::cluster::metadata::SegmentId;
use crate::shared::clock::Clock;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

const LOG_TARGET: &str = "lifecycle::error_store";

/// Most recent lifecycle failure for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub target: SegmentId,
    pub message: String,
    /// Consecutive failed attempts after the first; starts at zero.
    pub retry_count: u32,
    pub first_occurrence_millis: u64,
}

/// Process-local record of in-flight lifecycle failures, keyed by target.
/// Rebuilt empty on restart: cluster metadata stays authoritative for what
/// actually happened; this exists for diagnostics and retry visibility.
///
/// Entries impose no backoff. An errored target is retried on every pass;
/// the entry just keeps the condition visible until a success clears it or
/// the target disappears.
pub struct ErrorStore {
    clock: Arc<dyn Clock>,
    entries: DashMap<SegmentId, ErrorEntry>,
}

impl ErrorStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: DashMap::new(),
        }
    }

    /// Inserts or updates the entry for `target`. Repeated failures bump
    /// the retry counter and replace the message; the first-occurrence
    /// timestamp is kept.
    pub fn record(&self, target: &SegmentId, message: impl Into<String>) {
        let message = message.into();
        match self.entries.entry(target.clone()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.retry_count += 1;
                entry.message = message;
                debug!(
                    target: LOG_TARGET,
                    segment = %target,
                    retry_count = entry.retry_count,
                    "Updated error entry"
                );
            }
            Entry::Vacant(vacant) => {
                vacant.insert(ErrorEntry {
                    target: target.clone(),
                    message,
                    retry_count: 0,
                    first_occurrence_millis: self.clock.now_millis(),
                });
                debug!(target: LOG_TARGET, segment = %target, "Recorded error entry");
            }
        }
    }

    /// Removes the entry if present.
    pub fn clear(&self, target: &SegmentId) {
        if self.entries.remove(target).is_some() {
            debug!(target: LOG_TARGET, segment = %target, "Cleared error entry");
        }
    }

    pub fn get(&self, target: &SegmentId) -> Option<ErrorEntry> {
        self.entries.get(target).map(|entry| entry.value().clone())
    }

    /// Drops entries whose target no longer belongs to any stream, so
    /// deleted streams and segments do not accumulate stale errors.
    pub fn clear_unreferenced(&self, live: &HashSet<SegmentId>) {
        let mut removed = 0usize;
        self.entries.retain(|target, _| {
            let keep = live.contains(target);
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            debug!(target: LOG_TARGET, removed, "Swept error entries for removed targets");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
