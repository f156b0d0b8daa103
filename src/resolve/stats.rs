//! Merge counters

use crate::graph::MergeOutcome;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Running totals of everything written through one merger.
///
/// Shared between the resolver, promoter and expander, and between the
/// consumer tasks of a pipeline, so counters are atomic.
#[derive(Debug, Default)]
pub struct MergeStats {
    nodes_created: AtomicUsize,
    nodes_matched: AtomicUsize,
    relationships_created: AtomicUsize,
    relationships_matched: AtomicUsize,
    labels_added: AtomicUsize,
    failures: AtomicUsize,
}

/// Point-in-time copy of [`MergeStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeCounts {
    pub nodes_created: usize,
    pub nodes_matched: usize,
    pub relationships_created: usize,
    pub relationships_matched: usize,
    pub labels_added: usize,
    pub failures: usize,
}

impl MergeCounts {
    /// Counts accumulated since `earlier`
    pub fn since(&self, earlier: &MergeCounts) -> MergeCounts {
        MergeCounts {
            nodes_created: self.nodes_created - earlier.nodes_created,
            nodes_matched: self.nodes_matched - earlier.nodes_matched,
            relationships_created: self.relationships_created - earlier.relationships_created,
            relationships_matched: self.relationships_matched - earlier.relationships_matched,
            labels_added: self.labels_added - earlier.labels_added,
            failures: self.failures - earlier.failures,
        }
    }
}

impl MergeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_node(&self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Created => self.nodes_created.fetch_add(1, Ordering::Relaxed),
            MergeOutcome::Matched => self.nodes_matched.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub(crate) fn record_relationship(&self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Created => self.relationships_created.fetch_add(1, Ordering::Relaxed),
            MergeOutcome::Matched => self.relationships_matched.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub(crate) fn record_label(&self, outcome: MergeOutcome) {
        if outcome.is_created() {
            self.labels_added.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MergeCounts {
        MergeCounts {
            nodes_created: self.nodes_created.load(Ordering::Relaxed),
            nodes_matched: self.nodes_matched.load(Ordering::Relaxed),
            relationships_created: self.relationships_created.load(Ordering::Relaxed),
            relationships_matched: self.relationships_matched.load(Ordering::Relaxed),
            labels_added: self.labels_added.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
