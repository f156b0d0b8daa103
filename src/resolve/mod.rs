//! Entity identity and the idempotent merge protocol
//!
//! Every loader writes through a [`GraphMerger`]:
//!
//! - [`PlaceholderResolver`] creates skeleton nodes for forward references
//!   and attaches relationships to them
//! - [`EntityPromoter`] upgrades a node with its full properties
//! - [`AnnotationExpander`] fans list-valued attributes out into
//!   annotation nodes
//!
//! All three merge by key, so the final graph does not depend on the order
//! in which files, or rows within a file, are loaded.

mod annotation;
mod error;
mod key;
mod placeholder;
mod promoter;
mod stats;
mod writer;

pub use annotation::{AnnotationExpander, ORDINAL};
pub use error::{MergeError, MergeResult};
pub use key::{EntityKey, EntityKind, ANNOTATION_LABEL, NOT_SPECIFIED};
pub use placeholder::PlaceholderResolver;
pub use promoter::EntityPromoter;
pub use stats::{MergeCounts, MergeStats};

use crate::graph::{MergeOutcome, NodeKey};
use crate::storage::GraphStore;
use std::sync::Arc;
use writer::Writer;

/// Facade bundling the merge components over one shared store handle
#[derive(Clone)]
pub struct GraphMerger {
    writer: Writer,
    stats: Arc<MergeStats>,
    resolver: PlaceholderResolver,
    promoter: EntityPromoter,
    annotations: AnnotationExpander,
}

impl GraphMerger {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        let stats = Arc::new(MergeStats::new());
        let writer = Writer::new(store, Arc::clone(&stats));
        Self {
            resolver: PlaceholderResolver::new(writer.clone()),
            promoter: EntityPromoter::new(writer.clone()),
            annotations: AnnotationExpander::new(writer.clone()),
            writer,
            stats,
        }
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        self.writer.store()
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    pub fn resolver(&self) -> &PlaceholderResolver {
        &self.resolver
    }

    pub fn promoter(&self) -> &EntityPromoter {
        &self.promoter
    }

    pub fn annotations(&self) -> &AnnotationExpander {
        &self.annotations
    }

    /// Add `label` to an existing node. Labels are never replaced.
    pub fn add_label(&self, key: &NodeKey, label: &str) -> MergeResult<MergeOutcome> {
        self.writer.add_label(key, label)
    }
}
