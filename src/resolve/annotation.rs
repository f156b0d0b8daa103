//! Fan-out of list-valued attributes into annotation nodes
//!
//! Each value becomes a node keyed by `(secondary label, value)`, so equal
//! values share one node. Each list element gets its own `HAS_<LABEL>` edge,
//! identified by its 1-based position in the list: a list of k values with d
//! distinct entries yields k edges and d annotation nodes, and re-expanding
//! the same list changes nothing.

use super::error::MergeResult;
use super::key::EntityKey;
use super::writer::{timestamp, Writer};
use crate::graph::{GraphCommand, MergeNode, MergeRelationship, NodeKey, CREATED_AT};

/// Identifying property of an annotation edge
pub const ORDINAL: &str = "ordinal";

#[derive(Clone)]
pub struct AnnotationExpander {
    writer: Writer,
}

impl AnnotationExpander {
    pub(crate) fn new(writer: Writer) -> Self {
        Self { writer }
    }

    /// Build the commands for one list without applying them.
    pub fn commands(parent: &NodeKey, secondary_label: &str, values: &[String]) -> Vec<GraphCommand> {
        let now = timestamp();
        let mut commands = Vec::with_capacity(values.len() * 2);
        for (index, value) in values.iter().enumerate() {
            let key = EntityKey::annotation(secondary_label, value.as_str());
            let mut node = MergeNode::new(key.node_key()).on_create(CREATED_AT, now.clone());
            for label in key.extra_labels() {
                node = node.with_label(label);
            }
            let edge = MergeRelationship::new(parent.clone(), key.has_relationship(), key.node_key())
                .with_ident(ORDINAL, (index + 1) as i64)
                .on_create(CREATED_AT, now.clone());
            commands.push(node.into());
            commands.push(edge.into());
        }
        commands
    }

    /// Attach `values` to `parent` under `secondary_label`.
    ///
    /// Applied as one store transaction. Returns the number of edges, which
    /// always equals `values.len()`. An empty list is a no-op.
    pub fn expand(&self, parent: &NodeKey, secondary_label: &str, values: &[String]) -> MergeResult<usize> {
        if values.is_empty() {
            return Ok(0);
        }
        self.writer
            .apply(&Self::commands(parent, secondary_label, values))?;
        Ok(values.len())
    }

    /// Expand several lists on one parent in a single transaction.
    pub fn expand_all(&self, parent: &NodeKey, lists: &[(&str, &[String])]) -> MergeResult<usize> {
        let mut commands = Vec::new();
        let mut edges = 0;
        for (label, values) in lists {
            commands.extend(Self::commands(parent, label, values));
            edges += values.len();
        }
        if commands.is_empty() {
            return Ok(0);
        }
        self.writer.apply(&commands)?;
        Ok(edges)
    }
}
