//! Promotion of entities from their own source rows
//!
//! Promotion is the only write allowed to overwrite descriptive properties.
//! It merges by key, so a skeleton left behind by the resolver is upgraded
//! in place: its labels and relationships survive and no second node appears.

use super::error::MergeResult;
use super::key::EntityKey;
use super::writer::{timestamp, Writer};
use crate::graph::{MergeNode, MergeOutcome, NodeKey, Properties, CREATED_AT, LAST_MODIFIED_AT};

#[derive(Clone)]
pub struct EntityPromoter {
    writer: Writer,
}

impl EntityPromoter {
    pub(crate) fn new(writer: Writer) -> Self {
        Self { writer }
    }

    /// Merge `props` into the node for `key`.
    ///
    /// On create: `props` plus `created_at`. On match: `props` plus
    /// `last_modified_at`. Last write wins on every descriptive field.
    pub fn promote(&self, key: &EntityKey, props: Properties) -> MergeResult<NodeKey> {
        self.promote_with_labels(key, &[], props).map(|(node_key, _)| node_key)
    }

    /// Like [`promote`](Self::promote), also adding `labels`.
    pub fn promote_with_labels(
        &self,
        key: &EntityKey,
        labels: &[&str],
        props: Properties,
    ) -> MergeResult<(NodeKey, MergeOutcome)> {
        let node_key = key.node_key();
        let now = timestamp();

        let mut cmd = MergeNode::new(node_key.clone());
        for label in key.extra_labels() {
            cmd = cmd.with_label(label);
        }
        for label in labels {
            cmd = cmd.with_label(*label);
        }
        cmd.on_create = props.clone();
        cmd.on_match = props;
        let cmd = cmd
            .on_create(CREATED_AT, now.clone())
            .on_match(LAST_MODIFIED_AT, now);

        let outcome = self.writer.merge_node(cmd)?;
        Ok((node_key, outcome))
    }
}
