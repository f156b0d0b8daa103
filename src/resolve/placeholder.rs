//! Skeleton creation for forward references
//!
//! A record often names an entity (its tumor, its gene) before that
//! entity's own row has been loaded. The resolver makes sure a node exists
//! for the key, creating a skeleton that carries only the key and
//! `created_at`, and then attaches the relationship. A skeleton merge never
//! touches an existing node's properties, so resolving after promotion is
//! harmless.

use super::error::MergeResult;
use super::key::EntityKey;
use super::writer::{timestamp, Writer};
use crate::graph::{MergeNode, MergeOutcome, MergeRelationship, NodeKey, Properties, CREATED_AT};

#[derive(Clone)]
pub struct PlaceholderResolver {
    writer: Writer,
}

impl PlaceholderResolver {
    pub(crate) fn new(writer: Writer) -> Self {
        Self { writer }
    }

    /// Ensure a node exists for `key`. Create-if-absent, never update on match.
    pub fn ensure_skeleton(&self, key: &EntityKey) -> MergeResult<NodeKey> {
        let node_key = key.node_key();
        let mut cmd = MergeNode::new(node_key.clone()).on_create(CREATED_AT, timestamp());
        for label in key.extra_labels() {
            cmd = cmd.with_label(label);
        }
        self.writer.merge_node(cmd)?;
        Ok(node_key)
    }

    /// Merge `from -[rel_type]-> to` between two existing nodes.
    pub fn relate(
        &self,
        from: &NodeKey,
        rel_type: &str,
        to: &NodeKey,
        ident: Properties,
    ) -> MergeResult<MergeOutcome> {
        let mut cmd = MergeRelationship::new(from.clone(), rel_type, to.clone())
            .on_create(CREATED_AT, timestamp());
        cmd.ident = ident;
        self.writer.merge_relationship(cmd)
    }

    /// `from -[rel_type]-> target`, creating `target` as a skeleton if needed.
    pub fn link_to(&self, from: &NodeKey, rel_type: &str, target: &EntityKey) -> MergeResult<NodeKey> {
        let target_key = self.ensure_skeleton(target)?;
        self.relate(from, rel_type, &target_key, Properties::new())?;
        Ok(target_key)
    }

    /// `parent -[HAS_<CHILD>]-> child`, creating `parent` as a skeleton if needed.
    ///
    /// The relationship type comes from the child's kind, e.g. a breakpoint
    /// under a tumor is `HAS_BREAKPOINT`.
    pub fn link_from(&self, parent: &EntityKey, child: &EntityKey) -> MergeResult<NodeKey> {
        let parent_key = self.ensure_skeleton(parent)?;
        self.relate(
            &parent_key,
            &child.has_relationship(),
            &child.node_key(),
            Properties::new(),
        )?;
        Ok(parent_key)
    }

    /// `child_holder -[HAS_<TARGET>]-> target`, the common forward-reference shape.
    pub fn link_child(&self, from: &NodeKey, target: &EntityKey) -> MergeResult<NodeKey> {
        self.link_to(from, &target.has_relationship(), target)
    }
}
