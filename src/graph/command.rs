//! Typed write commands accepted by a graph store
//!
//! Commands describe *what* to merge; each store decides how. The Cypher
//! text of a command is only ever produced for journaling and diagnostics
//! (see [`super::cypher`]).

use super::node::{NodeKey, Properties, PropertyValue};
use serde::{Deserialize, Serialize};

/// Merge a node by key, `apoc.merge.node` style.
///
/// On create the node receives its key property, `labels` and `on_create`.
/// On match `labels` are added and `on_match` overwrites; the key property is
/// never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeNode {
    pub key: NodeKey,
    /// Labels beyond the primary label of `key`
    pub labels: Vec<String>,
    pub on_create: Properties,
    pub on_match: Properties,
}

impl MergeNode {
    pub fn new(key: NodeKey) -> Self {
        Self {
            key,
            labels: Vec::new(),
            on_create: Properties::new(),
            on_match: Properties::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if label != self.key.label && !self.labels.contains(&label) {
            self.labels.push(label);
        }
        self
    }

    pub fn on_create(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.on_create.insert(name.into(), value.into());
        self
    }

    pub fn on_match(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.on_match.insert(name.into(), value.into());
        self
    }
}

/// Merge a relationship between two existing nodes, `apoc.merge.relationship` style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRelationship {
    pub from: NodeKey,
    pub rel_type: String,
    pub to: NodeKey,
    /// Identifying properties
    pub ident: Properties,
    /// Set only when the relationship is created
    pub on_create: Properties,
}

impl MergeRelationship {
    pub fn new(from: NodeKey, rel_type: impl Into<String>, to: NodeKey) -> Self {
        Self {
            from,
            rel_type: rel_type.into(),
            to,
            ident: Properties::new(),
            on_create: Properties::new(),
        }
    }

    pub fn with_ident(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.ident.insert(name.into(), value.into());
        self
    }

    pub fn on_create(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.on_create.insert(name.into(), value.into());
        self
    }
}

/// Any single write against the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphCommand {
    MergeNode(MergeNode),
    MergeRelationship(MergeRelationship),
    AddLabel { key: NodeKey, label: String },
}

impl From<MergeNode> for GraphCommand {
    fn from(cmd: MergeNode) -> Self {
        GraphCommand::MergeNode(cmd)
    }
}

impl From<MergeRelationship> for GraphCommand {
    fn from(cmd: MergeRelationship) -> Self {
        GraphCommand::MergeRelationship(cmd)
    }
}

/// What a merge did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// Nothing matched the key, a new element was written
    Created,
    /// An existing element matched
    Matched,
}

impl MergeOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, MergeOutcome::Created)
    }
}
