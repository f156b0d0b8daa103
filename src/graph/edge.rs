//! Relationship representation

use super::node::{NodeKey, Properties};
use serde::{Deserialize, Serialize};

/// Relationship type linking a parent to a child with the given role name,
/// e.g. `has_relationship("sample")` is `HAS_SAMPLE`.
pub fn has_relationship(role: &str) -> String {
    format!("HAS_{}", role.to_uppercase())
}

/// A directed relationship between two nodes
///
/// Identity is `(from, rel_type, to, ident)`: merging the same identity twice
/// never produces a second edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeKey,
    pub rel_type: String,
    pub to: NodeKey,
    /// Properties that participate in the relationship identity
    pub ident: Properties,
    /// All properties, identifying ones included
    pub properties: Properties,
}

impl Edge {
    /// Stable identifier derived from the relationship identity
    pub fn identity(&self) -> String {
        edge_identity(&self.from, &self.rel_type, &self.to, &self.ident)
    }
}

/// Identifier shared by every store for an edge identity
pub(crate) fn edge_identity(from: &NodeKey, rel_type: &str, to: &NodeKey, ident: &Properties) -> String {
    let ident_json = serde_json::to_string(ident).unwrap_or_default();
    format!("{}|{}|{}|{}", from.id(), rel_type, to.id(), ident_json)
}
