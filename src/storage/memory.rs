//! In-memory storage backend
//!
//! Backed by `DashMap`, so merges on different keys proceed in parallel and
//! merges on the same key are serialized by the map's entry lock. Used for
//! tests and for dry runs that should not touch a database.

use super::apply::{apply_match, created_edge, created_node};
use super::traits::{GraphStore, NodeFilter, StorageError, StorageResult};
use crate::graph::{edge_identity, Edge, MergeNode, MergeOutcome, MergeRelationship, Node, NodeKey};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: DashMap<String, Node>,
    edges: DashMap<String, Edge>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn edges_matching(&self, predicate: impl Fn(&Edge) -> bool) -> Vec<Edge> {
        let mut edges: Vec<(String, Edge)> = self
            .edges
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        edges.sort_by(|a, b| a.0.cmp(&b.0));
        edges.into_iter().map(|(_, edge)| edge).collect()
    }
}

impl GraphStore for MemoryStore {
    fn merge_node(&self, cmd: &MergeNode) -> StorageResult<MergeOutcome> {
        match self.nodes.entry(cmd.key.id()) {
            Entry::Vacant(slot) => {
                slot.insert(created_node(cmd));
                Ok(MergeOutcome::Created)
            }
            Entry::Occupied(mut slot) => {
                apply_match(slot.get_mut(), cmd);
                Ok(MergeOutcome::Matched)
            }
        }
    }

    fn merge_relationship(&self, cmd: &MergeRelationship) -> StorageResult<MergeOutcome> {
        for endpoint in [&cmd.from, &cmd.to] {
            if !self.nodes.contains_key(&endpoint.id()) {
                return Err(StorageError::MissingEndpoint(endpoint.to_string()));
            }
        }
        let id = edge_identity(&cmd.from, &cmd.rel_type, &cmd.to, &cmd.ident);
        match self.edges.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(created_edge(cmd));
                Ok(MergeOutcome::Created)
            }
            Entry::Occupied(_) => Ok(MergeOutcome::Matched),
        }
    }

    fn add_label(&self, key: &NodeKey, label: &str) -> StorageResult<MergeOutcome> {
        let mut node = self
            .nodes
            .get_mut(&key.id())
            .ok_or_else(|| StorageError::NodeNotFound(key.to_string()))?;
        Ok(if node.labels.insert(label.to_string()) {
            MergeOutcome::Created
        } else {
            MergeOutcome::Matched
        })
    }

    fn load_node(&self, key: &NodeKey) -> StorageResult<Option<Node>> {
        Ok(self.nodes.get(&key.id()).map(|node| node.clone()))
    }

    fn node_exists(&self, key: &NodeKey) -> StorageResult<bool> {
        Ok(self.nodes.contains_key(&key.id()))
    }

    fn find_nodes(&self, filter: &NodeFilter) -> StorageResult<Vec<Node>> {
        let mut nodes: Vec<(String, Node)> = self
            .nodes
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        let limit = filter.limit.unwrap_or(usize::MAX);
        Ok(nodes.into_iter().take(limit).map(|(_, node)| node).collect())
    }

    fn count_nodes(&self) -> StorageResult<usize> {
        Ok(self.nodes.len())
    }

    fn edges_from(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
        Ok(self.edges_matching(|edge| &edge.from == key))
    }

    fn edges_to(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
        Ok(self.edges_matching(|edge| &edge.to == key))
    }

    fn count_edges(&self) -> StorageResult<usize> {
        Ok(self.edges.len())
    }

    fn detach_delete(&self, key: &NodeKey) -> StorageResult<bool> {
        let removed = self.nodes.remove(&key.id()).is_some();
        self.edges
            .retain(|_, edge| &edge.from != key && &edge.to != key);
        Ok(removed)
    }

    fn remove_label_everywhere(&self, label: &str) -> StorageResult<usize> {
        let mut removed = 0;
        for mut node in self.nodes.iter_mut() {
            if node.key.label != label && node.labels.remove(label) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn delete_relationships(&self, rel_type: &str) -> StorageResult<usize> {
        let before = self.edges.len();
        self.edges.retain(|_, edge| edge.rel_type != rel_type);
        Ok(before - self.edges.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::KeyValue;
    use std::sync::Arc;

    fn gene(symbol: &str) -> NodeKey {
        NodeKey::new("CosmicGene", "gene_symbol", KeyValue::Str(symbol.into()))
    }

    #[test]
    fn merge_node_is_idempotent() {
        let store = MemoryStore::new();
        let cmd = MergeNode::new(gene("TP53"));
        assert!(store.merge_node(&cmd).unwrap().is_created());
        assert!(!store.merge_node(&cmd).unwrap().is_created());
        assert_eq!(store.count_nodes().unwrap(), 1);
    }

    #[test]
    fn concurrent_merges_produce_one_node() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.merge_node(&MergeNode::new(gene("EGFR"))).unwrap()
                })
            })
            .collect();
        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(MergeOutcome::is_created)
            .count();
        assert_eq!(created, 1);
        assert_eq!(store.count_nodes().unwrap(), 1);
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let store = MemoryStore::new();
        store.merge_node(&MergeNode::new(gene("A"))).unwrap();
        let rel = MergeRelationship::new(gene("A"), "HAS_TRANSLOCATION_PARTNER", gene("B"));
        assert!(matches!(
            store.merge_relationship(&rel),
            Err(StorageError::MissingEndpoint(_))
        ));
    }

    #[test]
    fn delete_relationships_counts_removed() {
        let store = MemoryStore::new();
        for symbol in ["A", "B", "C"] {
            store.merge_node(&MergeNode::new(gene(symbol))).unwrap();
        }
        store
            .merge_relationship(&MergeRelationship::new(gene("A"), "CITED_BY", gene("B")))
            .unwrap();
        store
            .merge_relationship(&MergeRelationship::new(gene("A"), "CITED_BY", gene("C")))
            .unwrap();
        store
            .merge_relationship(&MergeRelationship::new(gene("A"), "HAS_REFERENCE", gene("C")))
            .unwrap();
        assert_eq!(store.delete_relationships("CITED_BY").unwrap(), 2);
        assert_eq!(store.count_edges().unwrap(), 1);
    }
}
