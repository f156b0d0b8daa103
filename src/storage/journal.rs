//! Write journal
//!
//! `JournaledStore` wraps another store and appends the Cypher rendering of
//! every successful write to a text file, one statement per entry. The
//! journal can be replayed against a Neo4j instance with APOC installed.
//!
//! Statements are appended after the inner store commits. A failed append
//! is logged and counted but does not fail the write, since the graph
//! already holds it; the journal is then missing that statement.

use super::traits::{GraphStore, NodeFilter, StorageResult};
use crate::graph::{cypher, Edge, GraphCommand, MergeNode, MergeOutcome, MergeRelationship, Node, NodeKey};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct JournaledStore<S> {
    inner: S,
    journal: Mutex<Box<dyn Write + Send>>,
    failed_appends: AtomicUsize,
}

impl<S: GraphStore> JournaledStore<S> {
    /// Wrap `inner`, appending to the journal at `path` (created if missing).
    pub fn open(inner: S, path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(inner, BufWriter::new(file)))
    }

    /// Wrap `inner`, journaling to an arbitrary writer.
    pub fn from_writer(inner: S, writer: impl Write + Send + 'static) -> Self {
        Self {
            inner,
            journal: Mutex::new(Box::new(writer)),
            failed_appends: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Statements that were committed but could not be journaled
    pub fn failed_appends(&self) -> usize {
        self.failed_appends.load(Ordering::Relaxed)
    }

    fn record(&self, statement: &str) {
        let mut journal = self.journal.lock().unwrap();
        let written = writeln!(journal, "{}", statement).and_then(|_| journal.flush());
        if let Err(e) = written {
            self.failed_appends.fetch_add(1, Ordering::Relaxed);
            tracing::error!(error = %e, statement, "journal append failed after commit");
        }
    }
}

impl<S: GraphStore> GraphStore for JournaledStore<S> {
    fn merge_node(&self, cmd: &MergeNode) -> StorageResult<MergeOutcome> {
        let outcome = self.inner.merge_node(cmd)?;
        self.record(&cypher::render(&GraphCommand::MergeNode(cmd.clone())));
        Ok(outcome)
    }

    fn merge_relationship(&self, cmd: &MergeRelationship) -> StorageResult<MergeOutcome> {
        let outcome = self.inner.merge_relationship(cmd)?;
        self.record(&cypher::render(&GraphCommand::MergeRelationship(cmd.clone())));
        Ok(outcome)
    }

    fn add_label(&self, key: &NodeKey, label: &str) -> StorageResult<MergeOutcome> {
        let outcome = self.inner.add_label(key, label)?;
        self.record(&cypher::render(&GraphCommand::AddLabel {
            key: key.clone(),
            label: label.to_string(),
        }));
        Ok(outcome)
    }

    fn apply(&self, commands: &[GraphCommand]) -> StorageResult<Vec<MergeOutcome>> {
        let outcomes = self.inner.apply(commands)?;
        self.record(&cypher::render_batch(commands));
        Ok(outcomes)
    }

    fn load_node(&self, key: &NodeKey) -> StorageResult<Option<Node>> {
        self.inner.load_node(key)
    }

    fn node_exists(&self, key: &NodeKey) -> StorageResult<bool> {
        self.inner.node_exists(key)
    }

    fn is_incomplete(&self, key: &NodeKey) -> StorageResult<bool> {
        self.inner.is_incomplete(key)
    }

    fn has_label(&self, key: &NodeKey, label: &str) -> StorageResult<bool> {
        self.inner.has_label(key, label)
    }

    fn find_nodes(&self, filter: &NodeFilter) -> StorageResult<Vec<Node>> {
        self.inner.find_nodes(filter)
    }

    fn count_nodes(&self) -> StorageResult<usize> {
        self.inner.count_nodes()
    }

    fn count_label(&self, label: &str) -> StorageResult<usize> {
        self.inner.count_label(label)
    }

    fn edges_from(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
        self.inner.edges_from(key)
    }

    fn edges_to(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
        self.inner.edges_to(key)
    }

    fn count_edges(&self) -> StorageResult<usize> {
        self.inner.count_edges()
    }

    fn detach_delete(&self, key: &NodeKey) -> StorageResult<bool> {
        let deleted = self.inner.detach_delete(key)?;
        self.record(&cypher::render_detach_delete(key));
        Ok(deleted)
    }

    fn remove_label_everywhere(&self, label: &str) -> StorageResult<usize> {
        let removed = self.inner.remove_label_everywhere(label)?;
        self.record(&cypher::render_remove_label(label));
        Ok(removed)
    }

    fn delete_relationships(&self, rel_type: &str) -> StorageResult<usize> {
        let deleted = self.inner.delete_relationships(rel_type)?;
        self.record(&cypher::render_delete_relationships(rel_type));
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::KeyValue;
    use crate::storage::MemoryStore;

    #[test]
    fn journal_records_successful_writes_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cypher.log");
        let store = JournaledStore::open(MemoryStore::new(), &path).unwrap();

        let tumor = NodeKey::new("CosmicTumor", "tumor_id", KeyValue::Int(5));
        let sample = NodeKey::new("CosmicSample", "sample_id", KeyValue::Int(6));
        store.merge_node(&MergeNode::new(tumor.clone())).unwrap();
        assert!(store
            .merge_relationship(&MergeRelationship::new(tumor, "HAS_SAMPLE", sample))
            .is_err());

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("apoc.merge.node").count(), 1);
        assert!(!text.contains("apoc.merge.relationship"));
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_append_keeps_committed_write() {
        let store = JournaledStore::from_writer(MemoryStore::new(), BrokenWriter);
        let tumor = NodeKey::new("CosmicTumor", "tumor_id", KeyValue::Int(5));

        let outcome = store.merge_node(&MergeNode::new(tumor.clone())).unwrap();
        assert_eq!(outcome, MergeOutcome::Created);
        assert!(store.node_exists(&tumor).unwrap());
        assert_eq!(store.failed_appends(), 1);
    }
}
