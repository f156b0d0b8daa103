//! Storage trait definitions

use crate::graph::{Edge, GraphCommand, MergeNode, MergeOutcome, MergeRelationship, Node, NodeKey};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Relationship endpoint does not exist: {0}")]
    MissingEndpoint(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filter criteria for querying nodes
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    /// Only nodes carrying this label
    pub label: Option<String>,
    /// Only skeleton (or only non-skeleton) nodes
    pub skeleton: Option<bool>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl NodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_skeleton(mut self, skeleton: bool) -> Self {
        self.skeleton = Some(skeleton);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn matches(&self, node: &Node) -> bool {
        if let Some(label) = &self.label {
            if !node.has_label(label) {
                return false;
            }
        }
        if let Some(skeleton) = self.skeleton {
            if node.is_skeleton() != skeleton {
                return false;
            }
        }
        true
    }
}

/// Trait for graph storage backends
///
/// Every write method is a self-contained, idempotent unit: it either applies
/// completely or not at all. Implementations must be thread-safe
/// (Send + Sync) so one handle can be shared by concurrent pipelines.
pub trait GraphStore: Send + Sync {
    // === Merge Operations ===

    /// Merge a node by key. Never creates a second node for the same key.
    fn merge_node(&self, cmd: &MergeNode) -> StorageResult<MergeOutcome>;

    /// Merge a relationship. Both endpoints must already exist.
    fn merge_relationship(&self, cmd: &MergeRelationship) -> StorageResult<MergeOutcome>;

    /// Add a label to an existing node. Returns `Created` if the label is new.
    fn add_label(&self, key: &NodeKey, label: &str) -> StorageResult<MergeOutcome>;

    /// Apply several commands as one unit.
    ///
    /// The default applies them one at a time; backends with transactions
    /// override this to make the batch atomic.
    fn apply(&self, commands: &[GraphCommand]) -> StorageResult<Vec<MergeOutcome>> {
        commands
            .iter()
            .map(|cmd| match cmd {
                GraphCommand::MergeNode(m) => self.merge_node(m),
                GraphCommand::MergeRelationship(r) => self.merge_relationship(r),
                GraphCommand::AddLabel { key, label } => self.add_label(key, label),
            })
            .collect()
    }

    // === Node Queries ===

    /// Load a node by key
    fn load_node(&self, key: &NodeKey) -> StorageResult<Option<Node>>;

    fn node_exists(&self, key: &NodeKey) -> StorageResult<bool> {
        Ok(self.load_node(key)?.is_some())
    }

    /// True when the node is absent or still a skeleton.
    fn is_incomplete(&self, key: &NodeKey) -> StorageResult<bool> {
        Ok(self.load_node(key)?.map_or(true, |node| node.is_skeleton()))
    }

    fn has_label(&self, key: &NodeKey, label: &str) -> StorageResult<bool> {
        Ok(self.load_node(key)?.map_or(false, |node| node.has_label(label)))
    }

    /// Find nodes matching filter criteria
    fn find_nodes(&self, filter: &NodeFilter) -> StorageResult<Vec<Node>>;

    fn count_nodes(&self) -> StorageResult<usize>;

    /// Number of nodes carrying `label`
    fn count_label(&self, label: &str) -> StorageResult<usize> {
        Ok(self.find_nodes(&NodeFilter::new().with_label(label))?.len())
    }

    // === Edge Queries ===

    /// Get edges originating from a node
    fn edges_from(&self, key: &NodeKey) -> StorageResult<Vec<Edge>>;

    /// Get edges targeting a node
    fn edges_to(&self, key: &NodeKey) -> StorageResult<Vec<Edge>>;

    fn count_edges(&self) -> StorageResult<usize>;

    // === Reset Operations ===

    /// Delete a node together with every relationship touching it.
    fn detach_delete(&self, key: &NodeKey) -> StorageResult<bool>;

    /// Remove a secondary label from every node carrying it.
    /// Primary labels are part of node identity and are left alone.
    fn remove_label_everywhere(&self, label: &str) -> StorageResult<usize>;

    /// Delete every relationship of the given type.
    fn delete_relationships(&self, rel_type: &str) -> StorageResult<usize>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
