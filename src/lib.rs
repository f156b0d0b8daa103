//! cosmicgraph: COSMIC and PubMed loader for a property graph
//!
//! Loads cancer-genomics record files and bibliographic references into a
//! labelled property graph. Every write merges by key, so files can be
//! loaded in any order, reloaded, or interrupted and resumed without
//! duplicating nodes or relationships.
//!
//! # Core Concepts
//!
//! - **Entity keys**: each entity is identified by `(label, key property, value)`
//! - **Skeletons**: nodes created from a reference before their own record is
//!   loaded, carrying only their key
//! - **Promotion**: loading an entity's record fills in a skeleton, or
//!   updates a node that already has properties
//! - **Reference walk**: PubMed articles linked one hop out to the articles
//!   they reference and the articles citing them
//!
//! # Example
//!
//! ```
//! use cosmicgraph::{EntityKey, GraphMerger, GraphStore, MemoryStore};
//! use std::sync::Arc;
//!
//! let merger = GraphMerger::new(Arc::new(MemoryStore::new()));
//! let gene = merger.resolver().ensure_skeleton(&EntityKey::gene("TP53")).unwrap();
//! assert!(merger.store().is_incomplete(&gene).unwrap());
//! ```

pub mod config;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod pubmed;
pub mod resolve;
pub mod source;
pub mod storage;

pub use config::{ConfigError, LoaderConfig, NcbiCredentials};
pub use graph::{Edge, GraphCommand, MergeNode, MergeOutcome, MergeRelationship, Node, NodeKey, PropertyValue};
pub use pipeline::{load_records, CancellationToken, LoadOptions, LoadReport};
pub use pubmed::{PubMedEntry, ReferenceFetcher, ReferenceGraphWalker, WalkOptions, WalkReport};
pub use resolve::{EntityKey, EntityKind, GraphMerger, MergeError, MergeResult};
pub use source::{DelimitedFile, RecordSource, Row};
pub use storage::{GraphStore, JournaledStore, MemoryStore, OpenStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
