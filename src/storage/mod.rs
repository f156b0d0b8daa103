//! Storage backends
//!
//! Every backend implements the `GraphStore` trait. `SqliteStore` is the
//! persistent store, `MemoryStore` backs tests and dry runs, and
//! `JournaledStore` wraps either one to keep a Cypher log of all writes.

mod apply;
mod journal;
mod memory;
mod sqlite;
mod traits;

pub use journal::JournaledStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{GraphStore, NodeFilter, OpenStore, StorageError, StorageResult};
