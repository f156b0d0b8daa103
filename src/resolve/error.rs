use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised while merging entities into the graph
#[derive(Debug, Error)]
pub enum MergeError {
    /// The store rejected a write. `command` is the Cypher rendering of the
    /// failing command.
    #[error("store write failed: {source}\n  command: {command}")]
    StoreWrite {
        command: String,
        source: StorageError,
    },

    #[error("store read failed: {0}")]
    StoreRead(#[from] StorageError),
}

pub type MergeResult<T> = Result<T, MergeError>;
