//! Shared write path for the merge components
//!
//! Every command issued by the resolver, promoter and expander passes
//! through [`Writer`], which keeps the merge counters and turns store
//! failures into [`MergeError::StoreWrite`] carrying the command text.

use super::error::{MergeError, MergeResult};
use super::stats::MergeStats;
use crate::graph::{cypher, GraphCommand, MergeNode, MergeOutcome, MergeRelationship, NodeKey};
use crate::storage::{GraphStore, StorageError};
use std::sync::Arc;
use tracing::{debug, error};

/// Current time in the format stored in `created_at` / `last_modified_at`
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Clone)]
pub(crate) struct Writer {
    store: Arc<dyn GraphStore>,
    stats: Arc<MergeStats>,
}

impl Writer {
    pub(crate) fn new(store: Arc<dyn GraphStore>, stats: Arc<MergeStats>) -> Self {
        Self { store, stats }
    }

    pub(crate) fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    fn failed(&self, command: String, source: StorageError) -> MergeError {
        self.stats.record_failure();
        error!(error = %source, command = %command, "graph write failed");
        MergeError::StoreWrite { command, source }
    }

    pub(crate) fn merge_node(&self, cmd: MergeNode) -> MergeResult<MergeOutcome> {
        match self.store.merge_node(&cmd) {
            Ok(outcome) => {
                self.stats.record_node(outcome);
                debug!(key = %cmd.key, ?outcome, "merged node");
                Ok(outcome)
            }
            Err(e) => Err(self.failed(cypher::render(&cmd.into()), e)),
        }
    }

    pub(crate) fn merge_relationship(&self, cmd: MergeRelationship) -> MergeResult<MergeOutcome> {
        match self.store.merge_relationship(&cmd) {
            Ok(outcome) => {
                self.stats.record_relationship(outcome);
                debug!(from = %cmd.from, rel = %cmd.rel_type, to = %cmd.to, ?outcome, "merged relationship");
                Ok(outcome)
            }
            Err(e) => Err(self.failed(cypher::render(&cmd.into()), e)),
        }
    }

    pub(crate) fn add_label(&self, key: &NodeKey, label: &str) -> MergeResult<MergeOutcome> {
        match self.store.add_label(key, label) {
            Ok(outcome) => {
                self.stats.record_label(outcome);
                Ok(outcome)
            }
            Err(e) => {
                let command = GraphCommand::AddLabel {
                    key: key.clone(),
                    label: label.to_string(),
                };
                Err(self.failed(cypher::render(&command), e))
            }
        }
    }

    /// Apply a batch as one store transaction.
    pub(crate) fn apply(&self, commands: &[GraphCommand]) -> MergeResult<Vec<MergeOutcome>> {
        match self.store.apply(commands) {
            Ok(outcomes) => {
                for (cmd, outcome) in commands.iter().zip(&outcomes) {
                    match cmd {
                        GraphCommand::MergeNode(_) => self.stats.record_node(*outcome),
                        GraphCommand::MergeRelationship(_) => {
                            self.stats.record_relationship(*outcome)
                        }
                        GraphCommand::AddLabel { .. } => self.stats.record_label(*outcome),
                    }
                }
                Ok(outcomes)
            }
            Err(e) => Err(self.failed(cypher::render_batch(commands), e)),
        }
    }
}
