//! Core graph data structures

mod command;
pub mod cypher;
mod edge;
mod node;


pub use command::{GraphCommand, MergeNode, MergeOutcome, MergeRelationship};
pub use edge::{has_relationship, Edge};
pub(crate) use edge::edge_identity;
pub use node::{KeyValue, Node, NodeKey, Properties, PropertyValue, CREATED_AT, LAST_MODIFIED_AT};
