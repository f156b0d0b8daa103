//! Merge semantics shared by every backend

use crate::graph::{Edge, MergeNode, MergeRelationship, Node};

/// Build the node a `MergeNode` creates when nothing matches its key.
pub(crate) fn created_node(cmd: &MergeNode) -> Node {
    let mut node = Node::new(cmd.key.clone());
    node.labels.extend(cmd.labels.iter().cloned());
    for (name, value) in &cmd.on_create {
        if name != &cmd.key.property {
            node.properties.insert(name.clone(), value.clone());
        }
    }
    node
}

/// Apply the on-match half of a `MergeNode` to an existing node.
///
/// Labels only accumulate and the key property is never rewritten.
pub(crate) fn apply_match(node: &mut Node, cmd: &MergeNode) {
    node.labels.extend(cmd.labels.iter().cloned());
    for (name, value) in &cmd.on_match {
        if name != &cmd.key.property {
            node.properties.insert(name.clone(), value.clone());
        }
    }
}

/// Build the edge a `MergeRelationship` creates when its identity is new.
pub(crate) fn created_edge(cmd: &MergeRelationship) -> Edge {
    let mut properties = cmd.on_create.clone();
    properties.extend(cmd.ident.iter().map(|(k, v)| (k.clone(), v.clone())));
    Edge {
        from: cmd.from.clone(),
        rel_type: cmd.rel_type.clone(),
        to: cmd.to.clone(),
        ident: cmd.ident.clone(),
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{KeyValue, NodeKey, PropertyValue};

    fn gene() -> NodeKey {
        NodeKey::new("CosmicGene", "gene_symbol", KeyValue::Str("KRAS".into()))
    }

    #[test]
    fn created_node_ignores_attempt_to_override_key() {
        let cmd = MergeNode::new(gene()).on_create("gene_symbol", "NRAS");
        let node = created_node(&cmd);
        assert_eq!(node.get_str("gene_symbol"), Some("KRAS"));
    }

    #[test]
    fn match_adds_labels_and_overwrites_properties() {
        let mut node = created_node(&MergeNode::new(gene()).on_create("tier", 2i64));
        let cmd = MergeNode::new(gene())
            .with_label("CosmicCensus")
            .on_match("tier", 1i64);
        apply_match(&mut node, &cmd);
        assert!(node.has_label("CosmicGene"));
        assert!(node.has_label("CosmicCensus"));
        assert_eq!(node.get("tier"), Some(&PropertyValue::Int(1)));
    }
}
