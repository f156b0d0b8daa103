//! Cypher rendering of graph commands
//!
//! Used for the write journal and for error diagnostics. Every string
//! literal is escaped, and every element in a batch gets its own alias
//! (`n0`, `a1`/`b1`/`r1`, ...) so several commands can share one statement.

use super::command::{GraphCommand, MergeNode, MergeRelationship};
use super::node::{KeyValue, NodeKey, Properties, PropertyValue};

/// Escape a string for use inside a double-quoted Cypher literal.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a property value as a Cypher literal.
pub fn literal(value: &PropertyValue) -> String {
    match value {
        PropertyValue::String(s) => format!("\"{}\"", escape(s)),
        PropertyValue::Int(i) => i.to_string(),
        PropertyValue::Float(f) if f.is_finite() => format!("{:?}", f),
        PropertyValue::Float(_) => "null".to_string(),
        PropertyValue::Bool(b) => b.to_string(),
        PropertyValue::Array(values) => {
            let items: Vec<String> = values.iter().map(literal).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn key_literal(value: &KeyValue) -> String {
    literal(&PropertyValue::from(value))
}

fn map_literal(props: &Properties) -> String {
    let entries: Vec<String> = props
        .iter()
        .map(|(name, value)| format!("{}: {}", name, literal(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn label_list(labels: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    let quoted: Vec<String> = labels
        .into_iter()
        .map(|l| format!("\"{}\"", escape(l.as_ref())))
        .collect();
    format!("[{}]", quoted.join(", "))
}

fn match_pattern(alias: &str, key: &NodeKey) -> String {
    format!(
        "({}:{} {{{}: {}}})",
        alias,
        key.label,
        key.property,
        key_literal(&key.value)
    )
}

fn merge_node_clause(cmd: &MergeNode, index: usize) -> String {
    let labels = std::iter::once(cmd.key.label.as_str()).chain(cmd.labels.iter().map(String::as_str));
    format!(
        "CALL apoc.merge.node({}, {{{}: {}}}, {}, {}) YIELD node AS n{}",
        label_list(labels),
        cmd.key.property,
        key_literal(&cmd.key.value),
        map_literal(&cmd.on_create),
        map_literal(&cmd.on_match),
        index
    )
}

fn merge_relationship_clause(cmd: &MergeRelationship, index: usize) -> String {
    format!(
        "MATCH {}, {} CALL apoc.merge.relationship(a{i}, \"{}\", {}, {}, b{i}, {{}}) YIELD rel AS r{i}",
        match_pattern(&format!("a{}", index), &cmd.from),
        match_pattern(&format!("b{}", index), &cmd.to),
        escape(&cmd.rel_type),
        map_literal(&cmd.ident),
        map_literal(&cmd.on_create),
        i = index
    )
}

fn add_label_clause(key: &NodeKey, label: &str, index: usize) -> String {
    format!(
        "MATCH {} CALL apoc.create.addLabels(l{i}, {}) YIELD node AS m{i}",
        match_pattern(&format!("l{}", index), key),
        label_list([label]),
        i = index
    )
}

fn clause(cmd: &GraphCommand, index: usize) -> String {
    match cmd {
        GraphCommand::MergeNode(m) => merge_node_clause(m, index),
        GraphCommand::MergeRelationship(r) => merge_relationship_clause(r, index),
        GraphCommand::AddLabel { key, label } => add_label_clause(key, label, index),
    }
}

/// Render a single command as a complete statement.
pub fn render(cmd: &GraphCommand) -> String {
    render_batch(std::slice::from_ref(cmd))
}

/// Render several commands as one statement with distinct aliases.
pub fn render_batch(commands: &[GraphCommand]) -> String {
    let clauses: Vec<String> = commands
        .iter()
        .enumerate()
        .map(|(index, cmd)| clause(cmd, index))
        .collect();
    format!("{}\nRETURN count(*);", clauses.join("\nWITH *\n"))
}

pub fn render_detach_delete(key: &NodeKey) -> String {
    format!("MATCH {} DETACH DELETE n;", match_pattern("n", key))
}

pub fn render_remove_label(label: &str) -> String {
    format!("MATCH (n:{label}) REMOVE n:{label};", label = label)
}

pub fn render_delete_relationships(rel_type: &str) -> String {
    format!("MATCH ()-[r:{}]->() DELETE r;", rel_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tumor(id: i64) -> NodeKey {
        NodeKey::new("CosmicTumor", "tumor_id", KeyValue::Int(id))
    }

    #[test]
    fn escape_handles_quotes_and_backslashes() {
        assert_eq!(escape(r#"it's "odd" \ here"#), r#"it\'s \"odd\" \\ here"#);
    }

    #[test]
    fn string_literal_never_leaks_a_bare_quote() {
        let rendered = literal(&PropertyValue::from("5' UTR \"variant\""));
        let inner = &rendered[1..rendered.len() - 1];
        let mut previous = ' ';
        for c in inner.chars() {
            if c == '"' || c == '\'' {
                assert_eq!(previous, '\\', "unescaped quote in {}", rendered);
            }
            previous = c;
        }
    }

    #[test]
    fn merge_node_renders_apoc_call() {
        let cmd = MergeNode::new(tumor(42))
            .on_create("age", "61")
            .on_match("age", "61");
        let text = render(&cmd.into());
        assert!(text.starts_with("CALL apoc.merge.node([\"CosmicTumor\"], {tumor_id: 42}"));
        assert!(text.contains("YIELD node AS n0"));
        assert!(text.ends_with("RETURN count(*);"));
    }

    #[test]
    fn batch_aliases_are_distinct_per_element() {
        let sample = NodeKey::new("CosmicSample", "sample_id", KeyValue::Int(7));
        let commands: Vec<GraphCommand> = vec![
            MergeNode::new(tumor(1)).into(),
            MergeNode::new(sample.clone()).into(),
            MergeRelationship::new(tumor(1), "HAS_SAMPLE", sample.clone()).into(),
            MergeRelationship::new(tumor(1), "HAS_SAMPLE", sample)
                .with_ident("ordinal", 2i64)
                .into(),
        ];
        let text = render_batch(&commands);
        assert!(text.contains("AS n0"));
        assert!(text.contains("AS n1"));
        assert!(text.contains("AS r2"));
        assert!(text.contains("AS r3"));
        assert_eq!(text.matches("WITH *").count(), 3);
    }
}
