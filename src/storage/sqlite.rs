//! SQLite storage backend

use super::apply::{apply_match, created_edge, created_node};
use super::traits::{GraphStore, NodeFilter, OpenStore, StorageError, StorageResult};
use crate::graph::{
    edge_identity, Edge, GraphCommand, KeyValue, MergeNode, MergeOutcome, MergeRelationship, Node,
    NodeKey,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed graph store
///
/// Nodes, their labels and edges live in three tables. Every merge runs in
/// its own transaction under the connection mutex, so writes from concurrent
/// pipelines are serialized through one handle.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Nodes are addressed by "<label>:<key property>:<key value>"
            CREATE TABLE IF NOT EXISTS nodes (
                id TEXT PRIMARY KEY,
                label TEXT NOT NULL,
                key_property TEXT NOT NULL,
                key_value_json TEXT NOT NULL,
                properties_json TEXT NOT NULL
            );

            -- Label set per node, primary label included
            CREATE TABLE IF NOT EXISTS node_labels (
                node_id TEXT NOT NULL,
                label TEXT NOT NULL,
                PRIMARY KEY (node_id, label),
                FOREIGN KEY (node_id) REFERENCES nodes(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_node_labels_label
                ON node_labels(label);

            -- Edges are addressed by their merge identity
            CREATE TABLE IF NOT EXISTS edges (
                id TEXT PRIMARY KEY,
                from_id TEXT NOT NULL,
                rel_type TEXT NOT NULL,
                to_id TEXT NOT NULL,
                from_key_json TEXT NOT NULL,
                to_key_json TEXT NOT NULL,
                ident_json TEXT NOT NULL,
                properties_json TEXT NOT NULL,
                FOREIGN KEY (from_id) REFERENCES nodes(id) ON DELETE CASCADE,
                FOREIGN KEY (to_id) REFERENCES nodes(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_edges_from
                ON edges(from_id);
            CREATE INDEX IF NOT EXISTS idx_edges_to
                ON edges(to_id);
            CREATE INDEX IF NOT EXISTS idx_edges_rel_type
                ON edges(rel_type);

            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn load_node_with(conn: &Connection, id: &str) -> StorageResult<Option<Node>> {
        let row: Option<(String, String, String, String)> = conn
            .query_row(
                "SELECT label, key_property, key_value_json, properties_json FROM nodes WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((label, key_property, key_value_json, properties_json)) = row else {
            return Ok(None);
        };

        let value: KeyValue = serde_json::from_str(&key_value_json)?;
        let mut node = Node::new(NodeKey::new(label, key_property, value));
        node.properties = serde_json::from_str(&properties_json)?;

        let mut stmt = conn.prepare("SELECT label FROM node_labels WHERE node_id = ?1")?;
        let labels = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
        for label in labels {
            node.labels.insert(label?);
        }
        Ok(Some(node))
    }

    fn write_labels(conn: &Connection, id: &str, node: &Node) -> StorageResult<()> {
        let mut stmt =
            conn.prepare("INSERT OR IGNORE INTO node_labels (node_id, label) VALUES (?1, ?2)")?;
        for label in &node.labels {
            stmt.execute(params![id, label])?;
        }
        Ok(())
    }

    fn merge_node_with(conn: &Connection, cmd: &MergeNode) -> StorageResult<MergeOutcome> {
        let id = cmd.key.id();
        match Self::load_node_with(conn, &id)? {
            None => {
                let node = created_node(cmd);
                conn.execute(
                    r#"
                    INSERT INTO nodes (id, label, key_property, key_value_json, properties_json)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        id,
                        node.key.label,
                        node.key.property,
                        serde_json::to_string(&node.key.value)?,
                        serde_json::to_string(&node.properties)?,
                    ],
                )?;
                Self::write_labels(conn, &id, &node)?;
                Ok(MergeOutcome::Created)
            }
            Some(mut node) => {
                apply_match(&mut node, cmd);
                conn.execute(
                    "UPDATE nodes SET properties_json = ?2 WHERE id = ?1",
                    params![id, serde_json::to_string(&node.properties)?],
                )?;
                Self::write_labels(conn, &id, &node)?;
                Ok(MergeOutcome::Matched)
            }
        }
    }

    fn node_row_exists(conn: &Connection, id: &str) -> StorageResult<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM nodes WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    fn merge_relationship_with(
        conn: &Connection,
        cmd: &MergeRelationship,
    ) -> StorageResult<MergeOutcome> {
        for endpoint in [&cmd.from, &cmd.to] {
            if !Self::node_row_exists(conn, &endpoint.id())? {
                return Err(StorageError::MissingEndpoint(endpoint.to_string()));
            }
        }

        let id = edge_identity(&cmd.from, &cmd.rel_type, &cmd.to, &cmd.ident);
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM edges WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        if found.is_some() {
            return Ok(MergeOutcome::Matched);
        }

        let edge = created_edge(cmd);
        conn.execute(
            r#"
            INSERT INTO edges (id, from_id, rel_type, to_id, from_key_json, to_key_json,
                               ident_json, properties_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                id,
                edge.from.id(),
                edge.rel_type,
                edge.to.id(),
                serde_json::to_string(&edge.from)?,
                serde_json::to_string(&edge.to)?,
                serde_json::to_string(&edge.ident)?,
                serde_json::to_string(&edge.properties)?,
            ],
        )?;
        Ok(MergeOutcome::Created)
    }

    fn add_label_with(conn: &Connection, key: &NodeKey, label: &str) -> StorageResult<MergeOutcome> {
        let id = key.id();
        if !Self::node_row_exists(conn, &id)? {
            return Err(StorageError::NodeNotFound(key.to_string()));
        }
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO node_labels (node_id, label) VALUES (?1, ?2)",
            params![id, label],
        )?;
        Ok(if inserted > 0 {
            MergeOutcome::Created
        } else {
            MergeOutcome::Matched
        })
    }

    fn apply_with(conn: &Connection, cmd: &GraphCommand) -> StorageResult<MergeOutcome> {
        match cmd {
            GraphCommand::MergeNode(m) => Self::merge_node_with(conn, m),
            GraphCommand::MergeRelationship(r) => Self::merge_relationship_with(conn, r),
            GraphCommand::AddLabel { key, label } => Self::add_label_with(conn, key, label),
        }
    }

    fn edges_where(conn: &Connection, column: &str, id: &str) -> StorageResult<Vec<Edge>> {
        let sql = format!(
            "SELECT rel_type, from_key_json, to_key_json, ident_json, properties_json \
             FROM edges WHERE {} = ?1 ORDER BY id",
            column
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut edges = Vec::new();
        for row in rows {
            let (rel_type, from_json, to_json, ident_json, properties_json) = row?;
            edges.push(Edge {
                from: serde_json::from_str(&from_json)?,
                rel_type,
                to: serde_json::from_str(&to_json)?,
                ident: serde_json::from_str(&ident_json)?,
                properties: serde_json::from_str(&properties_json)?,
            });
        }
        Ok(edges)
    }

    fn count(conn: &Connection, table: &str) -> StorageResult<usize> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(n as usize)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl GraphStore for SqliteStore {
    // === Merge Operations ===

    fn merge_node(&self, cmd: &MergeNode) -> StorageResult<MergeOutcome> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let outcome = Self::merge_node_with(&tx, cmd)?;
        tx.commit()?;
        Ok(outcome)
    }

    fn merge_relationship(&self, cmd: &MergeRelationship) -> StorageResult<MergeOutcome> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let outcome = Self::merge_relationship_with(&tx, cmd)?;
        tx.commit()?;
        Ok(outcome)
    }

    fn add_label(&self, key: &NodeKey, label: &str) -> StorageResult<MergeOutcome> {
        let conn = self.conn.lock().unwrap();
        Self::add_label_with(&conn, key, label)
    }

    fn apply(&self, commands: &[GraphCommand]) -> StorageResult<Vec<MergeOutcome>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut outcomes = Vec::with_capacity(commands.len());
        for cmd in commands {
            outcomes.push(Self::apply_with(&tx, cmd)?);
        }
        tx.commit()?;
        Ok(outcomes)
    }

    // === Node Queries ===

    fn load_node(&self, key: &NodeKey) -> StorageResult<Option<Node>> {
        let conn = self.conn.lock().unwrap();
        Self::load_node_with(&conn, &key.id())
    }

    fn node_exists(&self, key: &NodeKey) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        Self::node_row_exists(&conn, &key.id())
    }

    fn find_nodes(&self, filter: &NodeFilter) -> StorageResult<Vec<Node>> {
        let conn = self.conn.lock().unwrap();

        let ids: Vec<String> = match &filter.label {
            Some(label) => {
                let mut stmt = conn
                    .prepare("SELECT node_id FROM node_labels WHERE label = ?1 ORDER BY node_id")?;
                let rows = stmt.query_map(params![label], |row| row.get(0))?;
                let ids = rows.collect::<Result<Vec<String>, _>>()?;
                ids
            }
            None => {
                let mut stmt = conn.prepare("SELECT id FROM nodes ORDER BY id")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let ids = rows.collect::<Result<Vec<String>, _>>()?;
                ids
            }
        };

        let mut nodes = Vec::new();
        for id in ids {
            if let Some(node) = Self::load_node_with(&conn, &id)? {
                if filter.matches(&node) {
                    nodes.push(node);
                }
            }
            if filter.limit.is_some_and(|limit| nodes.len() >= limit) {
                break;
            }
        }
        Ok(nodes)
    }

    fn count_nodes(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        Self::count(&conn, "nodes")
    }

    fn count_label(&self, label: &str) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM node_labels WHERE label = ?1",
            params![label],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    // === Edge Queries ===

    fn edges_from(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
        let conn = self.conn.lock().unwrap();
        Self::edges_where(&conn, "from_id", &key.id())
    }

    fn edges_to(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
        let conn = self.conn.lock().unwrap();
        Self::edges_where(&conn, "to_id", &key.id())
    }

    fn count_edges(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        Self::count(&conn, "edges")
    }

    // === Reset Operations ===

    fn detach_delete(&self, key: &NodeKey) -> StorageResult<bool> {
        let mut conn = self.conn.lock().unwrap();
        let id = key.id();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM edges WHERE from_id = ?1 OR to_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM node_labels WHERE node_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM nodes WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    fn remove_label_everywhere(&self, label: &str) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            r#"
            DELETE FROM node_labels
            WHERE label = ?1
              AND node_id IN (SELECT id FROM nodes WHERE label != ?1)
            "#,
            params![label],
        )?;
        Ok(removed)
    }

    fn delete_relationships(&self, rel_type: &str) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM edges WHERE rel_type = ?1", params![rel_type])?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PropertyValue, CREATED_AT};

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn tumor(id: i64) -> NodeKey {
        NodeKey::new("CosmicTumor", "tumor_id", KeyValue::Int(id))
    }

    fn sample(id: i64) -> NodeKey {
        NodeKey::new("CosmicSample", "sample_id", KeyValue::Int(id))
    }

    #[test]
    fn test_merge_node_create_then_match() {
        let store = create_test_store();
        let cmd = MergeNode::new(tumor(42)).on_create(CREATED_AT, "t0");

        assert_eq!(store.merge_node(&cmd).unwrap(), MergeOutcome::Created);
        assert_eq!(store.merge_node(&cmd).unwrap(), MergeOutcome::Matched);
        assert_eq!(store.count_nodes().unwrap(), 1);

        let node = store.load_node(&tumor(42)).unwrap().unwrap();
        assert_eq!(node.get("tumor_id"), Some(&PropertyValue::Int(42)));
        assert!(node.is_skeleton());
    }

    #[test]
    fn test_merge_node_on_match_overwrites() {
        let store = create_test_store();
        store
            .merge_node(&MergeNode::new(tumor(1)).on_create("age", "50"))
            .unwrap();
        store
            .merge_node(&MergeNode::new(tumor(1)).on_match("age", "51"))
            .unwrap();

        let node = store.load_node(&tumor(1)).unwrap().unwrap();
        assert_eq!(node.get_str("age"), Some("51"));
    }

    #[test]
    fn test_labels_accumulate() {
        let store = create_test_store();
        store.merge_node(&MergeNode::new(tumor(1))).unwrap();
        assert_eq!(store.add_label(&tumor(1), "Origin").unwrap(), MergeOutcome::Created);
        assert_eq!(store.add_label(&tumor(1), "Origin").unwrap(), MergeOutcome::Matched);
        store
            .merge_node(&MergeNode::new(tumor(1)).with_label("Reference"))
            .unwrap();

        let node = store.load_node(&tumor(1)).unwrap().unwrap();
        assert!(node.has_label("CosmicTumor"));
        assert!(node.has_label("Origin"));
        assert!(node.has_label("Reference"));
    }

    #[test]
    fn test_add_label_to_missing_node_fails() {
        let store = create_test_store();
        let result = store.add_label(&tumor(9), "Origin");
        assert!(matches!(result, Err(StorageError::NodeNotFound(_))));
    }

    #[test]
    fn test_relationship_requires_endpoints() {
        let store = create_test_store();
        store.merge_node(&MergeNode::new(tumor(1))).unwrap();
        let rel = MergeRelationship::new(tumor(1), "HAS_SAMPLE", sample(2));
        let result = store.merge_relationship(&rel);
        assert!(matches!(result, Err(StorageError::MissingEndpoint(_))));
        assert_eq!(store.count_edges().unwrap(), 0);
    }

    #[test]
    fn test_relationship_merged_once() {
        let store = create_test_store();
        store.merge_node(&MergeNode::new(tumor(1))).unwrap();
        store.merge_node(&MergeNode::new(sample(2))).unwrap();
        let rel = MergeRelationship::new(tumor(1), "HAS_SAMPLE", sample(2)).on_create(CREATED_AT, "t0");

        for _ in 0..3 {
            store.merge_relationship(&rel).unwrap();
        }
        assert_eq!(store.count_edges().unwrap(), 1);

        let edges = store.edges_from(&tumor(1)).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, sample(2));
        assert_eq!(store.edges_to(&sample(2)).unwrap().len(), 1);
    }

    #[test]
    fn test_apply_rolls_back_on_failure() {
        let store = create_test_store();
        let commands: Vec<GraphCommand> = vec![
            MergeNode::new(tumor(1)).into(),
            MergeRelationship::new(tumor(1), "HAS_SAMPLE", sample(2)).into(),
        ];
        assert!(store.apply(&commands).is_err());
        assert_eq!(store.count_nodes().unwrap(), 0);
    }

    #[test]
    fn test_detach_delete_removes_edges() {
        let store = create_test_store();
        store.merge_node(&MergeNode::new(tumor(1))).unwrap();
        store.merge_node(&MergeNode::new(sample(2))).unwrap();
        store
            .merge_relationship(&MergeRelationship::new(tumor(1), "HAS_SAMPLE", sample(2)))
            .unwrap();

        assert!(store.detach_delete(&tumor(1)).unwrap());
        assert!(!store.node_exists(&tumor(1)).unwrap());
        assert_eq!(store.count_edges().unwrap(), 0);
        assert!(store.node_exists(&sample(2)).unwrap());
    }

    #[test]
    fn test_remove_label_keeps_primary_label() {
        let store = create_test_store();
        store
            .merge_node(&MergeNode::new(tumor(1)).with_label("Origin"))
            .unwrap();
        assert_eq!(store.remove_label_everywhere("Origin").unwrap(), 1);
        assert_eq!(store.remove_label_everywhere("CosmicTumor").unwrap(), 0);

        let node = store.load_node(&tumor(1)).unwrap().unwrap();
        assert!(!node.has_label("Origin"));
        assert!(node.has_label("CosmicTumor"));
    }

    #[test]
    fn test_find_nodes_by_label() {
        let store = create_test_store();
        store.merge_node(&MergeNode::new(tumor(1))).unwrap();
        store
            .merge_node(&MergeNode::new(tumor(2)).on_create("age", "40"))
            .unwrap();
        store.merge_node(&MergeNode::new(sample(3))).unwrap();

        let tumors = store
            .find_nodes(&NodeFilter::new().with_label("CosmicTumor"))
            .unwrap();
        assert_eq!(tumors.len(), 2);

        let skeletons = store
            .find_nodes(&NodeFilter::new().with_label("CosmicTumor").with_skeleton(true))
            .unwrap();
        assert_eq!(skeletons.len(), 1);
        assert_eq!(skeletons[0].key, tumor(1));
        assert_eq!(store.count_label("CosmicTumor").unwrap(), 2);
        assert_eq!(store.count_label("Origin").unwrap(), 0);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("graph.db");
        let store = SqliteStore::open(&path).unwrap();
        store.merge_node(&MergeNode::new(tumor(1))).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.node_exists(&tumor(1)).unwrap());
    }
}
