//! Common test utilities for cosmicgraph integration tests
//!
//! Fixture files in a temporary directory, stores to merge into, and a
//! timestamp-free snapshot of a graph for comparing two load orders.

#![allow(dead_code)]

use cosmicgraph::graph::{Properties, CREATED_AT, LAST_MODIFIED_AT};
use cosmicgraph::pubmed::DeadLetterLog;
use cosmicgraph::{GraphMerger, GraphStore, MemoryStore, OpenStore, SqliteStore};
use cosmicgraph::storage::NodeFilter;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Temporary directory holding record files, a database and logs
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a tab-separated file with a header row.
    pub fn write_tsv(&self, name: &str, header: &[&str], rows: &[Vec<String>]) -> PathBuf {
        let path = self.path(name);
        let mut file = std::fs::File::create(&path).expect("create fixture");
        writeln!(file, "{}", header.join("\t")).unwrap();
        for row in rows {
            writeln!(file, "{}", row.join("\t")).unwrap();
        }
        path
    }

    /// `tumours.tsv` with one row per tumor id; sample id is tumor id + 1000.
    pub fn tumor_file(&self, tumor_ids: &[i64]) -> PathBuf {
        let rows: Vec<Vec<String>> = tumor_ids
            .iter()
            .map(|id| {
                vec![
                    id.to_string(),
                    (id + 1000).to_string(),
                    "lung".into(),
                    "upper lobe".into(),
                    "carcinoma".into(),
                    "primary".into(),
                    "60".into(),
                ]
            })
            .collect();
        self.write_tsv(
            "tumours.tsv",
            &[
                "ID_tumour",
                "ID_sample",
                "Primary site",
                "Site subtype 1",
                "Primary histology",
                "Tumour origin",
                "Age",
            ],
            &rows,
        )
    }

    /// `samples.tsv` matching [`tumor_file`](Self::tumor_file).
    pub fn sample_file(&self, tumor_ids: &[i64]) -> PathBuf {
        let rows: Vec<Vec<String>> = tumor_ids
            .iter()
            .map(|id| {
                vec![
                    (id + 1000).to_string(),
                    id.to_string(),
                    format!("S-{}", id),
                    "lung".into(),
                    "carcinoma".into(),
                    "y".into(),
                    format!("{}", 9000 + id),
                ]
            })
            .collect();
        self.write_tsv(
            "samples.tsv",
            &[
                "sample_id",
                "id_tumour",
                "sample_name",
                "primary_site",
                "primary_histology",
                "whole_genome_screen",
                "cosmic_phenotype_id",
            ],
            &rows,
        )
    }

    pub fn sqlite_merger(&self) -> GraphMerger {
        let store = SqliteStore::open(self.path("graph.db")).expect("open sqlite store");
        GraphMerger::new(Arc::new(store))
    }

    pub fn dead_letters(&self) -> DeadLetterLog {
        DeadLetterLog::open(self.path("dead_letters.tsv")).expect("open dead-letter log")
    }
}

pub fn memory_merger() -> GraphMerger {
    GraphMerger::new(Arc::new(MemoryStore::new()))
}

/// Graph contents with timestamps stripped
#[derive(Debug, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<String, (BTreeSet<String>, Properties)>,
    pub edges: BTreeSet<String>,
}

impl GraphSnapshot {
    pub fn capture(store: &dyn GraphStore) -> Self {
        let mut nodes = BTreeMap::new();
        let mut edges = BTreeSet::new();
        for node in store.find_nodes(&NodeFilter::new()).unwrap() {
            for edge in store.edges_from(&node.key).unwrap() {
                edges.insert(edge.identity());
            }
            let properties: Properties = node
                .properties
                .into_iter()
                .filter(|(name, _)| name != CREATED_AT && name != LAST_MODIFIED_AT)
                .collect();
            nodes.insert(node.key.id(), (node.labels, properties));
        }
        Self { nodes, edges }
    }
}
