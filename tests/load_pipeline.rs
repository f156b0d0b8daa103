//! Streaming load of record files
//!
//! Malformed rows are skipped and counted, store failures never stop the
//! run, and only an unreadable input file is fatal.
//!
//! Run with: `cargo test --test load_pipeline`

mod common;

use common::Fixtures;
use cosmicgraph::model::{CosmicGeneCensus, CosmicTumor};
use cosmicgraph::pipeline::{LoadError, RateLimit};
use cosmicgraph::{
    load_records, CancellationToken, DelimitedFile, EntityKey, GraphStore, JournaledStore,
    LoadOptions, MemoryStore,
};
use cosmicgraph::GraphMerger;
use std::sync::Arc;

fn tumor_rows(count: i64, missing_id_at: Option<i64>) -> Vec<Vec<String>> {
    (1..=count)
        .map(|i| {
            let id = if Some(i) == missing_id_at { String::new() } else { i.to_string() };
            vec![id, (i + 100).to_string(), "breast".into(), "45".into()]
        })
        .collect()
}

const TUMOR_HEADER: [&str; 4] = ["ID_tumour", "ID_sample", "Primary site", "Age"];

#[tokio::test]
async fn missing_key_skips_only_that_row() {
    let fixtures = Fixtures::new();
    let path = fixtures.write_tsv("tumours.tsv", &TUMOR_HEADER, &tumor_rows(10, Some(4)));
    let merger = fixtures.sqlite_merger();

    let report = load_records::<CosmicTumor, _>(
        &DelimitedFile::new(path),
        &merger,
        &LoadOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.records_read, 10);
    assert_eq!(report.loaded, 9);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert!(!report.cancelled);

    let store = merger.store();
    assert_eq!(store.count_label("CosmicTumor").unwrap(), 9);
    assert!(!store.node_exists(&EntityKey::Tumor(4).node_key()).unwrap());
    assert!(store.node_exists(&EntityKey::Tumor(5).node_key()).unwrap());
}

#[test]
fn missing_file_is_fatal() {
    let fixtures = Fixtures::new();
    let merger = fixtures.sqlite_merger();
    let result = tokio_test::block_on(load_records::<CosmicTumor, _>(
        &DelimitedFile::new(fixtures.path("absent.tsv")),
        &merger,
        &LoadOptions::default(),
        &CancellationToken::new(),
    ));
    assert!(matches!(result, Err(LoadError::Source(_))));
    assert_eq!(merger.store().count_nodes().unwrap(), 0);
}

#[test]
fn rate_limited_load_completes() {
    let fixtures = Fixtures::new();
    let path = fixtures.write_tsv("tumours.tsv", &TUMOR_HEADER, &tumor_rows(5, None));
    let merger = GraphMerger::new(Arc::new(MemoryStore::new()));
    let options = LoadOptions {
        channel_capacity: 1,
        rate: RateLimit::per_second(1000),
        ..LoadOptions::default()
    };

    let report = tokio_test::block_on(load_records::<CosmicTumor, _>(
        &DelimitedFile::new(path),
        &merger,
        &options,
        &CancellationToken::new(),
    ));
    let report = tokio_test::assert_ok!(report);
    assert_eq!(report.loaded, 5);
}

#[tokio::test]
async fn journal_records_every_write() {
    let fixtures = Fixtures::new();
    let path = fixtures.path("census.csv");
    std::fs::write(
        &path,
        "Gene Symbol,Name,Tier,Role in Cancer,Synonyms\n\
         TP53,tumor protein p53,1,\"oncogene, TSG\",\"P53,LFS1\"\n",
    )
    .unwrap();

    let journal_path = fixtures.path("journal/writes.cypher");
    let store = JournaledStore::open(MemoryStore::new(), &journal_path).unwrap();
    let merger = GraphMerger::new(Arc::new(store));

    let report = load_records::<CosmicGeneCensus, _>(
        &DelimitedFile::new(path),
        &merger,
        &LoadOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(report.loaded, 1);

    let gene = merger
        .store()
        .load_node(&EntityKey::gene("TP53").node_key())
        .unwrap()
        .unwrap();
    assert!(gene.has_label("CosmicCensus"));
    // 2 roles and 2 synonyms, one edge each
    assert_eq!(merger.store().edges_from(&gene.key).unwrap().len(), 4);

    let journal = std::fs::read_to_string(&journal_path).unwrap();
    assert!(journal.contains("apoc.merge.node([\"CosmicGene\""));
    assert!(journal.contains("apoc.merge.relationship"));
}
