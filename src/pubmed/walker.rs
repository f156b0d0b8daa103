//! Bounded walk from origin articles to their references and citations
//!
//! Each origin moves through
//! `Requested → Fetched → Persisted → ReferencesExpanded → CitationsExpanded → Done`,
//! or ends in `FetchFailed` once its single retry is spent. Related articles
//! are fetched one hop out, and only when the graph does not already hold a
//! complete node for them. Roles accumulate as labels on one node per id.

use super::dead_letter::DeadLetterLog;
use super::entry::{ArticleRole, PubMedEntry, COSMIC_ARTICLE_LABEL};
use super::fetcher::{FetchResult, ReferenceFetcher};
use crate::config::PubMedSettings;
use crate::graph::{NodeKey, Properties};
use crate::pipeline::CancellationToken;
use crate::resolve::{EntityKey, GraphMerger, MergeError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("dead-letter log: {0}")]
    DeadLetter(#[from] std::io::Error),
}

pub type WalkResult<T> = Result<T, WalkError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WalkState {
    Requested,
    Fetched,
    Persisted,
    ReferencesExpanded,
    CitationsExpanded,
    Done,
    FetchFailed,
}

#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub expand_citations: bool,
    pub retry_delay: Duration,
    pub batch_size: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            expand_citations: false,
            retry_delay: Duration::from_millis(1000),
            batch_size: 100,
        }
    }
}

impl WalkOptions {
    pub fn from_settings(settings: &PubMedSettings) -> Self {
        Self {
            expand_citations: settings.expand_citations,
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
            batch_size: settings.batch_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    pub origins_requested: usize,
    pub origins_completed: usize,
    pub origins_failed: usize,
    /// COSMIC origins already present as complete nodes
    pub origins_skipped: usize,
    pub references_linked: usize,
    pub citations_linked: usize,
    /// Related articles fetched and promoted one hop out
    pub related_fetched: usize,
    pub dead_letters: usize,
    pub store_failures: usize,
    pub cancelled: bool,
    /// Final state of every requested origin
    pub outcomes: BTreeMap<String, WalkState>,
}

impl std::fmt::Display for WalkReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "pubmed walk")?;
        writeln!(f, "  origins requested:  {}", self.origins_requested)?;
        writeln!(f, "  origins completed:  {}", self.origins_completed)?;
        writeln!(f, "  origins skipped:    {}", self.origins_skipped)?;
        writeln!(f, "  origins failed:     {}", self.origins_failed)?;
        writeln!(f, "  references linked:  {}", self.references_linked)?;
        writeln!(f, "  citations linked:   {}", self.citations_linked)?;
        writeln!(f, "  related fetched:    {}", self.related_fetched)?;
        writeln!(f, "  dead letters:       {}", self.dead_letters)?;
        write!(f, "  store failures:     {}", self.store_failures)?;
        if self.cancelled {
            write!(f, "\n  (cancelled)")?;
        }
        Ok(())
    }
}

/// Counts removed by [`ReferenceGraphWalker::clear_walk_state`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub relationships: usize,
    pub labels: usize,
}

pub struct ReferenceGraphWalker {
    merger: GraphMerger,
    fetcher: Arc<dyn ReferenceFetcher>,
    dead_letters: DeadLetterLog,
    options: WalkOptions,
    cancel: CancellationToken,
}

impl ReferenceGraphWalker {
    pub fn new(
        merger: GraphMerger,
        fetcher: Arc<dyn ReferenceFetcher>,
        dead_letters: DeadLetterLog,
        options: WalkOptions,
    ) -> Self {
        Self {
            merger,
            fetcher,
            dead_letters,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop between batches and between origins once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn merger(&self) -> &GraphMerger {
        &self.merger
    }

    pub fn dead_letters(&self) -> &DeadLetterLog {
        &self.dead_letters
    }

    fn dead_letter(&self, id: &str, stage: &str, reason: &str, report: &mut WalkReport) -> WalkResult<()> {
        self.dead_letters.record(id, stage, reason)?;
        report.dead_letters += 1;
        Ok(())
    }

    /// Fetch `ids` in batches. Each failed id is retried once after the
    /// configured delay; a second failure goes to the dead-letter log.
    async fn fetch_many(&self, ids: &[String], stage: &str, report: &mut WalkReport) -> WalkResult<Vec<PubMedEntry>> {
        let mut entries = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(self.options.batch_size.max(1)) {
            let batch = self.fetcher.fetch_batch(chunk).await;
            entries.extend(batch.entries);
            if batch.failures.is_empty() {
                continue;
            }
            tokio::time::sleep(self.options.retry_delay).await;
            for (id, first) in batch.failures {
                warn!(id = %id, error = %first, "fetch failed, retrying once");
                match self.fetcher.fetch(&id).await {
                    Ok(entry) => entries.push(entry),
                    Err(e) => self.dead_letter(&id, stage, &e.to_string(), report)?,
                }
            }
        }
        Ok(entries)
    }

    async fn fetch_citations(&self, pubmed_id: &str) -> FetchResult<BTreeSet<String>> {
        match self.fetcher.fetch_citations(pubmed_id).await {
            Ok(ids) => Ok(ids),
            Err(first) => {
                warn!(id = pubmed_id, error = %first, "citation fetch failed, retrying once");
                tokio::time::sleep(self.options.retry_delay).await;
                self.fetcher.fetch_citations(pubmed_id).await
            }
        }
    }

    fn persist(&self, entry: &PubMedEntry, labels: &[&str]) -> Result<NodeKey, MergeError> {
        let (key, outcome) = self.merger.promoter().promote_with_labels(
            &EntityKey::pubmed(entry.pubmed_id.as_str()),
            labels,
            entry.properties(),
        )?;
        debug!(id = %entry.pubmed_id, ?outcome, "article persisted");
        Ok(key)
    }

    /// Link `origin` to every id in `related` under `role`, fetching the
    /// ones the graph does not hold completely. Returns the number linked.
    async fn expand(
        &self,
        origin: &NodeKey,
        origin_id: &str,
        related: &BTreeSet<String>,
        role: ArticleRole,
        report: &mut WalkReport,
    ) -> WalkResult<usize> {
        let Some(rel_type) = role.relationship() else {
            return Ok(0);
        };
        let store = self.merger.store();
        let mut incomplete = Vec::new();
        for id in related.iter().filter(|id| id.as_str() != origin_id) {
            let key = EntityKey::pubmed(id.as_str()).node_key();
            if store.is_incomplete(&key).map_err(MergeError::from)? {
                incomplete.push(id.clone());
            }
        }

        let stage = role.label().to_lowercase();
        for entry in self.fetch_many(&incomplete, &stage, report).await? {
            self.persist(&entry, &[])?;
            report.related_fetched += 1;
        }

        let resolver = self.merger.resolver();
        let mut linked = 0;
        for id in related.iter().filter(|id| id.as_str() != origin_id) {
            let key = resolver.ensure_skeleton(&EntityKey::pubmed(id.as_str()))?;
            self.merger.add_label(&key, role.label())?;
            resolver.relate(origin, rel_type, &key, Properties::new())?;
            linked += 1;
        }
        Ok(linked)
    }

    fn reach(report: &mut WalkReport, id: &str, state: WalkState) {
        debug!(id, ?state, "origin advanced");
        report.outcomes.insert(id.to_string(), state);
    }

    fn stop_requested(&self, report: &mut WalkReport) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        if !report.cancelled {
            warn!("walk cancelled");
            report.cancelled = true;
        }
        true
    }

    /// Drive one fetched origin to `Done`, recording each state it reaches.
    /// On error the origin keeps the last state recorded.
    async fn advance(&self, mut entry: PubMedEntry, report: &mut WalkReport) -> WalkResult<()> {
        let id = entry.pubmed_id.clone();
        let origin = self.persist(&entry, &[ArticleRole::Origin.label()])?;
        Self::reach(report, &id, WalkState::Persisted);

        let linked = self
            .expand(&origin, &id, &entry.references, ArticleRole::Reference, report)
            .await?;
        report.references_linked += linked;
        Self::reach(report, &id, WalkState::ReferencesExpanded);

        if self.options.expand_citations {
            match self.fetch_citations(&id).await {
                Ok(citations) => {
                    entry.citations = citations;
                    self.persist(&entry, &[])?;
                    let linked = self
                        .expand(&origin, &id, &entry.citations, ArticleRole::Citation, report)
                        .await?;
                    report.citations_linked += linked;
                }
                Err(e) => self.dead_letter(&id, "citations", &e.to_string(), report)?,
            }
            Self::reach(report, &id, WalkState::CitationsExpanded);
        }
        Self::reach(report, &id, WalkState::Done);
        Ok(())
    }

    /// Walk every id in `pubmed_ids` as an origin.
    ///
    /// Origins are fetched one batch at a time and each batch is written
    /// before the next is requested. Cancellation is checked before every
    /// batch and every origin. Fetch failures and store failures are counted
    /// per origin; only a dead-letter log that cannot be written aborts the
    /// walk.
    pub async fn walk_origins(&self, pubmed_ids: &[String]) -> WalkResult<WalkReport> {
        let mut report = WalkReport::default();
        let mut seen = HashSet::new();
        let ids: Vec<String> = pubmed_ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        report.origins_requested = ids.len();
        for id in &ids {
            report.outcomes.insert(id.clone(), WalkState::Requested);
        }

        'batches: for chunk in ids.chunks(self.options.batch_size.max(1)) {
            if self.stop_requested(&mut report) {
                break;
            }
            let entries = self.fetch_many(chunk, "fetch", &mut report).await?;
            let fetched: HashSet<&str> = entries.iter().map(|e| e.pubmed_id.as_str()).collect();
            for id in chunk {
                let state = if fetched.contains(id.as_str()) {
                    WalkState::Fetched
                } else {
                    report.origins_failed += 1;
                    WalkState::FetchFailed
                };
                report.outcomes.insert(id.clone(), state);
            }

            for entry in entries {
                if self.stop_requested(&mut report) {
                    break 'batches;
                }
                let id = entry.pubmed_id.clone();
                match self.advance(entry, &mut report).await {
                    Ok(()) => report.origins_completed += 1,
                    Err(WalkError::Merge(e)) => {
                        report.store_failures += 1;
                        warn!(id = %id, state = ?report.outcomes.get(&id), error = %e, "origin not fully written");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            requested = report.origins_requested,
            completed = report.origins_completed,
            failed = report.origins_failed,
            references = report.references_linked,
            citations = report.citations_linked,
            "pubmed walk finished"
        );
        Ok(report)
    }

    pub async fn walk_origin(&self, pubmed_id: &str) -> WalkResult<WalkState> {
        let report = self.walk_origins(&[pubmed_id.to_string()]).await?;
        Ok(report
            .outcomes
            .get(pubmed_id.trim())
            .copied()
            .unwrap_or(WalkState::FetchFailed))
    }

    /// Label articles cited by COSMIC and walk the ones not yet complete
    /// as origins.
    pub async fn walk_cosmic_articles(&self, pubmed_ids: &[String]) -> WalkResult<WalkReport> {
        let store = self.merger.store();
        let mut pending = Vec::new();
        let mut skipped = 0;
        for id in pubmed_ids {
            let key = self.merger.resolver().ensure_skeleton(&EntityKey::pubmed(id.as_str()))?;
            self.merger.add_label(&key, COSMIC_ARTICLE_LABEL)?;
            let complete_origin = store
                .has_label(&key, ArticleRole::Origin.label())
                .map_err(MergeError::from)?
                && !store.is_incomplete(&key).map_err(MergeError::from)?;
            if complete_origin {
                skipped += 1;
            } else {
                pending.push(id.clone());
            }
        }
        info!(total = pubmed_ids.len(), skipped, "COSMIC articles labelled");

        let mut report = self.walk_origins(&pending).await?;
        report.origins_skipped = skipped;
        Ok(report)
    }

    /// Remove an origin and all its relationships so the next walk
    /// rebuilds it from scratch.
    pub fn reset_origin(&self, pubmed_id: &str) -> WalkResult<bool> {
        let key = EntityKey::pubmed(pubmed_id).node_key();
        let removed = self
            .merger
            .store()
            .detach_delete(&key)
            .map_err(MergeError::from)?;
        info!(id = pubmed_id, removed, "origin reset");
        Ok(removed)
    }

    /// Delete every walk relationship and role label. Article nodes stay.
    pub fn clear_walk_state(&self) -> WalkResult<ClearReport> {
        let store = self.merger.store();
        let mut cleared = ClearReport::default();
        for role in ArticleRole::ALL {
            if let Some(rel_type) = role.relationship() {
                cleared.relationships += store
                    .delete_relationships(rel_type)
                    .map_err(MergeError::from)?;
            }
            cleared.labels += store
                .remove_label_everywhere(role.label())
                .map_err(MergeError::from)?;
        }
        info!(
            relationships = cleared.relationships,
            labels = cleared.labels,
            "walk state cleared"
        );
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, MergeNode, MergeOutcome, MergeRelationship, Node};
    use crate::pubmed::MockFetcher;
    use crate::storage::{GraphStore, MemoryStore, NodeFilter, StorageError, StorageResult};

    struct Fixture {
        walker: ReferenceGraphWalker,
        fetcher: Arc<MockFetcher>,
        _dir: tempfile::TempDir,
    }

    fn fixture(fetcher: MockFetcher, expand_citations: bool) -> Fixture {
        fixture_on(Arc::new(MemoryStore::new()), fetcher, expand_citations)
    }

    fn fixture_on(store: Arc<dyn GraphStore>, fetcher: MockFetcher, expand_citations: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let dead_letters = DeadLetterLog::open(dir.path().join("dead_letters.tsv")).unwrap();
        let fetcher = Arc::new(fetcher);
        let options = WalkOptions {
            expand_citations,
            retry_delay: Duration::from_millis(1),
            batch_size: 2,
        };
        Fixture {
            walker: ReferenceGraphWalker::new(GraphMerger::new(store), fetcher.clone(), dead_letters, options),
            fetcher,
            _dir: dir,
        }
    }

    /// Cancels the walk as soon as the first article is requested
    struct CancelOnFetch {
        inner: MockFetcher,
        cancel: CancellationToken,
    }

    #[async_trait::async_trait]
    impl ReferenceFetcher for CancelOnFetch {
        async fn fetch(&self, pubmed_id: &str) -> FetchResult<PubMedEntry> {
            self.cancel.cancel();
            self.inner.fetch(pubmed_id).await
        }

        async fn fetch_citations(&self, pubmed_id: &str) -> FetchResult<BTreeSet<String>> {
            self.inner.fetch_citations(pubmed_id).await
        }
    }

    /// Memory store whose relationship writes always fail
    struct NoRelationships(MemoryStore);

    impl GraphStore for NoRelationships {
        fn merge_node(&self, cmd: &MergeNode) -> StorageResult<MergeOutcome> {
            self.0.merge_node(cmd)
        }
        fn merge_relationship(&self, cmd: &MergeRelationship) -> StorageResult<MergeOutcome> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("refusing {}", cmd.rel_type),
            )))
        }
        fn add_label(&self, key: &NodeKey, label: &str) -> StorageResult<MergeOutcome> {
            self.0.add_label(key, label)
        }
        fn load_node(&self, key: &NodeKey) -> StorageResult<Option<Node>> {
            self.0.load_node(key)
        }
        fn find_nodes(&self, filter: &NodeFilter) -> StorageResult<Vec<Node>> {
            self.0.find_nodes(filter)
        }
        fn count_nodes(&self) -> StorageResult<usize> {
            self.0.count_nodes()
        }
        fn edges_from(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
            self.0.edges_from(key)
        }
        fn edges_to(&self, key: &NodeKey) -> StorageResult<Vec<Edge>> {
            self.0.edges_to(key)
        }
        fn count_edges(&self) -> StorageResult<usize> {
            self.0.count_edges()
        }
        fn detach_delete(&self, key: &NodeKey) -> StorageResult<bool> {
            self.0.detach_delete(key)
        }
        fn remove_label_everywhere(&self, label: &str) -> StorageResult<usize> {
            self.0.remove_label_everywhere(label)
        }
        fn delete_relationships(&self, rel_type: &str) -> StorageResult<usize> {
            self.0.delete_relationships(rel_type)
        }
    }

    fn article(f: &Fixture, id: &str) -> Option<crate::graph::Node> {
        f.walker
            .merger()
            .store()
            .load_node(&EntityKey::pubmed(id).node_key())
            .unwrap()
    }

    #[tokio::test]
    async fn origin_links_references_one_hop() {
        let f = fixture(
            MockFetcher::new()
                .with_article("100", &["200", "300"])
                .with_article("200", &["900"]),
            false,
        );
        assert_eq!(f.walker.walk_origin("100").await.unwrap(), WalkState::Done);

        let origin = article(&f, "100").unwrap();
        assert!(origin.has_label("Origin"));
        assert_eq!(origin.get("reference_count").and_then(|v| v.as_int()), Some(2));

        let fetched = article(&f, "200").unwrap();
        assert!(fetched.has_label("Reference"));
        assert!(!fetched.is_skeleton());
        // references of references are not followed
        assert!(article(&f, "900").is_none());

        // 300 is unknown remotely: skeleton, labelled, linked, dead-lettered
        let unknown = article(&f, "300").unwrap();
        assert!(unknown.is_skeleton());
        assert!(unknown.has_label("Reference"));
        assert_eq!(f.walker.dead_letters().count(), 1);
        assert_eq!(
            f.walker
                .merger()
                .store()
                .edges_from(&origin.key)
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn fetch_is_retried_exactly_once() {
        let f = fixture(MockFetcher::new().with_article("100", &[]).failing("100", 1), false);
        assert_eq!(f.walker.walk_origin("100").await.unwrap(), WalkState::Done);
        assert_eq!(f.fetcher.call_count("100"), 2);
        assert_eq!(f.walker.dead_letters().count(), 0);
    }

    #[tokio::test]
    async fn second_failure_is_dead_lettered() {
        let f = fixture(MockFetcher::new().with_article("100", &[]).failing("100", 2), false);
        assert_eq!(f.walker.walk_origin("100").await.unwrap(), WalkState::FetchFailed);
        assert_eq!(f.fetcher.call_count("100"), 2);
        assert_eq!(f.walker.dead_letters().count(), 1);
        assert!(article(&f, "100").is_none());
    }

    #[tokio::test]
    async fn complete_reference_is_not_refetched() {
        let f = fixture(
            MockFetcher::new()
                .with_article("100", &["200"])
                .with_article("101", &["200"])
                .with_article("200", &[]),
            false,
        );
        f.walker
            .walk_origins(&["100".to_string(), "101".to_string()])
            .await
            .unwrap();
        assert_eq!(f.fetcher.call_count("200"), 1);
        let edges = f
            .walker
            .merger()
            .store()
            .edges_to(&EntityKey::pubmed("200").node_key())
            .unwrap();
        assert_eq!(edges.len(), 2);
    }

    #[tokio::test]
    async fn citations_are_policy_gated() {
        let fetcher = || {
            MockFetcher::new()
                .with_article("100", &[])
                .with_article("500", &[])
                .with_citations("100", &["500"])
        };
        let without = fixture(fetcher(), false);
        without.walker.walk_origin("100").await.unwrap();
        assert!(article(&without, "500").is_none());

        let with = fixture(fetcher(), true);
        let report = with.walker.walk_origins(&["100".to_string()]).await.unwrap();
        assert_eq!(report.citations_linked, 1);
        let citing = article(&with, "500").unwrap();
        assert!(citing.has_label("Citation"));
        let origin = article(&with, "100").unwrap();
        assert_eq!(origin.get("cited_by_count").and_then(|v| v.as_int()), Some(1));
    }

    #[tokio::test]
    async fn cancelled_walk_persists_nothing() {
        let f = fixture(MockFetcher::new().with_article("100", &[]), false);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let Fixture { walker, fetcher, _dir } = f;
        let walker = walker.with_cancellation(cancel);

        let report = walker.walk_origins(&["100".to_string()]).await.unwrap();
        assert!(report.cancelled);
        assert_eq!(report.origins_completed, 0);
        assert_eq!(report.outcomes["100"], WalkState::Requested);
        assert_eq!(fetcher.call_count("100"), 0);
        assert_eq!(walker.merger().store().count_nodes().unwrap(), 0);
    }

    #[tokio::test]
    async fn cancellation_stops_fetching_later_batches() {
        let cancel = CancellationToken::new();
        let fetcher = Arc::new(CancelOnFetch {
            inner: MockFetcher::new()
                .with_article("1", &[])
                .with_article("2", &[])
                .with_article("3", &[]),
            cancel: cancel.clone(),
        });
        let dir = tempfile::tempdir().unwrap();
        let options = WalkOptions {
            batch_size: 1,
            ..WalkOptions::default()
        };
        let walker = ReferenceGraphWalker::new(
            GraphMerger::new(Arc::new(MemoryStore::new())),
            fetcher.clone(),
            DeadLetterLog::open(dir.path().join("dead_letters.tsv")).unwrap(),
            options,
        )
        .with_cancellation(cancel);

        let ids: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
        let report = walker.walk_origins(&ids).await.unwrap();
        assert!(report.cancelled);
        assert_eq!(fetcher.inner.calls(), vec!["1".to_string()]);
        assert_eq!(report.outcomes["1"], WalkState::Fetched);
        assert_eq!(report.outcomes["2"], WalkState::Requested);
        assert_eq!(report.outcomes["3"], WalkState::Requested);
        assert_eq!(walker.merger().store().count_nodes().unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_write_keeps_last_reached_state() {
        let f = fixture_on(
            Arc::new(NoRelationships(MemoryStore::new())),
            MockFetcher::new()
                .with_article("100", &["200"])
                .with_article("200", &[])
                .with_article("101", &[]),
            false,
        );
        let report = f
            .walker
            .walk_origins(&["100".to_string(), "101".to_string()])
            .await
            .unwrap();

        assert_eq!(report.store_failures, 1);
        assert_eq!(report.outcomes["100"], WalkState::Persisted);
        // an origin without references never writes a relationship
        assert_eq!(report.outcomes["101"], WalkState::Done);
        assert_eq!(report.origins_completed, 1);
        assert!(article(&f, "100").unwrap().has_label("Origin"));
    }

    #[tokio::test]
    async fn completed_origin_passes_through_every_state() {
        let f = fixture(
            MockFetcher::new()
                .with_article("100", &[])
                .with_citations("100", &[]),
            true,
        );
        let report = f.walker.walk_origins(&["100".to_string()]).await.unwrap();
        assert_eq!(report.outcomes["100"], WalkState::Done);
        assert_eq!(report.origins_completed, 1);
    }

    #[tokio::test]
    async fn clear_walk_state_keeps_articles() {
        let f = fixture(
            MockFetcher::new()
                .with_article("100", &["200"])
                .with_article("200", &[]),
            false,
        );
        f.walker.walk_origin("100").await.unwrap();
        let cleared = f.walker.clear_walk_state().unwrap();
        assert_eq!(cleared.relationships, 1);
        assert_eq!(cleared.labels, 2);

        let store = f.walker.merger().store();
        assert_eq!(store.count_edges().unwrap(), 0);
        assert_eq!(store.count_nodes().unwrap(), 2);
        assert!(!article(&f, "100").unwrap().has_label("Origin"));
    }

    #[tokio::test]
    async fn cosmic_articles_skip_complete_origins() {
        let f = fixture(
            MockFetcher::new()
                .with_article("100", &[])
                .with_article("101", &[]),
            false,
        );
        f.walker.walk_origin("100").await.unwrap();

        let report = f
            .walker
            .walk_cosmic_articles(&["100".to_string(), "101".to_string()])
            .await
            .unwrap();
        assert_eq!(report.origins_skipped, 1);
        assert_eq!(report.origins_requested, 1);
        assert_eq!(f.fetcher.call_count("100"), 1);
        for id in ["100", "101"] {
            let node = article(&f, id).unwrap();
            assert!(node.has_label(COSMIC_ARTICLE_LABEL));
            assert!(node.has_label("Origin"));
        }
    }
}
