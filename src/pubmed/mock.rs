//! In-memory `ReferenceFetcher` returning preconfigured entries (testing)

use super::entry::PubMedEntry;
use super::fetcher::{FetchError, FetchResult, ReferenceFetcher};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockFetcher {
    entries: HashMap<String, PubMedEntry>,
    citations: HashMap<String, BTreeSet<String>>,
    /// Remaining forced failures per id
    failures: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: PubMedEntry) -> Self {
        self.entries.insert(entry.pubmed_id.clone(), entry);
        self
    }

    /// An article with the given references and nothing else
    pub fn with_article(self, pubmed_id: &str, references: &[&str]) -> Self {
        let mut entry = PubMedEntry::new(pubmed_id);
        entry.article_title = format!("Article {}", pubmed_id);
        entry.references = references.iter().map(|r| r.to_string()).collect();
        self.with_entry(entry)
    }

    pub fn with_citations(mut self, pubmed_id: &str, citing: &[&str]) -> Self {
        self.citations.insert(
            pubmed_id.to_string(),
            citing.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Fail the next `times` requests for `pubmed_id` with a server error.
    pub fn failing(self, pubmed_id: &str, times: usize) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(pubmed_id.to_string(), times);
        self
    }

    /// Every id requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, pubmed_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == pubmed_id)
            .count()
    }

    fn take_failure(&self, pubmed_id: &str) -> Option<FetchError> {
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(pubmed_id) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Some(FetchError::Status {
                    status: 503,
                    url: format!("mock://{}", pubmed_id),
                })
            }
            _ => None,
        }
    }
}

#[async_trait]
impl ReferenceFetcher for MockFetcher {
    async fn fetch(&self, pubmed_id: &str) -> FetchResult<PubMedEntry> {
        self.calls.lock().unwrap().push(pubmed_id.to_string());
        if let Some(e) = self.take_failure(pubmed_id) {
            return Err(e);
        }
        self.entries
            .get(pubmed_id)
            .cloned()
            .ok_or_else(|| FetchError::NotReturned(pubmed_id.to_string()))
    }

    async fn fetch_citations(&self, pubmed_id: &str) -> FetchResult<BTreeSet<String>> {
        Ok(self.citations.get(pubmed_id).cloned().unwrap_or_default())
    }
}
