//! Retrieval of bibliographic entries from an external service

use super::entry::PubMedEntry;
use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("article {0} not returned by the service")]
    NotReturned(String),

    /// The whole batch request failed; recorded against each of its ids
    #[error("batch request failed: {0}")]
    Batch(String),
}

impl From<quick_xml::Error> for FetchError {
    fn from(e: quick_xml::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Outcome of a batch request. One bad id never fails the others.
#[derive(Debug, Default)]
pub struct BatchFetch {
    pub entries: Vec<PubMedEntry>,
    pub failures: Vec<(String, FetchError)>,
}

impl BatchFetch {
    /// Match returned entries against the requested ids; every id without
    /// an entry becomes a `NotReturned` failure.
    pub fn reconcile(requested: &[String], entries: Vec<PubMedEntry>) -> Self {
        let returned: BTreeSet<&str> = entries.iter().map(|e| e.pubmed_id.as_str()).collect();
        let failures = requested
            .iter()
            .filter(|id| !returned.contains(id.as_str()))
            .map(|id| (id.clone(), FetchError::NotReturned(id.clone())))
            .collect();
        let entries = entries
            .into_iter()
            .filter(|e| requested.contains(&e.pubmed_id))
            .collect();
        Self { entries, failures }
    }
}

/// Source of PubMed entries and citation links.
///
/// Abstracts over transport (NCBI E-utilities, test doubles) so the walker
/// does not depend on how articles are retrieved.
#[async_trait]
pub trait ReferenceFetcher: Send + Sync {
    async fn fetch(&self, pubmed_id: &str) -> FetchResult<PubMedEntry>;

    /// Fetch several ids. The default issues one request per id.
    ///
    /// Implementations must not retry on their own: every failure is
    /// returned so the caller can apply its single delayed retry.
    async fn fetch_batch(&self, pubmed_ids: &[String]) -> BatchFetch {
        let mut batch = BatchFetch::default();
        for id in pubmed_ids {
            match self.fetch(id).await {
                Ok(entry) => batch.entries.push(entry),
                Err(e) => batch.failures.push((id.clone(), e)),
            }
        }
        batch
    }

    /// Ids of the articles citing `pubmed_id`
    async fn fetch_citations(&self, pubmed_id: &str) -> FetchResult<BTreeSet<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_reports_missing_ids() {
        let requested: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
        let batch = BatchFetch::reconcile(
            &requested,
            vec![PubMedEntry::new("1"), PubMedEntry::new("3"), PubMedEntry::new("9")],
        );
        assert_eq!(batch.entries.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].0, "2");
        assert!(matches!(batch.failures[0].1, FetchError::NotReturned(_)));
    }
}
