//! NCBI E-utilities client

use super::entry::PubMedEntry;
use super::fetcher::{BatchFetch, FetchError, FetchResult, ReferenceFetcher};
use super::xml::{parse_articles, parse_citations};
use crate::config::{NcbiCredentials, PubMedSettings};
use crate::pipeline::RateLimit;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeSet;
use std::time::Duration;

/// Requests per second NCBI allows with and without an API key
const RATE_WITH_KEY: u32 = 10;
const RATE_WITHOUT_KEY: u32 = 3;

pub struct EutilsFetcher {
    client: Client,
    base_url: String,
    credentials: NcbiCredentials,
    rate: RateLimit,
}

impl EutilsFetcher {
    pub fn new(settings: &PubMedSettings, credentials: NcbiCredentials) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("cosmicgraph/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let per_second = settings.requests_per_second.unwrap_or(if credentials.api_key.is_some() {
            RATE_WITH_KEY
        } else {
            RATE_WITHOUT_KEY
        });
        tracing::debug!(
            base_url = %settings.base_url,
            per_second,
            api_key = credentials.api_key.is_some(),
            "E-utilities client ready"
        );
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credentials,
            rate: RateLimit::per_second(per_second),
        })
    }

    fn credential_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(email) = &self.credentials.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = &self.credentials.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    async fn get(&self, endpoint: &str, mut params: Vec<(&'static str, String)>) -> FetchResult<String> {
        self.rate.wait().await;
        params.extend(self.credential_params());
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text().await?)
    }

    async fn efetch(&self, ids: &[String]) -> FetchResult<Vec<PubMedEntry>> {
        let xml = self
            .get(
                "efetch.fcgi",
                vec![
                    ("db", "pubmed".to_string()),
                    ("retmode", "xml".to_string()),
                    ("id", ids.join(",")),
                ],
            )
            .await?;
        parse_articles(&xml)
    }
}

#[async_trait]
impl ReferenceFetcher for EutilsFetcher {
    async fn fetch(&self, pubmed_id: &str) -> FetchResult<PubMedEntry> {
        self.efetch(&[pubmed_id.to_string()])
            .await?
            .into_iter()
            .find(|e| e.pubmed_id == pubmed_id)
            .ok_or_else(|| FetchError::NotReturned(pubmed_id.to_string()))
    }

    /// One request for the whole batch. If that request fails outright,
    /// every id in it is reported as failed.
    async fn fetch_batch(&self, pubmed_ids: &[String]) -> BatchFetch {
        if pubmed_ids.is_empty() {
            return BatchFetch::default();
        }
        match self.efetch(pubmed_ids).await {
            Ok(entries) => BatchFetch::reconcile(pubmed_ids, entries),
            Err(e) => {
                tracing::warn!(count = pubmed_ids.len(), error = %e, "batch fetch failed");
                let reason = e.to_string();
                BatchFetch {
                    entries: Vec::new(),
                    failures: pubmed_ids
                        .iter()
                        .map(|id| (id.clone(), FetchError::Batch(reason.clone())))
                        .collect(),
                }
            }
        }
    }

    async fn fetch_citations(&self, pubmed_id: &str) -> FetchResult<BTreeSet<String>> {
        let xml = self
            .get(
                "elink.fcgi",
                vec![
                    ("dbfrom", "pubmed".to_string()),
                    ("linkname", "pubmed_pubmed_citedin".to_string()),
                    ("id", pubmed_id.to_string()),
                ],
            )
            .await?;
        parse_citations(&xml)
    }
}
