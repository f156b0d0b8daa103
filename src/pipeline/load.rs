//! Producer/consumer load of one record file
//!
//! A blocking producer reads and parses rows into a bounded channel; a single
//! consumer merges one record at a time. Rows that fail to parse and records
//! whose merge fails are counted and logged, never fatal.

use super::{CancellationToken, RateLimit};
use crate::model::{CosmicRecord, ParseContext};
use crate::resolve::GraphMerger;
use crate::source::{RecordSource, SourceError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

/// Failures that abort a whole run
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("producer task failed: {0}")]
    Producer(#[from] tokio::task::JoinError),
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Capacity of the queue between producer and consumer
    pub channel_capacity: usize,
    pub rate: RateLimit,
    pub context: ParseContext,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            rate: RateLimit::unlimited(),
            context: ParseContext::default(),
        }
    }
}

/// Aggregate counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub kind: String,
    pub records_read: usize,
    pub loaded: usize,
    /// Rows that could not be parsed
    pub skipped: usize,
    /// Records whose merge failed in the store
    pub failed: usize,
    pub nodes_created: usize,
    pub nodes_updated: usize,
    pub relationships_created: usize,
    pub cancelled: bool,
}

impl LoadReport {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} load{}", self.kind, if self.cancelled { " (cancelled)" } else { "" })?;
        writeln!(f, "  records read:          {}", self.records_read)?;
        writeln!(f, "  loaded:                {}", self.loaded)?;
        writeln!(f, "  skipped (malformed):   {}", self.skipped)?;
        writeln!(f, "  failed (store):        {}", self.failed)?;
        writeln!(f, "  nodes created:         {}", self.nodes_created)?;
        writeln!(f, "  nodes updated:         {}", self.nodes_updated)?;
        write!(f, "  relationships created: {}", self.relationships_created)
    }
}

/// Load every record of `source` as `R`.
///
/// Only a source that cannot be opened fails the run.
pub async fn load_records<R, S>(
    source: &S,
    merger: &GraphMerger,
    options: &LoadOptions,
    cancel: &CancellationToken,
) -> LoadResult<LoadReport>
where
    R: CosmicRecord,
    S: RecordSource,
{
    let rows = source.rows()?;
    let mut report = LoadReport::new(R::KIND);
    let before = merger.stats().snapshot();

    let (tx, mut rx) = mpsc::channel::<Result<R, String>>(options.channel_capacity.max(1));
    let context = options.context.clone();
    let producer_cancel = cancel.clone();
    let producer = tokio::task::spawn_blocking(move || {
        for row in rows {
            if producer_cancel.is_cancelled() {
                break;
            }
            let parsed = match row {
                Ok(row) => R::from_row(&row, &context).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            if tx.blocking_send(parsed).is_err() {
                // consumer stopped
                break;
            }
        }
    });

    while let Some(parsed) = rx.recv().await {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        report.records_read += 1;
        match parsed {
            Ok(record) => {
                options.rate.wait().await;
                match record.merge_into(merger) {
                    Ok(key) => {
                        report.loaded += 1;
                        tracing::debug!(kind = R::KIND, node = %key, "record merged");
                    }
                    Err(e) => {
                        report.failed += 1;
                        tracing::warn!(kind = R::KIND, error = %e, "record not merged");
                    }
                }
            }
            Err(reason) => {
                report.skipped += 1;
                tracing::warn!(kind = R::KIND, %reason, "skipping record");
            }
        }
    }
    if cancel.is_cancelled() {
        report.cancelled = true;
    }
    drop(rx);
    producer.await?;

    let delta = merger.stats().snapshot().since(&before);
    report.nodes_created = delta.nodes_created;
    report.nodes_updated = delta.nodes_matched;
    report.relationships_created = delta.relationships_created;

    tracing::info!(
        kind = R::KIND,
        read = report.records_read,
        loaded = report.loaded,
        skipped = report.skipped,
        failed = report.failed,
        cancelled = report.cancelled,
        "load finished"
    );
    Ok(report)
}
