//! PubMed ids cited by COSMIC record files

use crate::source::{RecordSource, SourceResult};
use std::collections::BTreeSet;

/// Column holding the PubMed id in COSMIC exports
pub const PUBMED_COLUMN: &str = "Pubmed_PMID";

/// Unique, non-blank PubMed ids from `source`, in ascending order.
///
/// Rows that fail to parse are skipped with a warning; a missing file
/// fails the whole read.
pub fn collect_pubmed_ids<S: RecordSource>(source: &S) -> SourceResult<Vec<String>> {
    let mut ids = BTreeSet::new();
    let mut rows = 0usize;
    for row in source.rows()? {
        match row {
            Ok(row) => {
                rows += 1;
                if let Some(id) = row.get(PUBMED_COLUMN).filter(|id| !id.is_empty()) {
                    ids.insert(id.to_string());
                }
            }
            Err(e) => tracing::warn!(error = %e, "skipping unreadable row"),
        }
    }
    tracing::info!(rows, unique = ids.len(), "collected PubMed ids");
    Ok(ids.into_iter().collect())
}
