//! PubMed reference graph
//!
//! Articles are fetched through a [`ReferenceFetcher`], persisted as
//! `PubMedArticle` nodes keyed by PubMed id, and linked to the articles they
//! reference or are cited by. [`ReferenceGraphWalker`] drives the walk;
//! [`collect_pubmed_ids`] seeds it from COSMIC files.

mod cosmic;
mod dead_letter;
mod entry;
mod eutils;
mod fetcher;
mod mock;
mod walker;
mod xml;

pub use cosmic::{collect_pubmed_ids, PUBMED_COLUMN};
pub use dead_letter::DeadLetterLog;
pub use entry::{author_caption, journal_issue, ArticleRole, Author, PubMedEntry, COSMIC_ARTICLE_LABEL};
pub use eutils::EutilsFetcher;
pub use fetcher::{BatchFetch, FetchError, FetchResult, ReferenceFetcher};
pub use mock::MockFetcher;
pub use walker::{
    ClearReport, ReferenceGraphWalker, WalkError, WalkOptions, WalkReport, WalkResult, WalkState,
};
pub use xml::{parse_articles, parse_citations};
