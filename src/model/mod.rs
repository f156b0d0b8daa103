//! Typed COSMIC records
//!
//! Each record kind is parsed once from a [`Row`] and then merged into the
//! graph: the record promotes its own node and resolves every foreign key it
//! carries to a skeleton, so files can be loaded in any order.

mod breakpoint;
mod classification;
mod cna;
mod gene_census;
mod hallmark;
mod hgnc;
mod methylation;
mod mutation;
mod resistance;
mod sample;
mod taxonomy;
mod tumor;

pub use breakpoint::CosmicBreakpoint;
pub use classification::CosmicClassification;
pub use cna::CosmicCompleteCna;
pub use gene_census::CosmicGeneCensus;
pub use hallmark::CosmicHallmark;
pub use hgnc::CosmicHgnc;
pub use methylation::CosmicDiffMethylation;
pub use mutation::CosmicMutation;
pub use resistance::CosmicResistanceMutation;
pub use sample::CosmicSample;
pub use taxonomy::Taxonomy;
pub use tumor::CosmicTumor;

use crate::graph::{NodeKey, Properties, PropertyValue};
use crate::resolve::{GraphMerger, MergeResult};
use crate::source::{RecordError, Row, TumorTypes};

/// Lookups shared by every row of a load
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub tumor_types: TumorTypes,
}

impl ParseContext {
    pub fn new(tumor_types: TumorTypes) -> Self {
        Self { tumor_types }
    }
}

/// A record kind that can be parsed from a row and merged into the graph
pub trait CosmicRecord: Sized + Send + 'static {
    /// Name used in logs and reports
    const KIND: &'static str;

    fn from_row(row: &Row, ctx: &ParseContext) -> Result<Self, RecordError>;

    /// Merge this record, returning the key of its own node.
    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey>;
}

pub(crate) fn properties<const N: usize>(pairs: [(&str, PropertyValue); N]) -> Properties {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Copy plain text columns verbatim under new property names.
pub(crate) fn text_columns(row: &Row, columns: &[(&str, &str)]) -> Properties {
    columns
        .iter()
        .map(|(column, property)| (property.to_string(), PropertyValue::from(row.text(column))))
        .collect()
}
