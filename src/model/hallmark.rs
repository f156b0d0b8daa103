use super::{properties, CosmicRecord, ParseContext};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// One cancer hallmark observation for a gene.
///
/// Hallmarks are grouped per gene under a collection node:
/// `Gene -HAS_HALLMARK_COLLECTION-> collection -HAS_HALLMARK-> hallmark`.
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicHallmark {
    pub key: EntityKey,
    pub gene_symbol: String,
    pub cell_type: String,
    pub pubmed_id: String,
    pub hallmark: String,
    pub impact: String,
    pub description: String,
}

impl CosmicRecord for CosmicHallmark {
    const KIND: &'static str = "hallmark";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            key: EntityKey::new_hallmark(),
            gene_symbol: row.required_str("GENE_NAME")?,
            cell_type: row.text("CELL_TYPE"),
            pubmed_id: row.text("PUBMED_PMID"),
            hallmark: row.text("HALLMARK"),
            impact: row.text("IMPACT"),
            description: row.remark("DESCRIPTION"),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("gene_symbol", self.gene_symbol.as_str().into()),
            ("cell_type", self.cell_type.as_str().into()),
            ("pubmed_id", self.pubmed_id.as_str().into()),
            ("hallmark", self.hallmark.as_str().into()),
            ("impact", self.impact.as_str().into()),
            ("description", self.description.as_str().into()),
        ]);
        let hallmark = merger.promoter().promote(&self.key, props)?;

        let resolver = merger.resolver();
        let collection = EntityKey::HallmarkCollection(self.gene_symbol.clone());
        resolver.ensure_skeleton(&collection)?;
        resolver.link_from(&EntityKey::gene(self.gene_symbol.as_str()), &collection)?;
        resolver.link_from(&collection, &self.key)?;
        Ok(hallmark)
    }
}
