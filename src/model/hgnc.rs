use super::{properties, CosmicRecord, ParseContext};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// Cross reference between COSMIC, HGNC and Entrez gene ids
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicHgnc {
    pub hgnc_id: i64,
    pub cosmic_id: i64,
    pub gene_symbol: String,
    pub entrez_id: i64,
    pub mutated: bool,
    pub cancer_census: bool,
    pub expert_curated: bool,
}

impl CosmicRecord for CosmicHgnc {
    const KIND: &'static str = "hgnc";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            hgnc_id: row.required_int("HGNC_ID")?,
            cosmic_id: row.int_or_zero("COSMIC_ID"),
            gene_symbol: row.text("COSMIC_GENE_NAME"),
            entrez_id: row.int_or_zero("Entrez_id"),
            mutated: row.yes_no("Mutated?"),
            cancer_census: row.yes_no("Cancer_census?"),
            expert_curated: row.yes_no("Expert Curated?"),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("cosmic_id", self.cosmic_id.into()),
            ("gene_symbol", self.gene_symbol.as_str().into()),
            ("entrez_id", self.entrez_id.into()),
            ("mutated", self.mutated.into()),
            ("cancer_census", self.cancer_census.into()),
            ("expert_curated", self.expert_curated.into()),
        ]);
        let hgnc = merger.promoter().promote(&EntityKey::Hgnc(self.hgnc_id), props)?;

        if self.cancer_census && !self.gene_symbol.is_empty() {
            merger
                .resolver()
                .link_child(&hgnc, &EntityKey::gene(self.gene_symbol.as_str()))?;
        }
        if self.entrez_id > 0 {
            merger
                .resolver()
                .link_child(&hgnc, &EntityKey::Entrez(self.entrez_id))?;
        }
        Ok(hgnc)
    }
}
