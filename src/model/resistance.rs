use super::{properties, CosmicRecord, ParseContext};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// Relationship from a resistance record to the drug it resists
pub const RESISTANT_TO: &str = "RESISTANT_TO";

/// A mutation observed to confer drug resistance in a sample
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicResistanceMutation {
    pub key: EntityKey,
    pub mutation_id: i64,
    pub sample_id: i64,
    pub gene_symbol: String,
    pub transcript: String,
    pub drug_name: String,
    pub census_gene: bool,
    pub pubmed_id: String,
}

impl CosmicRecord for CosmicResistanceMutation {
    const KIND: &'static str = "resistance";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            key: EntityKey::new_drug_resistance(),
            mutation_id: row.required_int("MUTATION_ID")?,
            sample_id: row.required_int("Sample ID")?,
            gene_symbol: row.text("Gene Name"),
            transcript: row.text("Transcript"),
            drug_name: row.required_str("Drug Name")?,
            census_gene: matches!(
                row.text("Census Gene").to_ascii_lowercase().as_str(),
                "y" | "yes"
            ),
            pubmed_id: row.text("Pubmed Id"),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("gene_symbol", self.gene_symbol.as_str().into()),
            ("transcript", self.transcript.as_str().into()),
            ("drug_name", self.drug_name.as_str().into()),
            ("census_gene", self.census_gene.into()),
            ("pubmed_id", self.pubmed_id.as_str().into()),
        ]);
        let resistance = merger.promoter().promote(&self.key, props)?;

        let resolver = merger.resolver();
        resolver.link_from(&EntityKey::Mutation(self.mutation_id), &self.key)?;
        resolver.link_from(&EntityKey::Sample(self.sample_id), &self.key)?;
        resolver.link_to(&resistance, RESISTANT_TO, &EntityKey::drug(&self.drug_name))?;
        Ok(resistance)
    }
}
