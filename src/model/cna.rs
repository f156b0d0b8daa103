use super::{properties, CosmicRecord, ParseContext, Taxonomy};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// A copy number segment from the complete CNA export
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicCompleteCna {
    pub key: EntityKey,
    pub cnv_id: i64,
    pub gene_id: i64,
    pub gene_symbol: String,
    pub sample_id: i64,
    pub tumor_id: i64,
    pub sample_name: String,
    pub total_cn: i64,
    pub minor_allele: String,
    pub study_id: i64,
    pub grch: String,
    pub chromosome_location: String,
    pub site: Taxonomy,
    pub histology: Taxonomy,
    pub mutation_type: Taxonomy,
}

impl CosmicRecord for CosmicCompleteCna {
    const KIND: &'static str = "cna";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            key: EntityKey::new_complete_cna(),
            cnv_id: row.int_or_zero("CNV_ID"),
            gene_id: row.int_or_zero("ID_GENE"),
            gene_symbol: row.text("gene_name"),
            sample_id: row.required_int("ID_SAMPLE")?,
            tumor_id: row.required_int("ID_TUMOR")?,
            sample_name: row.text("SAMPLE_NAME"),
            total_cn: row.int_or_zero("TOTAL_CN"),
            minor_allele: row.text("MINOR_ALLELE"),
            study_id: row.int_or_zero("ID_STUDY"),
            grch: row.text("GRCh"),
            chromosome_location: row.text("Chromosome:G_Start..G_Stop"),
            site: Taxonomy::from_row(
                row,
                "Site",
                "Primary site",
                ["Site subtype 1", "Site subtype 2", "Site subtype 3"],
            ),
            histology: Taxonomy::from_row(
                row,
                "Histology",
                "Primary histology",
                ["Histology subtype 1", "Histology subtype 2", "Histology subtype 3"],
            ),
            mutation_type: Taxonomy::single("Mutation", &row.text("MUT_TYPE")),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("cnv_id", self.cnv_id.into()),
            ("gene_id", self.gene_id.into()),
            ("sample_name", self.sample_name.as_str().into()),
            ("total_cn", self.total_cn.into()),
            ("minor_allele", self.minor_allele.as_str().into()),
            ("study_id", self.study_id.into()),
            ("grch", self.grch.as_str().into()),
            ("chromosome_location", self.chromosome_location.as_str().into()),
        ]);
        let cna = merger.promoter().promote(&self.key, props)?;
        self.site.merge_under(&cna, merger)?;
        self.histology.merge_under(&cna, merger)?;
        self.mutation_type.merge_under(&cna, merger)?;

        let resolver = merger.resolver();
        if !self.gene_symbol.is_empty() {
            resolver.link_child(&cna, &EntityKey::gene(self.gene_symbol.as_str()))?;
        }
        resolver.link_from(&EntityKey::Tumor(self.tumor_id), &self.key)?;
        resolver.link_from(&EntityKey::Sample(self.sample_id), &self.key)?;
        Ok(cna)
    }
}
