use super::{properties, CosmicRecord, ParseContext, Taxonomy};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// A differentially methylated fragment
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicDiffMethylation {
    pub key: EntityKey,
    pub study_id: i64,
    pub sample_id: i64,
    pub tumor_id: i64,
    pub fragment_id: String,
    pub genome_version: String,
    pub chromosome: i64,
    pub position: i64,
    pub strand: &'static str,
    pub gene_symbol: String,
    pub methylation: String,
    pub avg_beta_value_normal: f64,
    pub beta_value: f64,
    pub two_sided_p_value: f64,
    pub site: Taxonomy,
    pub histology: Taxonomy,
}

impl CosmicRecord for CosmicDiffMethylation {
    const KIND: &'static str = "methylation";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            key: EntityKey::new_diff_methylation(),
            study_id: row.int_or_zero("STUDY_ID"),
            sample_id: row.required_int("ID_SAMPLE")?,
            tumor_id: row.required_int("ID_TUMOUR")?,
            fragment_id: row.text("FRAGMENT_ID"),
            genome_version: row.text("GENOME_VERSION"),
            chromosome: row.int_or_zero("CHROMOSOME"),
            position: row.int_or_zero("POSITION"),
            strand: if row.text("STRAND") == "1" { "+" } else { "-" },
            gene_symbol: row.text("GENE_NAME"),
            methylation: row.text("METHYLATION"),
            avg_beta_value_normal: row.float_or_zero("AVG_BETA_VALUE_NORMAL"),
            beta_value: row.float_or_zero("BETA_VALUE"),
            two_sided_p_value: row.float_or_zero("TWO_SIDED_P_VALUE"),
            site: Taxonomy::from_row(
                row,
                "Site",
                "PRIMARY_SITE",
                ["SITE_SUBTYPE_1", "SITE_SUBTYPE_2", "SITE_SUBTYPE_3"],
            ),
            histology: Taxonomy::from_row(
                row,
                "Histology",
                "PRIMARY_HISTOLOGY",
                ["HISTOLOGY_SUBTYPE_1", "HISTOLOGY_SUBTYPE_2", "HISTOLOGY_SUBTYPE_3"],
            ),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("study_id", self.study_id.into()),
            ("fragment_id", self.fragment_id.as_str().into()),
            ("genome_version", self.genome_version.as_str().into()),
            ("chromosome", self.chromosome.into()),
            ("position", self.position.into()),
            ("strand", self.strand.into()),
            ("gene_symbol", self.gene_symbol.as_str().into()),
            ("methylation", self.methylation.as_str().into()),
            ("avg_beta_value_normal", self.avg_beta_value_normal.into()),
            ("beta_value", self.beta_value.into()),
            ("two_sided_p_value", self.two_sided_p_value.into()),
        ]);
        let methylation = merger.promoter().promote(&self.key, props)?;
        self.site.merge_under(&methylation, merger)?;
        self.histology.merge_under(&methylation, merger)?;

        merger
            .resolver()
            .link_from(&EntityKey::Tumor(self.tumor_id), &self.key)?;
        merger
            .resolver()
            .link_from(&EntityKey::Sample(self.sample_id), &self.key)?;
        Ok(methylation)
    }
}
