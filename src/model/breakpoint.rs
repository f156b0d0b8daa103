use super::{properties, CosmicRecord, ParseContext, Taxonomy};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// A structural variant breakpoint pair
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicBreakpoint {
    pub key: EntityKey,
    pub sample_name: String,
    pub sample_id: i64,
    pub tumor_id: i64,
    pub mutation_id: i64,
    pub chrom_from: String,
    pub location_from_min: i64,
    pub location_from_max: i64,
    pub strand_from: String,
    pub chrom_to: String,
    pub location_to_min: i64,
    pub location_to_max: i64,
    pub strand_to: String,
    pub pubmed_id: String,
    pub study_id: i64,
    pub site: Taxonomy,
    pub histology: Taxonomy,
    pub mutation_type: Taxonomy,
}

impl CosmicRecord for CosmicBreakpoint {
    const KIND: &'static str = "breakpoint";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            key: EntityKey::new_breakpoint(),
            sample_name: row.text("Sample name"),
            sample_id: row.int_or_zero("ID_SAMPLE"),
            tumor_id: row.required_int("ID_TUMOUR")?,
            mutation_id: row.int_or_zero("Mutation ID"),
            chrom_from: row.text("Chrom From"),
            location_from_min: row.int_or_zero("Location From min"),
            location_from_max: row.int_or_zero("Location From max"),
            strand_from: row.text("Strand From"),
            chrom_to: row.text("Chrom To"),
            location_to_min: row.int_or_zero("Location To min"),
            location_to_max: row.int_or_zero("Location To max"),
            strand_to: row.text("Strand To"),
            pubmed_id: row.text("Pubmed_PMID"),
            study_id: row.int_or_zero("ID_STUDY"),
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
            mutation_type: Taxonomy::single("Mutation", &row.text("Mutation Type")),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("sample_name", self.sample_name.as_str().into()),
            ("sample_id", self.sample_id.into()),
            ("chrom_from", self.chrom_from.as_str().into()),
            ("location_from_min", self.location_from_min.into()),
            ("location_from_max", self.location_from_max.into()),
            ("strand_from", self.strand_from.as_str().into()),
            ("chrom_to", self.chrom_to.as_str().into()),
            ("location_to_min", self.location_to_min.into()),
            ("location_to_max", self.location_to_max.into()),
            ("strand_to", self.strand_to.as_str().into()),
            ("pubmed_id", self.pubmed_id.as_str().into()),
            ("study_id", self.study_id.into()),
        ]);
        let breakpoint = merger.promoter().promote(&self.key, props)?;
        self.site.merge_under(&breakpoint, merger)?;
        self.histology.merge_under(&breakpoint, merger)?;
        self.mutation_type.merge_under(&breakpoint, merger)?;

        merger
            .resolver()
            .link_from(&EntityKey::Tumor(self.tumor_id), &self.key)?;
        if self.mutation_id > 0 {
            merger
                .resolver()
                .link_from(&EntityKey::Mutation(self.mutation_id), &self.key)?;
        }
        Ok(breakpoint)
    }
}
