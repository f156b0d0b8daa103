use super::{text_columns, CosmicRecord, CosmicTumor, ParseContext};
use crate::graph::{NodeKey, Properties, PropertyValue};
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

const TEXT_COLUMNS: &[(&str, &str)] = &[
    ("GENOMIC_MUTATION_ID", "genomic_mutation_id"),
    ("Mutation CDS", "mutation_cds"),
    ("Mutation AA", "mutation_aa"),
    ("Mutation Description", "mutation_description"),
    ("Mutation zygosity", "mutation_zygosity"),
    ("LOH", "loh"),
    ("GRCh", "grch"),
    ("Mutation genome position", "mutation_genome_position"),
    ("Mutation strand", "mutation_strand"),
    ("Resistance Mutation", "resistance_mutation"),
    ("FATHMM prediction", "fathmm_prediction"),
    ("Mutation somatic status", "mutation_somatic_status"),
    ("Pubmed_PMID", "pubmed_id"),
    ("Genome-wide screen", "genome_wide_screen"),
    ("HGVSP", "hgvsp"),
    ("HGVSC", "hgvsc"),
    ("HGVSG", "hgvsg"),
    ("Tier", "tier"),
];

/// A row of the mutation export, which also carries its tumor
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicMutation {
    pub mutation_id: i64,
    pub gene_symbol: String,
    pub hgnc_id: i64,
    pub gene_cds_length: i64,
    pub fathmm_score: f64,
    pub details: Properties,
    pub tumor: CosmicTumor,
}

impl CosmicRecord for CosmicMutation {
    const KIND: &'static str = "mutation";

    fn from_row(row: &Row, ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            mutation_id: row.required_int("MUTATION_ID")?,
            gene_symbol: row.required_str("Gene name")?,
            hgnc_id: row.int_or_zero("HGNC ID"),
            gene_cds_length: row.int_or_zero("Gene CDS length"),
            fathmm_score: row.float_or_zero("FATHMM score"),
            details: text_columns(row, TEXT_COLUMNS),
            tumor: CosmicTumor::from_row(row, ctx)?,
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        self.tumor.merge_into(merger)?;

        let key = EntityKey::Mutation(self.mutation_id);
        let mut props = self.details.clone();
        props.insert("gene_symbol".into(), PropertyValue::from(self.gene_symbol.as_str()));
        props.insert("gene_cds_length".into(), self.gene_cds_length.into());
        props.insert("fathmm_score".into(), self.fathmm_score.into());
        let mutation = merger.promoter().promote(&key, props)?;

        let resolver = merger.resolver();
        resolver.link_from(&self.tumor.key(), &key)?;
        resolver.link_child(&mutation, &EntityKey::gene(self.gene_symbol.as_str()))?;
        if self.hgnc_id > 0 {
            resolver.link_child(&mutation, &EntityKey::Hgnc(self.hgnc_id))?;
        }
        Ok(mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{merger, rel_types};

    fn row(hgnc: &str) -> Row {
        Row::from_pairs(
            9,
            &[
                ("Gene name", "BRAF"),
                ("MUTATION_ID", "476"),
                ("HGNC ID", hgnc),
                ("Mutation AA", "p.V600E"),
                ("FATHMM score", "0.97"),
                ("ID_tumour", "1001"),
                ("ID_sample", "2002"),
                ("Primary site", "skin"),
            ],
        )
    }

    #[test]
    fn merge_builds_tumor_gene_and_hgnc_links() {
        let merger = merger();
        let mutation = CosmicMutation::from_row(&row("1097"), &ParseContext::default()).unwrap();
        let key = mutation.merge_into(&merger).unwrap();

        assert_eq!(rel_types(&merger, &key), vec!["HAS_GENE", "HAS_HGNC"]);
        let tumor = EntityKey::Tumor(1001).node_key();
        assert_eq!(
            rel_types(&merger, &tumor),
            vec!["HAS_HISTOLOGY_TYPE", "HAS_MUTATION", "HAS_SAMPLE", "HAS_SITE_TYPE"]
        );
        // tumor row data arrived with the mutation, so the tumor is complete
        assert!(!merger.store().is_incomplete(&tumor).unwrap());
        assert!(merger
            .store()
            .is_incomplete(&EntityKey::gene("BRAF").node_key())
            .unwrap());
    }

    #[test]
    fn zero_hgnc_id_is_not_linked() {
        let merger = merger();
        let mutation = CosmicMutation::from_row(&row(""), &ParseContext::default()).unwrap();
        let key = mutation.merge_into(&merger).unwrap();
        assert_eq!(rel_types(&merger, &key), vec!["HAS_GENE"]);
    }

    #[test]
    fn missing_gene_is_malformed() {
        let row = Row::from_pairs(4, &[("MUTATION_ID", "1"), ("ID_tumour", "1"), ("ID_sample", "1")]);
        match CosmicMutation::from_row(&row, &ParseContext::default()) {
            Err(RecordError::MalformedRecord { column, line, .. }) => {
                assert_eq!(column, "Gene name");
                assert_eq!(line, 4);
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
    }
}
