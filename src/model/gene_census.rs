use super::{properties, CosmicRecord, ParseContext};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// Extra label carried by genes promoted from the Cancer Gene Census
pub const CENSUS_LABEL: &str = "CosmicCensus";

/// One row of the Cancer Gene Census
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicGeneCensus {
    pub gene_symbol: String,
    pub name: String,
    pub entrez_id: i64,
    pub genome_location: String,
    pub tier: i64,
    pub hallmark: bool,
    pub chromosome_band: String,
    pub somatic: bool,
    pub germline: bool,
    pub somatic_tumor_types: Vec<String>,
    pub germline_tumor_types: Vec<String>,
    pub cancer_syndrome: String,
    pub tissue_types: Vec<String>,
    pub molecular_genetics: String,
    pub roles_in_cancer: Vec<String>,
    pub mutation_types: Vec<String>,
    pub translocation_partners: Vec<String>,
    pub other_germline_mutation: String,
    pub other_syndromes: Vec<String>,
    pub synonyms: Vec<String>,
}

impl CosmicRecord for CosmicGeneCensus {
    const KIND: &'static str = "gene-census";

    fn from_row(row: &Row, ctx: &ParseContext) -> Result<Self, RecordError> {
        let tumor_types = |column: &str| ctx.tumor_types.resolve_all(&row.list(column, ','));
        Ok(Self {
            gene_symbol: row.required_str("Gene Symbol")?,
            name: row.text("Name"),
            entrez_id: row.int_or_zero("Entrez GeneId"),
            genome_location: row.text("Genome Location"),
            tier: row.int_or_zero("Tier"),
            hallmark: row.present("Hallmark"),
            chromosome_band: row.text("Chr Band"),
            somatic: row.present("Somatic"),
            germline: row.present("Germline"),
            somatic_tumor_types: tumor_types("Tumour Types(Somatic)"),
            germline_tumor_types: tumor_types("Tumour Types(Germline)"),
            cancer_syndrome: row.text("Cancer Syndrome"),
            tissue_types: row.list("Tissue Type", ','),
            molecular_genetics: row.text("Molecular Genetics"),
            roles_in_cancer: row.list("Role in Cancer", ','),
            mutation_types: row.list("Mutation Types", ','),
            translocation_partners: row.list("Translocation Partner", ','),
            other_germline_mutation: row.text("Other Germline Mut"),
            other_syndromes: row.list("Other Syndrome", ';'),
            synonyms: row.list("Synonyms", ','),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("name", self.name.as_str().into()),
            ("entrez_id", self.entrez_id.into()),
            ("genome_location", self.genome_location.as_str().into()),
            ("tier", self.tier.into()),
            ("hallmark", self.hallmark.into()),
            ("chromosome_band", self.chromosome_band.as_str().into()),
            ("somatic", self.somatic.into()),
            ("germline", self.germline.into()),
            ("cancer_syndrome", self.cancer_syndrome.as_str().into()),
            ("molecular_genetics", self.molecular_genetics.as_str().into()),
            ("other_germline_mutation", self.other_germline_mutation.as_str().into()),
        ]);
        let (gene, _) = merger.promoter().promote_with_labels(
            &EntityKey::gene(self.gene_symbol.as_str()),
            &[CENSUS_LABEL],
            props,
        )?;

        merger.annotations().expand_all(
            &gene,
            &[
                ("SomaticTumorType", self.somatic_tumor_types.as_slice()),
                ("GermlineTumorType", self.germline_tumor_types.as_slice()),
                ("TissueType", self.tissue_types.as_slice()),
                ("RoleInCancer", self.roles_in_cancer.as_slice()),
                ("MutationType", self.mutation_types.as_slice()),
                ("OtherSyndrome", self.other_syndromes.as_slice()),
                ("Synonym", self.synonyms.as_slice()),
            ],
        )?;

        for partner in &self.translocation_partners {
            merger.resolver().link_to(
                &gene,
                "HAS_TRANSLOCATION_PARTNER",
                &EntityKey::gene(partner.as_str()),
            )?;
        }
        Ok(gene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ANNOTATION_LABEL;
    use crate::source::TumorTypes;
    use crate::storage::NodeFilter;

    fn row() -> Row {
        Row::from_pairs(
            2,
            &[
                ("Gene Symbol", "ABL1"),
                ("Name", "ABL proto-oncogene 1"),
                ("Entrez GeneId", "25"),
                ("Tier", "1"),
                ("Hallmark", "Yes"),
                ("Somatic", "yes"),
                ("Germline", ""),
                ("Tumour Types(Somatic)", "CML, ALL, T-ALL"),
                ("Tissue Type", "L"),
                ("Role in Cancer", "oncogene, fusion"),
                ("Mutation Types", "T, Mis"),
                ("Translocation Partner", "BCR, ETV6"),
                ("Other Syndrome", ""),
                ("Synonyms", "ABL,JTK7"),
            ],
        )
    }

    fn context() -> ParseContext {
        let mut types = TumorTypes::new();
        types.insert("CML", "chronic myeloid leukaemia");
        ParseContext::new(types)
    }

    #[test]
    fn parses_lists_and_expands_abbreviations() {
        let census = CosmicGeneCensus::from_row(&row(), &context()).unwrap();
        assert!(census.hallmark);
        assert!(census.somatic);
        assert!(!census.germline);
        assert_eq!(
            census.somatic_tumor_types,
            vec!["chronic myeloid leukaemia", "ALL", "T-ALL"]
        );
        assert!(census.other_syndromes.is_empty());
        assert_eq!(census.translocation_partners, vec!["BCR", "ETV6"]);
    }

    #[test]
    fn merge_fans_out_annotations_and_partners() {
        let merger = crate::model::test_support::merger();
        let census = CosmicGeneCensus::from_row(&row(), &context()).unwrap();
        let gene = census.merge_into(&merger).unwrap();

        let node = merger.store().load_node(&gene).unwrap().unwrap();
        assert!(node.has_label(CENSUS_LABEL));

        // 3 tumor types + 1 tissue + 2 roles + 2 mutation types + 2 synonyms
        let annotations = merger
            .store()
            .find_nodes(&NodeFilter::new().with_label(ANNOTATION_LABEL))
            .unwrap();
        assert_eq!(annotations.len(), 10);

        let edges = merger.store().edges_from(&gene).unwrap();
        let partners = edges
            .iter()
            .filter(|e| e.rel_type == "HAS_TRANSLOCATION_PARTNER")
            .count();
        assert_eq!(partners, 2);
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn census_promotes_existing_skeleton() {
        let merger = crate::model::test_support::merger();
        merger
            .resolver()
            .ensure_skeleton(&EntityKey::gene("ABL1"))
            .unwrap();
        CosmicGeneCensus::from_row(&row(), &context())
            .unwrap()
            .merge_into(&merger)
            .unwrap();
        let genes = merger
            .store()
            .find_nodes(&NodeFilter::new().with_label(CENSUS_LABEL))
            .unwrap();
        assert_eq!(genes.len(), 1);
        assert_eq!(genes[0].get_str("name"), Some("ABL proto-oncogene 1"));
    }
}
