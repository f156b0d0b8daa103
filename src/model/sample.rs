use super::{text_columns, CosmicRecord, ParseContext, Taxonomy};
use crate::graph::{NodeKey, Properties, PropertyValue};
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// Descriptive columns copied verbatim, as (column, property)
const TEXT_COLUMNS: &[(&str, &str)] = &[
    ("sample_name", "sample_name"),
    ("therapy_relationship", "therapy_relationship"),
    ("sample_differentiator", "sample_differentiator"),
    ("mutation_allele_specification", "mutation_allele_specification"),
    ("msi", "msi"),
    ("average_ploidy", "average_ploidy"),
    ("drug_response", "drug_response"),
    ("grade", "grade"),
    ("stage", "stage"),
    ("cytogenetics", "cytogenetics"),
    ("metastatic_site", "metastatic_site"),
    ("tumour_source", "tumor_source"),
    ("ethnicity", "ethnicity"),
    ("environmental_variables", "environmental_variables"),
    ("germline_mutation", "germline_mutation"),
    ("therapy", "therapy"),
    ("family", "family"),
    ("gender", "gender"),
    ("nci_code", "nci_code"),
    ("sample_type", "sample_type"),
];

const REMARK_COLUMNS: &[(&str, &str)] = &[
    ("sample_remark", "sample_remark"),
    ("tumour_remark", "tumor_remark"),
    ("individual_remark", "individual_remark"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CosmicSample {
    pub sample_id: i64,
    pub tumor_id: i64,
    pub site: Taxonomy,
    pub histology: Taxonomy,
    /// `COSO`-prefixed phenotype id, when the sample names one
    pub phenotype_id: Option<String>,
    pub whole_genome_screen: bool,
    pub whole_exome_screen: bool,
    pub normal_tissue_tested: bool,
    pub age: i64,
    pub age_at_tumour_recurrence: i64,
    pub details: Properties,
}

impl CosmicRecord for CosmicSample {
    const KIND: &'static str = "sample";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        let mut details = text_columns(row, TEXT_COLUMNS);
        for (column, property) in REMARK_COLUMNS {
            details.insert(property.to_string(), PropertyValue::from(row.remark(column)));
        }
        let phenotype_id = row
            .get("cosmic_phenotype_id")
            .filter(|id| !id.is_empty())
            .map(|id| format!("COSO{}", id.trim_start_matches("COSO")));

        Ok(Self {
            sample_id: row.required_int("sample_id")?,
            tumor_id: row.required_int("id_tumour")?,
            site: Taxonomy::from_row(
                row,
                "Site",
                "primary_site",
                ["site_subtype_1", "site_subtype_2", "site_subtype_3"],
            ),
            histology: Taxonomy::from_row(
                row,
                "Histology",
                "primary_histology",
                ["histology_subtype_1", "histology_subtype_2", "histology_subtype_3"],
            ),
            phenotype_id,
            whole_genome_screen: row.yes_no("whole_genome_screen"),
            whole_exome_screen: row.yes_no("whole_exome_screen"),
            normal_tissue_tested: row.yes_no("normal_tissue_tested"),
            age: row.int_or_zero("age"),
            age_at_tumour_recurrence: row.int_or_zero("age_at_tumour_recurrence"),
            details,
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let key = EntityKey::Sample(self.sample_id);
        let mut props = self.details.clone();
        props.insert("whole_genome_screen".into(), self.whole_genome_screen.into());
        props.insert("whole_exome_screen".into(), self.whole_exome_screen.into());
        props.insert("normal_tissue_tested".into(), self.normal_tissue_tested.into());
        props.insert("age".into(), self.age.into());
        props.insert(
            "age_at_tumor_recurrence".into(),
            self.age_at_tumour_recurrence.into(),
        );

        let sample = merger.promoter().promote(&key, props)?;
        self.site.merge_under(&sample, merger)?;
        self.histology.merge_under(&sample, merger)?;
        merger
            .resolver()
            .link_from(&EntityKey::Tumor(self.tumor_id), &key)?;
        if let Some(phenotype_id) = &self.phenotype_id {
            merger
                .resolver()
                .link_child(&sample, &EntityKey::Classification(phenotype_id.clone()))?;
        }
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{merger, rel_types};

    fn row(phenotype: &str) -> Row {
        Row::from_pairs(
            2,
            &[
                ("sample_id", "77"),
                ("sample_name", "PD1234a"),
                ("id_tumour", "1001"),
                ("primary_site", "breast"),
                ("whole_genome_screen", "y"),
                ("whole_exome_screen", "n"),
                ("sample_remark", "called \"triple negative\""),
                ("age", "48"),
                ("cosmic_phenotype_id", phenotype),
            ],
        )
    }

    #[test]
    fn parses_flags_and_remarks() {
        let sample = CosmicSample::from_row(&row("12"), &ParseContext::default()).unwrap();
        assert!(sample.whole_genome_screen);
        assert!(!sample.whole_exome_screen);
        assert_eq!(sample.phenotype_id.as_deref(), Some("COSO12"));
        let remark = sample.details["sample_remark"].as_str().unwrap();
        assert!(!remark.contains('"'));
    }

    #[test]
    fn merge_links_tumor_and_classification() {
        let merger = merger();
        let sample = CosmicSample::from_row(&row("12"), &ParseContext::default()).unwrap();
        let key = sample.merge_into(&merger).unwrap();

        assert_eq!(
            rel_types(&merger, &key),
            vec!["HAS_COSMIC_CLASSIFICATION", "HAS_HISTOLOGY_TYPE", "HAS_SITE_TYPE"]
        );
        let tumor = EntityKey::Tumor(1001).node_key();
        assert_eq!(rel_types(&merger, &tumor), vec!["HAS_SAMPLE"]);
        assert!(merger
            .store()
            .node_exists(&EntityKey::Classification("COSO12".into()).node_key())
            .unwrap());
    }

    #[test]
    fn blank_phenotype_adds_no_classification() {
        let merger = merger();
        let sample = CosmicSample::from_row(&row(""), &ParseContext::default()).unwrap();
        let key = sample.merge_into(&merger).unwrap();
        assert!(!rel_types(&merger, &key).contains(&"HAS_COSMIC_CLASSIFICATION".to_string()));
    }
}
