use super::{properties, CosmicRecord, ParseContext, Taxonomy};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// Maps a COSMIC phenotype id onto site and histology taxonomies
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicClassification {
    pub phenotype_id: String,
    pub nci_code: String,
    pub efo_url: String,
    pub site: Taxonomy,
    pub histology: Taxonomy,
    pub cosmic_site: Taxonomy,
}

impl CosmicRecord for CosmicClassification {
    const KIND: &'static str = "classification";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            phenotype_id: row.required_str("COSMIC_PHENOTYPE_ID")?,
            nci_code: row.text("NCI_CODE"),
            efo_url: row.text("EFO"),
            site: Taxonomy::from_row(
                row,
                "Site",
                "SITE_PRIMARY",
                ["SITE_SUBTYPE1", "SITE_SUBTYPE2", "SITE_SUBTYPE3"],
            ),
            histology: Taxonomy::from_row(
                row,
                "Histology",
                "HISTOLOGY",
                ["HIST_SUBTYPE1", "HIST_SUBTYPE2", "HIST_SUBTYPE3"],
            ),
            cosmic_site: Taxonomy::from_row(
                row,
                "CosmicSite",
                "SITE_PRIMARY_COSMIC",
                [
                    "SITE_SUBTYPE1_COSMIC",
                    "SITE_SUBTYPE2_COSMIC",
                    "SITE_SUBTYPE3_COSMIC",
                ],
            ),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("nci_code", self.nci_code.as_str().into()),
            ("efo_url", self.efo_url.as_str().into()),
        ]);
        let classification = merger
            .promoter()
            .promote(&EntityKey::Classification(self.phenotype_id.clone()), props)?;
        self.site.merge_under(&classification, merger)?;
        self.histology.merge_under(&classification, merger)?;
        self.cosmic_site.merge_under(&classification, merger)?;
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{merger, rel_types};

    #[test]
    fn classification_promotes_sample_reference() {
        let merger = merger();
        merger
            .resolver()
            .ensure_skeleton(&EntityKey::Classification("COSO29914".into()))
            .unwrap();

        let row = Row::from_pairs(
            2,
            &[
                ("COSMIC_PHENOTYPE_ID", "COSO29914"),
                ("NCI_CODE", "C3224"),
                ("EFO", "http://www.ebi.ac.uk/efo/EFO_0000756"),
                ("SITE_PRIMARY", "skin"),
                ("HISTOLOGY", "malignant_melanoma"),
                ("SITE_PRIMARY_COSMIC", "skin"),
            ],
        );
        let classification = CosmicClassification::from_row(&row, &ParseContext::default()).unwrap();
        let key = classification.merge_into(&merger).unwrap();

        assert_eq!(
            rel_types(&merger, &key),
            vec!["HAS_COSMICSITE_TYPE", "HAS_HISTOLOGY_TYPE", "HAS_SITE_TYPE"]
        );
        assert!(!merger.store().is_incomplete(&key).unwrap());
        // site and cosmic site share content but differ in label
        assert_eq!(merger.store().count_nodes().unwrap(), 4);
    }
}
