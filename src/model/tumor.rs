use super::{properties, CosmicRecord, ParseContext, Taxonomy};
use crate::graph::NodeKey;
use crate::resolve::{EntityKey, GraphMerger, MergeResult};
use crate::source::{RecordError, Row};

/// A tumor row, also embedded in every mutation row
#[derive(Debug, Clone, PartialEq)]
pub struct CosmicTumor {
    pub tumor_id: i64,
    pub sample_id: i64,
    pub site: Taxonomy,
    pub histology: Taxonomy,
    pub tumor_origin: String,
    pub age: i64,
}

impl CosmicTumor {
    pub fn key(&self) -> EntityKey {
        EntityKey::Tumor(self.tumor_id)
    }
}

impl CosmicRecord for CosmicTumor {
    const KIND: &'static str = "tumor";

    fn from_row(row: &Row, _ctx: &ParseContext) -> Result<Self, RecordError> {
        Ok(Self {
            tumor_id: row.required_int("ID_tumour")?,
            sample_id: row.required_int("ID_sample")?,
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
            tumor_origin: row.text("Tumour origin"),
            age: row.int_or_zero("Age"),
        })
    }

    fn merge_into(&self, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let props = properties([
            ("tumor_origin", self.tumor_origin.as_str().into()),
            ("age", self.age.into()),
        ]);
        let tumor = merger.promoter().promote(&self.key(), props)?;
        self.site.merge_under(&tumor, merger)?;
        self.histology.merge_under(&tumor, merger)?;
        merger
            .resolver()
            .link_child(&tumor, &EntityKey::Sample(self.sample_id))?;
        Ok(tumor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{merger, rel_types};

    fn row() -> Row {
        Row::from_pairs(
            2,
            &[
                ("ID_tumour", "1001"),
                ("ID_sample", "2002"),
                ("Primary site", "lung"),
                ("Site subtype 1", "upper lobe"),
                ("Primary histology", "carcinoma"),
                ("Tumour origin", "primary"),
                ("Age", "63"),
            ],
        )
    }

    #[test]
    fn parses_tumor_columns() {
        let tumor = CosmicTumor::from_row(&row(), &ParseContext::default()).unwrap();
        assert_eq!(tumor.tumor_id, 1001);
        assert_eq!(tumor.sample_id, 2002);
        assert_eq!(tumor.site.subtypes[0], "upper lobe");
        assert_eq!(tumor.histology.subtypes[2], "NS");
        assert_eq!(tumor.age, 63);
    }

    #[test]
    fn merge_links_sample_and_types() {
        let merger = merger();
        let tumor = CosmicTumor::from_row(&row(), &ParseContext::default()).unwrap();
        let key = tumor.merge_into(&merger).unwrap();

        assert_eq!(
            rel_types(&merger, &key),
            vec!["HAS_HISTOLOGY_TYPE", "HAS_SAMPLE", "HAS_SITE_TYPE"]
        );
        assert!(merger
            .store()
            .is_incomplete(&EntityKey::Sample(2002).node_key())
            .unwrap());
        let node = merger.store().load_node(&key).unwrap().unwrap();
        assert_eq!(node.get("age").and_then(|v| v.as_int()), Some(63));
    }

    #[test]
    fn missing_tumor_id_is_malformed() {
        let row = Row::from_pairs(5, &[("ID_sample", "1")]);
        assert!(CosmicTumor::from_row(&row, &ParseContext::default()).is_err());
    }
}
