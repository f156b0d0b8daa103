//! Site, histology and mutation taxonomy leaves
//!
//! A taxonomy is a primary term plus up to three subtype levels. The node is
//! keyed by the content of all four levels, so every parent with the same
//! taxonomy points at the same `CosmicType` node.

use crate::graph::{NodeKey, Properties};
use crate::resolve::{EntityKey, GraphMerger, MergeResult, NOT_SPECIFIED};
use crate::source::Row;

#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    pub label: &'static str,
    pub primary: String,
    pub subtypes: [String; 3],
}

fn level(value: String) -> String {
    if value.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        value
    }
}

impl Taxonomy {
    pub fn new(label: &'static str, primary: &str, subtypes: [&str; 3]) -> Self {
        Self {
            label,
            primary: level(primary.trim().to_string()),
            subtypes: subtypes.map(|s| level(s.trim().to_string())),
        }
    }

    /// A single-level taxonomy, e.g. a mutation type
    pub fn single(label: &'static str, primary: &str) -> Self {
        Self::new(label, primary, ["", "", ""])
    }

    /// Read a primary column and three subtype columns.
    pub fn from_row(row: &Row, label: &'static str, primary: &str, subtypes: [&str; 3]) -> Self {
        Self {
            label,
            primary: level(row.text(primary)),
            subtypes: subtypes.map(|column| level(row.text(column))),
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::cosmic_type(
            self.label,
            &self.primary,
            [&self.subtypes[0], &self.subtypes[1], &self.subtypes[2]],
        )
    }

    fn properties(&self) -> Properties {
        super::properties([
            ("primary", self.primary.as_str().into()),
            ("subtype1", self.subtypes[0].as_str().into()),
            ("subtype2", self.subtypes[1].as_str().into()),
            ("subtype3", self.subtypes[2].as_str().into()),
        ])
    }

    /// Promote the type node and link `parent -[HAS_<LABEL>_TYPE]->` to it.
    pub fn merge_under(&self, parent: &NodeKey, merger: &GraphMerger) -> MergeResult<NodeKey> {
        let key = self.key();
        let type_key = merger.promoter().promote(&key, self.properties())?;
        merger.resolver().relate(
            parent,
            &key.has_relationship(),
            &type_key,
            Properties::new(),
        )?;
        Ok(type_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn blank_levels_are_not_specified() {
        let row = Row::from_pairs(2, &[("Primary site", "lung"), ("Site subtype 1", "")]);
        let site = Taxonomy::from_row(
            &row,
            "Site",
            "Primary site",
            ["Site subtype 1", "Site subtype 2", "Site subtype 3"],
        );
        assert_eq!(site, Taxonomy::new("Site", "lung", ["NS", "NS", "NS"]));
    }

    #[test]
    fn identical_taxonomies_share_a_node() {
        let merger = GraphMerger::new(Arc::new(MemoryStore::new()));
        let a = merger.promoter().promote(&EntityKey::Tumor(1), Properties::new()).unwrap();
        let b = merger.promoter().promote(&EntityKey::Tumor(2), Properties::new()).unwrap();
        let site = Taxonomy::new("Site", "skin", ["acral", "", ""]);

        let first = site.merge_under(&a, &merger).unwrap();
        let second = site.merge_under(&b, &merger).unwrap();
        assert_eq!(first, second);
        assert_eq!(merger.store().count_nodes().unwrap(), 3);

        let edges = merger.store().edges_to(&first).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.rel_type == "HAS_SITE_TYPE"));
    }
}
