//! Entity identity
//!
//! Every entity kind has one primary label and one key property. An
//! [`EntityKey`] pairs a kind with its key value and is the only way the rest
//! of the crate addresses a node.

use crate::graph::{has_relationship, KeyValue, NodeKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for content-derived keys (CosmicType, Classification fallbacks)
const COSMIC_NAMESPACE: Uuid = Uuid::from_u128(0x6c0f_2d4e_8b1a_4f3c_9e57_c05a_1c6d_b7e2);

/// Label shared by every annotation node
pub const ANNOTATION_LABEL: &str = "CosmicAnnotation";

/// Placeholder for a missing taxonomy level
pub const NOT_SPECIFIED: &str = "NS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Gene,
    Tumor,
    Sample,
    Mutation,
    Hgnc,
    Entrez,
    Classification,
    CosmicType,
    PubMedArticle,
    Drug,
    HallmarkCollection,
    Hallmark,
    Breakpoint,
    CompleteCna,
    DiffMethylation,
    DrugResistance,
    Annotation,
}

impl EntityKind {
    /// Every kind with a fixed primary label
    pub const LABELLED: [EntityKind; 16] = [
        EntityKind::Gene,
        EntityKind::Tumor,
        EntityKind::Sample,
        EntityKind::Mutation,
        EntityKind::Hgnc,
        EntityKind::Entrez,
        EntityKind::Classification,
        EntityKind::CosmicType,
        EntityKind::PubMedArticle,
        EntityKind::Drug,
        EntityKind::HallmarkCollection,
        EntityKind::Hallmark,
        EntityKind::Breakpoint,
        EntityKind::CompleteCna,
        EntityKind::DiffMethylation,
        EntityKind::DrugResistance,
    ];

    /// Primary label. Annotation nodes use their secondary label instead.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Gene => "CosmicGene",
            EntityKind::Tumor => "CosmicTumor",
            EntityKind::Sample => "CosmicSample",
            EntityKind::Mutation => "CosmicMutation",
            EntityKind::Hgnc => "CosmicHGNC",
            EntityKind::Entrez => "Entrez",
            EntityKind::Classification => "CosmicClassification",
            EntityKind::CosmicType => "CosmicType",
            EntityKind::PubMedArticle => "PubMedArticle",
            EntityKind::Drug => "CosmicDrug",
            EntityKind::HallmarkCollection => "CosmicHallmarkCollection",
            EntityKind::Hallmark => "CosmicHallmark",
            EntityKind::Breakpoint => "CosmicBreakpoint",
            EntityKind::CompleteCna => "CosmicCompleteCNA",
            EntityKind::DiffMethylation => "CosmicDiffMethylation",
            EntityKind::DrugResistance => "DrugResistance",
            EntityKind::Annotation => ANNOTATION_LABEL,
        }
    }

    pub fn key_property(&self) -> &'static str {
        match self {
            EntityKind::Gene | EntityKind::HallmarkCollection => "gene_symbol",
            EntityKind::Tumor => "tumor_id",
            EntityKind::Sample => "sample_id",
            EntityKind::Mutation => "mutation_id",
            EntityKind::Hgnc => "hgnc_id",
            EntityKind::Entrez => "entrez_id",
            EntityKind::Classification => "phenotype_id",
            EntityKind::CosmicType => "cosmic_type_id",
            EntityKind::PubMedArticle => "pubmed_id",
            EntityKind::Drug => "drug_name",
            EntityKind::Hallmark => "hallmark_id",
            EntityKind::Breakpoint => "breakpoint_id",
            EntityKind::CompleteCna => "cna_id",
            EntityKind::DiffMethylation => "methylation_id",
            EntityKind::DrugResistance => "resistance_id",
            EntityKind::Annotation => "annotation_value",
        }
    }

    /// Role name used in `HAS_<ROLE>` relationships pointing at this kind
    pub fn role(&self) -> &'static str {
        match self {
            EntityKind::Gene => "gene",
            EntityKind::Tumor => "tumor",
            EntityKind::Sample => "sample",
            EntityKind::Mutation => "mutation",
            EntityKind::Hgnc => "hgnc",
            EntityKind::Entrez => "entrez",
            EntityKind::Classification => "cosmic_classification",
            EntityKind::CosmicType => "type",
            EntityKind::PubMedArticle => "pubmed_article",
            EntityKind::Drug => "drug",
            EntityKind::HallmarkCollection => "hallmark_collection",
            EntityKind::Hallmark => "hallmark",
            EntityKind::Breakpoint => "breakpoint",
            EntityKind::CompleteCna => "completecna",
            EntityKind::DiffMethylation => "diffmethylation",
            EntityKind::DrugResistance => "drugresistance",
            EntityKind::Annotation => "annotation",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Stable identity of one entity
///
/// Natural keys come straight from source rows. `CosmicType` keys are
/// derived from the taxonomy tuple, so identical tuples always resolve to the
/// same node. The remaining UUID-keyed kinds have no natural key and are never
/// the target of a forward reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    Gene(String),
    Tumor(i64),
    Sample(i64),
    Mutation(i64),
    Hgnc(i64),
    Entrez(i64),
    Classification(String),
    CosmicType { label: String, id: Uuid },
    PubMedArticle(String),
    Drug(String),
    HallmarkCollection(String),
    Hallmark(Uuid),
    Breakpoint(Uuid),
    CompleteCna(Uuid),
    DiffMethylation(Uuid),
    DrugResistance(Uuid),
    Annotation { label: String, value: String },
}

impl EntityKey {
    pub fn gene(symbol: impl Into<String>) -> Self {
        EntityKey::Gene(symbol.into())
    }

    pub fn pubmed(id: impl Into<String>) -> Self {
        EntityKey::PubMedArticle(id.into())
    }

    /// Drug names are case-folded so "Imatinib" and "imatinib" are one node.
    pub fn drug(name: &str) -> Self {
        EntityKey::Drug(name.trim().to_lowercase())
    }

    pub fn annotation(label: impl Into<String>, value: impl Into<String>) -> Self {
        EntityKey::Annotation {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Content-derived key for a taxonomy leaf.
    ///
    /// Missing subtypes are normalized to `NS` before hashing so that a blank
    /// column and an explicit `NS` resolve to the same node.
    pub fn cosmic_type(label: &str, primary: &str, subtypes: [&str; 3]) -> Self {
        let level = |s: &str| {
            let s = s.trim();
            if s.is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                s.to_string()
            }
        };
        let tuple = format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
            label,
            level(primary),
            level(subtypes[0]),
            level(subtypes[1]),
            level(subtypes[2])
        );
        EntityKey::CosmicType {
            label: label.to_string(),
            id: Uuid::new_v5(&COSMIC_NAMESPACE, tuple.as_bytes()),
        }
    }

    pub fn new_hallmark() -> Self {
        EntityKey::Hallmark(Uuid::new_v4())
    }

    pub fn new_breakpoint() -> Self {
        EntityKey::Breakpoint(Uuid::new_v4())
    }

    pub fn new_complete_cna() -> Self {
        EntityKey::CompleteCna(Uuid::new_v4())
    }

    pub fn new_diff_methylation() -> Self {
        EntityKey::DiffMethylation(Uuid::new_v4())
    }

    pub fn new_drug_resistance() -> Self {
        EntityKey::DrugResistance(Uuid::new_v4())
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Gene(_) => EntityKind::Gene,
            EntityKey::Tumor(_) => EntityKind::Tumor,
            EntityKey::Sample(_) => EntityKind::Sample,
            EntityKey::Mutation(_) => EntityKind::Mutation,
            EntityKey::Hgnc(_) => EntityKind::Hgnc,
            EntityKey::Entrez(_) => EntityKind::Entrez,
            EntityKey::Classification(_) => EntityKind::Classification,
            EntityKey::CosmicType { .. } => EntityKind::CosmicType,
            EntityKey::PubMedArticle(_) => EntityKind::PubMedArticle,
            EntityKey::Drug(_) => EntityKind::Drug,
            EntityKey::HallmarkCollection(_) => EntityKind::HallmarkCollection,
            EntityKey::Hallmark(_) => EntityKind::Hallmark,
            EntityKey::Breakpoint(_) => EntityKind::Breakpoint,
            EntityKey::CompleteCna(_) => EntityKind::CompleteCna,
            EntityKey::DiffMethylation(_) => EntityKind::DiffMethylation,
            EntityKey::DrugResistance(_) => EntityKind::DrugResistance,
            EntityKey::Annotation { .. } => EntityKind::Annotation,
        }
    }

    fn value(&self) -> KeyValue {
        match self {
            EntityKey::Tumor(id)
            | EntityKey::Sample(id)
            | EntityKey::Mutation(id)
            | EntityKey::Hgnc(id)
            | EntityKey::Entrez(id) => KeyValue::Int(*id),
            EntityKey::Gene(s)
            | EntityKey::Classification(s)
            | EntityKey::PubMedArticle(s)
            | EntityKey::Drug(s)
            | EntityKey::HallmarkCollection(s) => KeyValue::Str(s.clone()),
            EntityKey::CosmicType { id, .. } => KeyValue::Str(id.to_string()),
            EntityKey::Hallmark(id)
            | EntityKey::Breakpoint(id)
            | EntityKey::CompleteCna(id)
            | EntityKey::DiffMethylation(id)
            | EntityKey::DrugResistance(id) => KeyValue::Str(id.to_string()),
            EntityKey::Annotation { value, .. } => KeyValue::Str(value.clone()),
        }
    }

    /// Storage key of the node this entity resolves to
    pub fn node_key(&self) -> NodeKey {
        let kind = self.kind();
        let label = match self {
            EntityKey::Annotation { label, .. } => label.clone(),
            _ => kind.label().to_string(),
        };
        NodeKey::new(label, kind.key_property(), self.value())
    }

    /// Labels carried in addition to the primary label
    pub fn extra_labels(&self) -> Vec<String> {
        match self {
            EntityKey::CosmicType { label, .. } => vec![label.clone()],
            EntityKey::Annotation { .. } => vec![ANNOTATION_LABEL.to_string()],
            _ => Vec::new(),
        }
    }

    /// Relationship type used when a parent points at this entity
    pub fn has_relationship(&self) -> String {
        match self {
            EntityKey::CosmicType { label, .. } => format!("HAS_{}_TYPE", label.to_uppercase()),
            EntityKey::Annotation { label, .. } => has_relationship(label),
            other => has_relationship(other.kind().role()),
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.node_key())
    }
}
