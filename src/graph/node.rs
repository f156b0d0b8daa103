//! Node representation in the property graph

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Property set on every node and relationship when it is first created
pub const CREATED_AT: &str = "created_at";

/// Property refreshed every time a promotion matches an existing node
pub const LAST_MODIFIED_AT: &str = "last_modified_at";

/// Typed property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        PropertyValue::Array(values.into_iter().map(PropertyValue::String).collect())
    }
}

/// Properties collection
///
/// Ordered so that serialized property maps (and therefore relationship
/// identities) are stable across runs.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Value of a node's business key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValue::Int(i) => write!(f, "{}", i),
            KeyValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&KeyValue> for PropertyValue {
    fn from(value: &KeyValue) -> Self {
        match value {
            KeyValue::Int(i) => PropertyValue::Int(*i),
            KeyValue::Str(s) => PropertyValue::String(s.clone()),
        }
    }
}

/// Identity of a node: primary label, key property name and key value.
///
/// Two `NodeKey`s that compare equal always address the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub label: String,
    pub property: String,
    pub value: KeyValue,
}

impl NodeKey {
    pub fn new(label: impl Into<String>, property: impl Into<String>, value: KeyValue) -> Self {
        Self {
            label: label.into(),
            property: property.into(),
            value,
        }
    }

    /// Canonical storage identifier, e.g. `CosmicTumor:tumor_id:42`
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.label, self.property, self.value)
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}.{}={})", self.label, self.property, self.value)
    }
}

/// A node in the property graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub key: NodeKey,
    /// All labels, the primary label included
    pub labels: BTreeSet<String>,
    pub properties: Properties,
}

impl Node {
    /// A bare node holding only its key property
    pub fn new(key: NodeKey) -> Self {
        let mut properties = Properties::new();
        properties.insert(key.property.clone(), PropertyValue::from(&key.value));
        let mut labels = BTreeSet::new();
        labels.insert(key.label.clone());
        Self {
            key,
            labels,
            properties,
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }

    pub fn get_str(&self, property: &str) -> Option<&str> {
        self.get(property).and_then(PropertyValue::as_str)
    }

    /// True while the node carries nothing beyond its key and creation stamp.
    pub fn is_skeleton(&self) -> bool {
        self.properties
            .keys()
            .all(|name| name == &self.key.property || name == CREATED_AT)
    }
}
