// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Harvested input model.
//!
//! Dataset harvesters flatten their raw annotation files into one [`Record`]
//! per leaf entity (a bounding box, a video, a frame) and collect them into a
//! [`HarvestedSplit`] together with the raw [`SourceNode`] mirror.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Value of a single record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    /// Fixed-arity tuple such as a bounding box.
    Floats(Vec<f64>),
    Text(String),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Floats(_) => "floats",
            FieldValue::Text(_) => "text",
        }
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            FieldValue::Floats(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(v: Vec<f64>) -> Self {
        FieldValue::Floats(v)
    }
}

impl<const N: usize> From<[f64; N]> for FieldValue {
    fn from(v: [f64; N]) -> Self {
        FieldValue::Floats(v.to_vec())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// One harvested leaf entity.
///
/// `keys` maps a key kind (`"class"`, `"image"`, `"video"`, ...) to the raw
/// key value; the builder resolves it to a dense identity through the split's
/// key domains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_key(mut self, kind: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(kind.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn key(&self, kind: &str) -> Option<&str> {
        self.keys.get(kind).map(String::as_str)
    }
}

/// Raw mirror of a dataset's directory/file structure.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    Group(BTreeMap<String, SourceNode>),
    Text(Vec<String>),
}

impl Default for SourceNode {
    fn default() -> Self {
        SourceNode::Group(BTreeMap::new())
    }
}

impl SourceNode {
    /// Insert `leaf` at `path`, creating intermediate groups.
    ///
    /// An existing leaf along the path is replaced by a group.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], leaf: SourceNode) {
        let Some((first, rest)) = path.split_first() else {
            *self = leaf;
            return;
        };
        if let SourceNode::Text(_) = self {
            *self = SourceNode::default();
        }
        if let SourceNode::Group(children) = self {
            children
                .entry(first.as_ref().to_string())
                .or_default()
                .insert(rest, leaf);
        }
    }

    /// Walk to the node at `path`.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&SourceNode> {
        path.iter().try_fold(self, |node, segment| match node {
            SourceNode::Group(children) => children.get(segment.as_ref()),
            SourceNode::Text(_) => None,
        })
    }

    /// Number of text leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            SourceNode::Group(children) => children.values().map(SourceNode::leaf_count).sum(),
            SourceNode::Text(_) => 1,
        }
    }
}

/// Everything harvested for one split.
#[derive(Debug, Clone, Default)]
pub struct HarvestedSplit {
    /// Split name (`train`, `test`, `train01`, ...).
    pub name: String,
    /// Raw mirror persisted under `source/<split>`.
    pub source: SourceNode,
    /// Key values registered before any record, per key kind, in order.
    ///
    /// Used for groups that must own an identity even when no record refers
    /// to them, such as images without any retained object.
    pub declared: BTreeMap<String, Vec<String>>,
    /// Records per table name, in visit order.
    pub records: HashMap<String, Vec<Record>>,
}

impl HarvestedSplit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn declare(&mut self, kind: &str, value: impl Into<String>) {
        self.declared
            .entry(kind.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn push(&mut self, table: &str, record: Record) {
        self.records
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = Record::new()
            .with_field("boxes", [1.0, 2.0, 3.0, 4.0])
            .with_field("id", 7_i64)
            .with_key("class", "person");

        assert_eq!(
            record.field("boxes"),
            Some(&FieldValue::Floats(vec![1.0, 2.0, 3.0, 4.0]))
        );
        assert_eq!(record.field("id"), Some(&FieldValue::Int(7)));
        assert_eq!(record.key("class"), Some("person"));
        assert_eq!(record.key("image"), None);
    }

    #[test]
    fn test_source_insert_creates_groups() {
        let mut root = SourceNode::default();
        root.insert(
            &["set00", "V000", "0", "image_filenames"],
            SourceNode::Text(vec!["a.jpg".to_string()]),
        );
        root.insert(
            &["set00", "V000", "1", "image_filenames"],
            SourceNode::Text(vec!["b.jpg".to_string()]),
        );

        assert_eq!(root.leaf_count(), 2);
        assert_eq!(
            root.get(&["set00", "V000", "1", "image_filenames"]),
            Some(&SourceNode::Text(vec!["b.jpg".to_string()]))
        );
        assert!(root.get(&["set01"]).is_none());
    }

    #[test]
    fn test_field_value_json() {
        let value: FieldValue = serde_json::from_str("[10.0, 20.0, 5.0, 8.0]").unwrap();
        assert_eq!(value.as_floats(), Some(&[10.0, 20.0, 5.0, 8.0][..]));

        let value: FieldValue = serde_json::from_str("3").unwrap();
        assert_eq!(value, FieldValue::Int(3));
    }

    #[test]
    fn test_harvested_split_accumulates() {
        let mut split = HarvestedSplit::new("train");
        split.declare("image", "a.jpg");
        split.declare("image", "b.jpg");
        split.push("objects", Record::new().with_key("image", "a.jpg"));

        assert_eq!(split.declared["image"], vec!["a.jpg", "b.jpg"]);
        assert_eq!(split.record_count(), 1);
    }
}
