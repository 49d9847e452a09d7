// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Hierarchical store writer.
//!
//! Persists one split as two subtrees:
//! - `source/<split>`: raw mirror of the harvested structure
//! - `default/<split>`: field arrays, key tables, `object_ids`,
//!   `object_fields` and the padded `list_*_per_*` indices

use crate::{
    Array, Error, SourceNode,
    store::{self, HierarchicalStore},
    table::SplitTables,
    text,
};
use log::debug;
use std::collections::HashSet;

#[cfg(feature = "profiling")]
use crate::instrument::info_span;

/// Root group of the raw mirrors.
pub const SOURCE_GROUP: &str = "source";
/// Root group of the normalized tables.
pub const DEFAULT_GROUP: &str = "default";

/// Counts reported after writing a split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Arrays written under `default/<split>`.
    pub arrays: usize,
    /// Text leaves written under `source/<split>`.
    pub source_leaves: usize,
}

/// Writes split tables into a [`HierarchicalStore`].
#[derive(Debug, Clone)]
pub struct StoreWriter {
    write_source_mirror: bool,
}

impl Default for StoreWriter {
    fn default() -> Self {
        Self {
            write_source_mirror: true,
        }
    }
}

impl StoreWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the `source/<split>` mirror.
    pub fn with_source_mirror(mut self, enabled: bool) -> Self {
        self.write_source_mirror = enabled;
        self
    }

    /// Replace `source/<split>` and `default/<split>` with the given data.
    ///
    /// Every array is encoded before the store is touched, so a failing split
    /// leaves the previous contents in place. When the source mirror is
    /// disabled any stale `source/<split>` subtree is still removed.
    pub fn write_split<S: HierarchicalStore + ?Sized>(
        &self,
        store: &mut S,
        split: &str,
        source: &SourceNode,
        tables: &SplitTables,
    ) -> Result<WriteSummary, Error> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("write_split", split = %split).entered();

        let source_root = store::join(SOURCE_GROUP, split);
        let default_root = store::join(DEFAULT_GROUP, split);

        let arrays = encode_tables(tables)?;
        let mut mirror = Vec::new();
        if self.write_source_mirror {
            encode_source(&source_root, source, &mut mirror)?;
        }

        store.remove(&source_root)?;
        store.remove(&default_root)?;

        let mut summary = WriteSummary::default();
        for (path, entry) in mirror {
            match entry {
                Some(array) => {
                    store.write_array(&path, array)?;
                    summary.source_leaves += 1;
                }
                None => store.create_group(&path)?,
            }
        }

        store.create_group(&default_root)?;
        for (name, array) in arrays {
            store.write_array(&store::join(&default_root, &name), array)?;
            summary.arrays += 1;
        }

        debug!(
            "Wrote split '{}': {} arrays, {} source leaves",
            split, summary.arrays, summary.source_leaves
        );
        Ok(summary)
    }
}

/// Encode every array of `default/<split>` in write order.
fn encode_tables(tables: &SplitTables) -> Result<Vec<(String, Array)>, Error> {
    for table in &tables.tables {
        table.check_co_indexed()?;
    }

    let mut arrays: Vec<(String, Array)> = Vec::new();
    for table in &tables.tables {
        for field in &table.fields {
            arrays.push((field.name.clone(), field.data.to_array()?));
        }
    }
    for key_table in &tables.key_tables {
        arrays.push((
            key_table.name.clone(),
            Array::U8(text::encode(&key_table.values)?),
        ));
    }
    for table in &tables.tables {
        if let Some(cr) = &table.cross_reference {
            arrays.push((cr.ids_name.clone(), Array::I32(cr.ids.clone())));
            arrays.push((cr.fields_name.clone(), Array::U8(text::encode(&cr.columns)?)));
        }
    }
    for index in &tables.indices {
        arrays.push((index.name.clone(), Array::I32(index.to_matrix()?)));
    }

    let mut names = HashSet::new();
    if let Some((dup, _)) = arrays.iter().find(|(name, _)| !names.insert(name.as_str())) {
        return Err(Error::InvalidInput(format!(
            "Array '{}' is written twice in split '{}'",
            dup, tables.split
        )));
    }

    Ok(arrays)
}

/// Flatten the source mirror into `(path, array)` entries in write order;
/// groups carry no array.
fn encode_source(
    path: &str,
    node: &SourceNode,
    out: &mut Vec<(String, Option<Array>)>,
) -> Result<(), Error> {
    match node {
        SourceNode::Group(children) => {
            out.push((path.to_string(), None));
            for (name, child) in children {
                encode_source(&store::join(path, name), child, out)?;
            }
        }
        SourceNode::Text(values) => {
            out.push((path.to_string(), Some(Array::U8(text::encode(values)?))));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        FieldValue, HarvestedSplit, MemoryStore, Record, pad,
        schema::{CrossReference, DatasetSchema, FieldSpec, IndexSpec, KeyDomain, Member, ObjectColumn, TableSchema},
        table::{FieldArray, FieldData, build_split},
    };

    fn schema() -> DatasetSchema {
        DatasetSchema::new("recognition")
            .domain(KeyDomain::closed("activity", ["diving", "golf_swing"]).persist_as("activities"))
            .table(
                TableSchema::new("videos")
                    .field(FieldSpec::text("videos"))
                    .field(FieldSpec::int("total_frames"))
                    .cross_reference(CrossReference::new([
                        ("videos", ObjectColumn::Row),
                        ("activities", ObjectColumn::Key("activity".into())),
                    ])),
            )
            .index(IndexSpec::new(
                "list_videos_per_activity",
                "videos",
                "activity",
                Member::Row,
            ))
    }

    fn split() -> HarvestedSplit {
        let mut split = HarvestedSplit::new("train01");
        split.push(
            "videos",
            Record::new()
                .with_field("videos", "Diving-Side/001")
                .with_field("total_frames", FieldValue::Int(55))
                .with_key("activity", "diving"),
        );
        split.source.insert(
            &["diving", "Diving-Side", "001", "image_filenames"],
            SourceNode::Text(vec!["a.jpg".into(), "b.jpg".into()]),
        );
        split
    }

    #[test]
    fn test_write_split_layout() {
        let schema = schema();
        let harvested = split();
        let source = harvested.source.clone();
        let tables = build_split(&schema, harvested).unwrap();

        let mut store = MemoryStore::new();
        let summary = StoreWriter::new()
            .write_split(&mut store, "train01", &source, &tables)
            .unwrap();

        assert_eq!(summary.arrays, schema.array_names().len());
        assert_eq!(summary.source_leaves, 1);
        assert_eq!(
            store.children("default/train01").unwrap(),
            vec![
                "activities",
                "list_videos_per_activity",
                "object_fields",
                "object_ids",
                "total_frames",
                "videos"
            ]
        );

        let index = store
            .read_array("default/train01/list_videos_per_activity")
            .unwrap();
        assert_eq!(
            pad::unpad(index.as_i32().unwrap(), pad::SENTINEL),
            vec![vec![0], vec![]]
        );
        let fields = store.read_array("default/train01/object_fields").unwrap();
        assert_eq!(
            text::decode(fields.as_u8().unwrap()).unwrap(),
            vec!["videos", "activities"]
        );
        let frames = store.read_array("default/train01/image_filenames");
        assert!(frames.is_err());
        assert!(
            store
                .read_array("source/train01/diving/Diving-Side/001/image_filenames")
                .is_ok()
        );
    }

    #[test]
    fn test_full_replace() {
        let schema = schema();
        let mut store = MemoryStore::new();
        store
            .write_array("default/train01/stale", Array::I32(crate::Matrix::column(vec![1])))
            .unwrap();
        store.create_group("source/train01/stale").unwrap();

        let harvested = split();
        let tables = build_split(&schema, harvested).unwrap();
        StoreWriter::new()
            .with_source_mirror(false)
            .write_split(&mut store, "train01", &SourceNode::default(), &tables)
            .unwrap();

        assert!(store.read_array("default/train01/stale").is_err());
        assert!(!store.is_group("source/train01"));
        assert!(store.read_array("default/train01/videos").is_ok());
    }

    #[test]
    fn test_schema_mismatch_aborts_before_writing() {
        let schema = schema();
        let mut tables = build_split(&schema, split()).unwrap();
        tables.tables[0].fields.push(FieldArray {
            name: "extra".to_string(),
            data: FieldData::Int(vec![]),
        });

        let mut store = MemoryStore::new();
        let err = StoreWriter::new()
            .write_split(&mut store, "train01", &SourceNode::default(), &tables)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_bad_source_leaf_keeps_previous_split() {
        let schema = schema();
        let tables = build_split(&schema, split()).unwrap();

        let mut store = MemoryStore::new();
        store
            .write_array("default/train01/old", Array::I32(crate::Matrix::column(vec![1])))
            .unwrap();
        store
            .write_array("source/train01/old", Array::I32(crate::Matrix::column(vec![2])))
            .unwrap();

        let mut source = SourceNode::default();
        source.insert(&["videos"], SourceNode::Text(vec!["bad\0name".into()]));
        let err = StoreWriter::new()
            .write_split(&mut store, "train01", &source, &tables)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store.read_array("default/train01/old").is_ok());
        assert!(store.read_array("source/train01/old").is_ok());
        assert!(store.read_array("default/train01/videos").is_err());
    }

    #[test]
    fn test_duplicate_array_name() {
        let schema = schema();
        let mut tables = build_split(&schema, split()).unwrap();
        let videos = tables.tables[0].clone();
        tables.tables.push(videos);

        let mut store = MemoryStore::new();
        let err = StoreWriter::new()
            .write_split(&mut store, "train01", &SourceNode::default(), &tables)
            .unwrap_err();
        assert!(err.to_string().contains("written twice"));
    }
}
