// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Object table builder.
//!
//! Turns one split's harvested records into co-indexed field arrays, the
//! `object_ids` cross-reference matrix, persisted key tables and reverse
//! indices. Identities are dense and assigned in visit order; grouping keys
//! are de-duplicated through split-wide key domains.

use crate::{
    Array, Error, FieldValue, HarvestedSplit, Matrix, Record,
    index::{self, ReverseIndex},
    pad::SENTINEL,
    schema::{DatasetSchema, FieldKind, FieldSpec, ObjectColumn, TableSchema, Universe},
    text,
};
use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "profiling")]
use crate::instrument::info_span;

/// Values of one field across all entities of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Int(Vec<i32>),
    Float(Vec<f64>),
    /// Row-major tuples of `arity` values each.
    Floats { arity: usize, values: Vec<f64> },
    Text(Vec<String>),
}

impl FieldData {
    fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Int => FieldData::Int(Vec::new()),
            FieldKind::Float => FieldData::Float(Vec::new()),
            FieldKind::Floats(arity) => FieldData::Floats {
                arity,
                values: Vec::new(),
            },
            FieldKind::Text => FieldData::Text(Vec::new()),
        }
    }

    /// Number of entities stored.
    pub fn len(&self) -> usize {
        match self {
            FieldData::Int(v) => v.len(),
            FieldData::Float(v) => v.len(),
            FieldData::Floats { arity, values } => values.len() / (*arity).max(1),
            FieldData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, value: &FieldValue) -> Result<(), String> {
        match (self, value) {
            (FieldData::Int(v), FieldValue::Int(x)) => {
                let x = i32::try_from(*x).map_err(|_| format!("{} does not fit in i32", x))?;
                v.push(x);
            }
            (FieldData::Float(v), FieldValue::Float(x)) => v.push(*x),
            (FieldData::Float(v), FieldValue::Int(x)) => v.push(*x as f64),
            (FieldData::Floats { arity, values }, FieldValue::Floats(x)) => {
                if x.len() != *arity {
                    return Err(format!("expected {} values, got {}", arity, x.len()));
                }
                values.extend_from_slice(x);
            }
            (FieldData::Text(v), FieldValue::Text(x)) => v.push(x.clone()),
            (data, value) => {
                return Err(format!(
                    "expected {}, got {}",
                    data.kind_name(),
                    value.kind_name()
                ));
            }
        }
        Ok(())
    }

    fn kind_name(&self) -> &'static str {
        match self {
            FieldData::Int(_) => "int",
            FieldData::Float(_) => "float",
            FieldData::Floats { .. } => "floats",
            FieldData::Text(_) => "text",
        }
    }

    /// Store representation: `N × 1` for scalars, `N × arity` for tuples and
    /// a text matrix for strings.
    pub fn to_array(&self) -> Result<Array, Error> {
        Ok(match self {
            FieldData::Int(v) => Array::I32(Matrix::column(v.clone())),
            FieldData::Float(v) => Array::F64(Matrix::column(v.clone())),
            FieldData::Floats { arity, values } => {
                Array::F64(Matrix::from_vec(self.len(), *arity, values.clone())?)
            }
            FieldData::Text(v) => Array::U8(text::encode(v)?),
        })
    }
}

/// A named field array.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArray {
    pub name: String,
    pub data: FieldData,
}

/// The `object_ids` matrix plus the names of its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossReferenceTable {
    pub ids_name: String,
    pub fields_name: String,
    pub columns: Vec<String>,
    pub ids: Matrix<i32>,
}

/// Field arrays of one entity kind, co-indexed by entity identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTable {
    pub name: String,
    /// Number of retained entities.
    pub len: usize,
    pub fields: Vec<FieldArray>,
    pub cross_reference: Option<CrossReferenceTable>,
    /// Key identity per row for every key kind used by the table's records;
    /// [`SENTINEL`] where a record lacks that key.
    pub keys: BTreeMap<String, Vec<i32>>,
}

impl ObjectTable {
    pub fn field(&self, name: &str) -> Option<&FieldData> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.data)
    }

    pub fn key_column(&self, kind: &str) -> Option<&[i32]> {
        self.keys.get(kind).map(Vec::as_slice)
    }

    /// Entity identities `0..len`.
    pub fn identities(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.len).map(|i| i as i32)
    }

    /// Verify the co-indexing invariant: every field array has `len` rows.
    pub fn check_co_indexed(&self) -> Result<(), Error> {
        let mut lengths: Vec<(&str, usize)> = self
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.data.len()))
            .collect();
        lengths.extend(self.keys.iter().map(|(k, v)| (k.as_str(), v.len())));
        if let Some(cr) = &self.cross_reference {
            lengths.push((cr.ids_name.as_str(), cr.ids.rows()));
        }

        match lengths.into_iter().find(|(_, n)| *n != self.len) {
            Some((field, found)) => Err(Error::SchemaMismatch {
                table: self.name.clone(),
                field: field.to_string(),
                expected: self.len,
                found,
            }),
            None => Ok(()),
        }
    }
}

/// Persisted list of key values; row `k` is the value of key identity `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyTable {
    pub name: String,
    pub kind: String,
    pub values: Vec<String>,
}

/// Everything written under `default/<split>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitTables {
    pub split: String,
    pub tables: Vec<ObjectTable>,
    pub key_tables: Vec<KeyTable>,
    pub indices: Vec<ReverseIndex>,
}

impl SplitTables {
    pub fn table(&self, name: &str) -> Option<&ObjectTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn index(&self, name: &str) -> Option<&ReverseIndex> {
        self.indices.iter().find(|i| i.name == name)
    }

    pub fn key_table(&self, kind: &str) -> Option<&KeyTable> {
        self.key_tables.iter().find(|k| k.kind == kind)
    }
}

fn identity(n: usize, what: &str) -> Result<i32, Error> {
    i32::try_from(n)
        .map_err(|_| Error::InvalidInput(format!("Too many {} for i32 identities: {}", what, n)))
}

/// Identity assignment for one key kind.
#[derive(Debug)]
struct KeyDomainState {
    closed: bool,
    values: Vec<String>,
    lookup: HashMap<String, i32>,
}

impl KeyDomainState {
    fn new(universe: &Universe) -> Result<Self, Error> {
        let mut state = Self {
            closed: false,
            values: Vec::new(),
            lookup: HashMap::new(),
        };
        if let Universe::Closed(values) = universe {
            for value in values {
                state.insert(value)?;
            }
            state.closed = true;
        }
        Ok(state)
    }

    fn insert(&mut self, value: &str) -> Result<i32, Error> {
        let id = identity(self.values.len(), "key values")?;
        self.values.push(value.to_string());
        self.lookup.insert(value.to_string(), id);
        Ok(id)
    }

    fn resolve(&mut self, kind: &str, value: &str) -> Result<i32, Error> {
        if let Some(&id) = self.lookup.get(value) {
            return Ok(id);
        }
        if self.closed {
            return Err(Error::InvalidInput(format!(
                "Key '{}' value '{}' is not part of its universe",
                kind, value
            )));
        }
        self.insert(value)
    }
}

/// Builds the tables of one split.
///
/// A builder is created per split and consumed by [`SplitBuilder::finish`];
/// nothing is shared between splits.
pub struct SplitBuilder<'a> {
    schema: &'a DatasetSchema,
    domains: BTreeMap<String, KeyDomainState>,
    tables: Vec<ObjectTable>,
}

impl<'a> SplitBuilder<'a> {
    pub fn new(schema: &'a DatasetSchema) -> Result<Self, Error> {
        let domains = schema
            .domains
            .iter()
            .map(|d| Ok((d.kind.clone(), KeyDomainState::new(&d.universe)?)))
            .collect::<Result<_, Error>>()?;
        Ok(Self {
            schema,
            domains,
            tables: Vec::new(),
        })
    }

    fn domain(&mut self, kind: &str) -> Result<&mut KeyDomainState, Error> {
        self.domains
            .get_mut(kind)
            .ok_or_else(|| Error::InvalidInput(format!("Undefined key kind '{}'", kind)))
    }

    /// Register a key value ahead of any record, returning its identity.
    pub fn declare(&mut self, kind: &str, value: &str) -> Result<i32, Error> {
        self.domain(kind)?.resolve(kind, value)
    }

    /// Build one object table from its records, in visit order.
    ///
    /// Records rejected by the table filter never receive an identity. The
    /// transform runs on retained records before their fields are stored.
    pub fn build_table(
        &mut self,
        schema: &TableSchema,
        records: Vec<Record>,
    ) -> Result<&ObjectTable, Error> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("build_table", table = %schema.name).entered();

        let mut fields: Vec<FieldArray> = schema
            .fields
            .iter()
            .map(|f| FieldArray {
                name: f.name.clone(),
                data: FieldData::for_kind(f.kind),
            })
            .collect();
        let mut row_keys: Vec<BTreeMap<String, i32>> = Vec::with_capacity(records.len());
        let mut dropped = 0usize;
        let total = records.len();

        for (index, record) in records.into_iter().enumerate() {
            if let Some(filter) = &schema.filter
                && !filter(&record)
            {
                dropped += 1;
                continue;
            }
            let record = match &schema.transform {
                Some(transform) => transform(record).map_err(|e| {
                    Error::InvalidInput(format!(
                        "Table '{}' record {}: {}",
                        schema.name, index, e
                    ))
                })?,
                None => record,
            };

            let row = row_keys.len();
            for (spec, array) in schema.fields.iter().zip(fields.iter_mut()) {
                let value = field_value(spec, &record).map_err(|e| {
                    Error::InvalidInput(format!(
                        "Table '{}' entity {} (record {}): {}",
                        schema.name, row, index, e
                    ))
                })?;
                array.data.push(value).map_err(|e| {
                    Error::InvalidInput(format!(
                        "Table '{}' entity {} (record {}) field '{}': {}",
                        schema.name, row, index, spec.name, e
                    ))
                })?;
            }

            let mut keys = BTreeMap::new();
            for (kind, value) in &record.keys {
                let id = self.domain(kind)?.resolve(kind, value).map_err(|e| {
                    Error::InvalidInput(format!(
                        "Table '{}' entity {} (record {}): {}",
                        schema.name, row, index, e
                    ))
                })?;
                keys.insert(kind.clone(), id);
            }
            row_keys.push(keys);
        }

        let len = row_keys.len();
        identity(len, "entities")?;

        let mut keys: BTreeMap<String, Vec<i32>> = BTreeMap::new();
        for (row, row_key) in row_keys.iter().enumerate() {
            for (kind, &id) in row_key {
                keys.entry(kind.clone())
                    .or_insert_with(|| vec![SENTINEL; len])[row] = id;
            }
        }

        let cross_reference = match &schema.cross_reference {
            Some(cr) => {
                let mut ids = Matrix::filled(len, cr.columns.len(), SENTINEL);
                for row in 0..len {
                    for (col, (_, column)) in cr.columns.iter().enumerate() {
                        ids.row_mut(row)[col] = match column {
                            ObjectColumn::Row => row as i32,
                            ObjectColumn::Key(kind) => {
                                row_keys[row].get(kind).copied().unwrap_or(SENTINEL)
                            }
                        };
                    }
                }
                Some(CrossReferenceTable {
                    ids_name: cr.ids_name.clone(),
                    fields_name: cr.fields_name.clone(),
                    columns: cr.columns.iter().map(|(name, _)| name.clone()).collect(),
                    ids,
                })
            }
            None => None,
        };

        log::debug!(
            "Table '{}': {} entities retained, {} dropped of {} records",
            schema.name,
            len,
            dropped,
            total
        );

        let position = self.tables.len();
        self.tables.push(ObjectTable {
            name: schema.name.clone(),
            len,
            fields,
            cross_reference,
            keys,
        });
        Ok(&self.tables[position])
    }

    /// Derive key tables and reverse indices and return the split's tables.
    pub fn finish(self, split: &str) -> Result<SplitTables, Error> {
        let key_tables = self
            .schema
            .domains
            .iter()
            .filter_map(|d| {
                let name = d.persist_as.as_ref()?;
                let values = self.domains.get(&d.kind)?.values.clone();
                Some(KeyTable {
                    name: name.clone(),
                    kind: d.kind.clone(),
                    values,
                })
            })
            .collect();

        let mut indices = Vec::with_capacity(self.schema.indices.len());
        for spec in &self.schema.indices {
            let table = self
                .tables
                .iter()
                .find(|t| t.name == spec.table)
                .ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "Index '{}' references unbuilt table '{}'",
                        spec.name, spec.table
                    ))
                })?;
            let universe_len = self
                .domains
                .get(&spec.group)
                .map(|d| d.values.len())
                .unwrap_or(0);
            indices.push(index::reverse_index(table, spec, universe_len)?);
        }

        Ok(SplitTables {
            split: split.to_string(),
            tables: self.tables,
            key_tables,
            indices,
        })
    }
}

fn field_value<'r>(spec: &'r FieldSpec, record: &'r Record) -> Result<&'r FieldValue, String> {
    record
        .field(&spec.name)
        .or(spec.default.as_ref())
        .ok_or_else(|| format!("missing required field '{}'", spec.name))
}

/// Normalize one harvested split into its tables.
///
/// Declared key values are registered first, then every table of the schema
/// is built from its records in schema order, then key tables and reverse
/// indices are derived. The split's source mirror is not touched.
pub fn build_split(schema: &DatasetSchema, split: HarvestedSplit) -> Result<SplitTables, Error> {
    #[cfg(feature = "profiling")]
    let _span = info_span!("build_split", split = %split.name).entered();

    let HarvestedSplit {
        name,
        declared,
        mut records,
        ..
    } = split;

    let mut builder = SplitBuilder::new(schema)?;
    for (kind, values) in &declared {
        for value in values {
            builder.declare(kind, value)?;
        }
    }

    for table in &schema.tables {
        let table_records = records.remove(&table.name).unwrap_or_default();
        builder.build_table(table, table_records)?;
    }
    if let Some(unknown) = records.keys().next() {
        return Err(Error::InvalidInput(format!(
            "Records harvested for undefined table '{}'",
            unknown
        )));
    }

    builder.finish(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        convert::{boxes_to_xyxy, min_box_size},
        pad,
        schema::{CrossReference, FieldSpec, IndexSpec, KeyDomain, Member},
    };
    use std::collections::BTreeSet;

    fn detection_schema() -> DatasetSchema {
        DatasetSchema::new("detection")
            .domain(KeyDomain::open("image").persist_as("image_filenames"))
            .domain(KeyDomain::closed("class", ["person", "people"]).persist_as("classes"))
            .table(
                TableSchema::new("objects")
                    .field(FieldSpec::floats("boxes", 4))
                    .field(FieldSpec::floats("boxesv", 4).with_default([0.0; 4]))
                    .field(FieldSpec::int("id").with_default(0_i64))
                    .field(FieldSpec::float("occlusion"))
                    .filter(min_box_size("boxes", 5.0))
                    .transform(boxes_to_xyxy(&["boxes", "boxesv"]))
                    .cross_reference(CrossReference::new([
                        ("image_filenames", ObjectColumn::Key("image".into())),
                        ("classes", ObjectColumn::Key("class".into())),
                        ("boxes", ObjectColumn::Row),
                        ("boxesv", ObjectColumn::Row),
                        ("id", ObjectColumn::Row),
                        ("occlusion", ObjectColumn::Row),
                    ])),
            )
            .index(IndexSpec::new(
                "list_image_filenames_per_class",
                "objects",
                "class",
                Member::Key("image".into()),
            ))
            .index(IndexSpec::new(
                "list_boxes_per_image",
                "objects",
                "image",
                Member::Row,
            ))
            .index(IndexSpec::new(
                "list_objects_ids_per_class",
                "objects",
                "class",
                Member::Row,
            ))
    }

    fn object(image: &str, class: &str, pos: [f64; 4]) -> Record {
        Record::new()
            .with_field("boxes", pos)
            .with_field("occlusion", 0_i64)
            .with_key("image", image)
            .with_key("class", class)
    }

    fn detection_split() -> HarvestedSplit {
        let mut split = HarvestedSplit::new("train");
        for image in ["img0.jpg", "img1.jpg", "img2.jpg"] {
            split.declare("image", image);
        }
        split.push("objects", object("img0.jpg", "person", [0.0, 0.0, 10.0, 20.0]));
        split.push("objects", object("img0.jpg", "person", [1.0, 1.0, 3.0, 3.0]));
        split.push(
            "objects",
            object("img2.jpg", "people", [5.0, 5.0, 6.0, 6.0])
                .with_field("boxesv", [6.0, 6.0, 2.0, 2.0])
                .with_field("id", 4_i64),
        );
        split.push("objects", object("img2.jpg", "person", [2.0, 3.0, 7.0, 9.0]));
        split
    }

    #[test]
    fn test_filter_and_transform() {
        let schema = DatasetSchema::new("geom")
            .table(
                TableSchema::new("objects")
                    .field(FieldSpec::floats("geom", 4))
                    .filter(min_box_size("geom", 5.0))
                    .transform(boxes_to_xyxy(&["geom"])),
            );
        let mut split = HarvestedSplit::new("train");
        split.push("objects", Record::new().with_field("geom", [0.0, 0.0, 3.0, 3.0]));
        split.push("objects", Record::new().with_field("geom", [0.0, 0.0, 10.0, 20.0]));

        let tables = build_split(&schema, split).unwrap();
        let objects = tables.table("objects").unwrap();
        assert_eq!(objects.len, 1);
        assert_eq!(
            objects.field("geom"),
            Some(&FieldData::Floats {
                arity: 4,
                values: vec![0.0, 0.0, 9.0, 19.0]
            })
        );
    }

    #[test]
    fn test_detection_tables() {
        let schema = detection_schema();
        schema.validate().unwrap();
        let tables = build_split(&schema, detection_split()).unwrap();

        let objects = tables.table("objects").unwrap();
        assert_eq!(objects.len, 3);
        objects.check_co_indexed().unwrap();

        // defaults and widening
        assert_eq!(objects.field("id"), Some(&FieldData::Int(vec![0, 4, 0])));
        assert_eq!(
            objects.field("occlusion"),
            Some(&FieldData::Float(vec![0.0, 0.0, 0.0]))
        );
        match objects.field("boxesv") {
            Some(FieldData::Floats { values, .. }) => {
                assert_eq!(&values[0..4], &[0.0, 0.0, 0.0, 0.0]);
                assert_eq!(&values[4..8], &[6.0, 6.0, 7.0, 7.0]);
            }
            other => panic!("Expected boxesv floats, got {:?}", other),
        }

        let cr = objects.cross_reference.as_ref().unwrap();
        assert_eq!(cr.columns.len(), 6);
        assert_eq!(cr.ids.row(0), &[0, 0, 0, 0, 0, 0]);
        assert_eq!(cr.ids.row(1), &[2, 1, 1, 1, 1, 1]);
        assert_eq!(cr.ids.row(2), &[2, 0, 2, 2, 2, 2]);

        let images = tables.key_table("image").unwrap();
        assert_eq!(images.values, vec!["img0.jpg", "img1.jpg", "img2.jpg"]);
        assert_eq!(tables.key_table("class").unwrap().name, "classes");

        assert_eq!(
            tables.index("list_boxes_per_image").unwrap().buckets,
            vec![vec![0], vec![], vec![1, 2]]
        );
        assert_eq!(
            tables.index("list_image_filenames_per_class").unwrap().buckets,
            vec![vec![0, 2], vec![2]]
        );
        assert_eq!(
            tables.index("list_objects_ids_per_class").unwrap().buckets,
            vec![vec![0, 2], vec![1]]
        );
    }

    #[test]
    fn test_identity_density() {
        let schema = detection_schema();
        let mut split = HarvestedSplit::new("train");
        for i in 0..50 {
            let size = if i % 3 == 0 { 2.0 } else { 12.0 };
            split.push(
                "objects",
                object(&format!("img{}.jpg", i % 7), "person", [0.0, 0.0, size, size]),
            );
        }

        let tables = build_split(&schema, split).unwrap();
        let objects = tables.table("objects").unwrap();
        let expected = (0..50).filter(|i| i % 3 != 0).count();
        assert_eq!(objects.len, expected);

        let ids: BTreeSet<i32> = objects
            .cross_reference
            .as_ref()
            .unwrap()
            .ids
            .iter_rows()
            .map(|row| row[2])
            .collect();
        assert_eq!(ids, (0..expected as i32).collect());

        // every retained box satisfies the size predicate
        if let Some(FieldData::Floats { values, .. }) = objects.field("boxes") {
            for b in values.chunks(4) {
                assert!(b[2] - b[0] + 1.0 >= 5.0 && b[3] - b[1] + 1.0 >= 5.0);
            }
        }

        // padded index rows recover the buckets exactly
        let index = tables.index("list_boxes_per_image").unwrap();
        let matrix = index.to_matrix().unwrap();
        assert_eq!(pad::unpad(&matrix, SENTINEL), index.buckets);
    }

    #[test]
    fn test_missing_required_field() {
        let schema = detection_schema();
        let mut split = HarvestedSplit::new("train");
        split.push(
            "objects",
            Record::new()
                .with_field("boxes", [0.0, 0.0, 10.0, 10.0])
                .with_key("class", "person"),
        );

        let err = build_split(&schema, split).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("occlusion"));
    }

    #[test]
    fn test_undefined_universe_value() {
        let schema = detection_schema();
        let mut split = HarvestedSplit::new("train");
        split.push("objects", object("a.jpg", "cyclist", [0.0, 0.0, 10.0, 10.0]));

        let err = build_split(&schema, split).unwrap_err();
        assert!(err.to_string().contains("cyclist"));
    }

    #[test]
    fn test_wrong_kind_is_not_coerced() {
        let schema = detection_schema();
        let mut split = HarvestedSplit::new("train");
        split.push(
            "objects",
            object("a.jpg", "person", [0.0, 0.0, 10.0, 10.0]).with_field("id", 1.5),
        );
        assert!(build_split(&schema, split).is_err());
    }

    #[test]
    fn test_absent_key_uses_sentinel() {
        let schema = detection_schema();
        let mut split = HarvestedSplit::new("train");
        split.push(
            "objects",
            Record::new()
                .with_field("boxes", [0.0, 0.0, 10.0, 10.0])
                .with_field("occlusion", 1.0)
                .with_key("class", "people"),
        );

        let tables = build_split(&schema, split).unwrap();
        let cr = tables.table("objects").unwrap().cross_reference.clone().unwrap();
        assert_eq!(cr.ids.row(0)[0], SENTINEL);
        assert_eq!(
            tables.index("list_boxes_per_image").unwrap().buckets,
            Vec::<Vec<i32>>::new()
        );
        assert_eq!(
            tables.index("list_objects_ids_per_class").unwrap().buckets,
            vec![vec![], vec![0]]
        );
    }

    #[test]
    fn test_records_for_unknown_table() {
        let schema = detection_schema();
        let mut split = HarvestedSplit::new("train");
        split.push("frames", Record::new());
        assert!(build_split(&schema, split).is_err());
    }

    #[test]
    fn test_schema_mismatch_detected() {
        let table = ObjectTable {
            name: "objects".to_string(),
            len: 2,
            fields: vec![FieldArray {
                name: "boxes".to_string(),
                data: FieldData::Float(vec![1.0]),
            }],
            cross_reference: None,
            keys: BTreeMap::new(),
        };
        match table.check_co_indexed() {
            Err(Error::SchemaMismatch {
                field,
                expected,
                found,
                ..
            }) => {
                assert_eq!(field, "boxes");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected schema mismatch, got {:?}", other),
        }
    }
}
