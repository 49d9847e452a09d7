// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Declarative description of a dataset's normalized tables.
//!
//! A [`DatasetSchema`] tells the builder which key domains exist in a split
//! (classes, images, videos, activities), which object tables to build from
//! the harvested records, which fields each table carries, how the
//! `object_ids` cross-reference is laid out and which reverse indices to
//! derive. Dataset-specific behaviour (size filters, box conversions) is
//! injected as closures instead of being hard-coded in the builder.

use crate::{Error, FieldValue, Record};
use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

/// Predicate deciding whether a raw record is retained.
pub type RecordFilter = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Per-table transform applied to retained records before storage.
pub type RecordTransform = Arc<dyn Fn(Record) -> Result<Record, Error> + Send + Sync>;

/// Storage kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored as `i32`.
    Int,
    /// Stored as `f64`.
    Float,
    /// Fixed-arity `f64` tuple, e.g. a bounding box.
    Floats(usize),
    /// Stored as a text matrix.
    Text,
}

impl FieldKind {
    /// Width of the persisted matrix for this kind (text width is dynamic).
    pub fn arity(&self) -> usize {
        match self {
            FieldKind::Floats(n) => *n,
            _ => 1,
        }
    }
}

/// One field of an object table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Value stored when a record lacks the field. `None` makes it required.
    pub default: Option<FieldValue>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn floats(name: impl Into<String>, arity: usize) -> Self {
        Self::new(name, FieldKind::Floats(arity))
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Value space of a key kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Universe {
    /// Fixed, ordered list known at configuration time (class labels).
    Closed(Vec<String>),
    /// Values receive identities in first-seen order (images, videos).
    Open,
}

/// A grouping key kind shared by all tables of a split.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDomain {
    pub kind: String,
    pub universe: Universe,
    /// Name of the text array holding the key values, if persisted.
    pub persist_as: Option<String>,
}

impl KeyDomain {
    pub fn closed<S: Into<String>>(kind: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: kind.into(),
            universe: Universe::Closed(values.into_iter().map(Into::into).collect()),
            persist_as: None,
        }
    }

    pub fn open(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            universe: Universe::Open,
            persist_as: None,
        }
    }

    pub fn persist_as(mut self, name: impl Into<String>) -> Self {
        self.persist_as = Some(name.into());
        self
    }
}

/// Source of one `object_ids` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectColumn {
    /// The entity's own identity; used for co-indexed field arrays.
    Row,
    /// Identity of the entity's key of this kind, or the sentinel if absent.
    Key(String),
}

/// Layout of a table's cross-reference array.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossReference {
    /// Array name of the id matrix.
    pub ids_name: String,
    /// Array name of the text array naming each column.
    pub fields_name: String,
    pub columns: Vec<(String, ObjectColumn)>,
}

impl CrossReference {
    /// Cross-reference stored as `object_ids` / `object_fields`.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = (S, ObjectColumn)>) -> Self {
        Self {
            ids_name: "object_ids".to_string(),
            fields_name: "object_fields".to_string(),
            columns: columns
                .into_iter()
                .map(|(name, column)| (name.into(), column))
                .collect(),
        }
    }
}

/// One object table built from the records harvested for it.
#[derive(Clone)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub filter: Option<RecordFilter>,
    pub transform: Option<RecordTransform>,
    pub cross_reference: Option<CrossReference>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            filter: None,
            transform: None,
            cross_reference: None,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn filter(mut self, filter: RecordFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn transform(mut self, transform: RecordTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn cross_reference(mut self, cross_reference: CrossReference) -> Self {
        self.cross_reference = Some(cross_reference);
        self
    }
}

impl fmt::Debug for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("filter", &self.filter.is_some())
            .field("transform", &self.transform.is_some())
            .field("cross_reference", &self.cross_reference)
            .finish()
    }
}

/// Values collected into each reverse-index bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// Entity identities of the table (`list_objects_ids_per_class`).
    Row,
    /// Key identities of another kind (`list_image_filenames_per_class`).
    Key(String),
}

/// A reverse index: one bucket per value of `group`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    /// Persisted name, `list_<entity>_per_<group>` by convention.
    pub name: String,
    pub table: String,
    pub group: String,
    pub member: Member,
}

impl IndexSpec {
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        group: impl Into<String>,
        member: Member,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            group: group.into(),
            member,
        }
    }
}

/// Complete normalization schema for one dataset task.
#[derive(Debug, Clone)]
pub struct DatasetSchema {
    pub name: String,
    pub domains: Vec<KeyDomain>,
    pub tables: Vec<TableSchema>,
    pub indices: Vec<IndexSpec>,
}

impl DatasetSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domains: Vec::new(),
            tables: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn domain(mut self, domain: KeyDomain) -> Self {
        self.domains.push(domain);
        self
    }

    pub fn table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    pub fn index(mut self, index: IndexSpec) -> Self {
        self.indices.push(index);
        self
    }

    pub fn find_domain(&self, kind: &str) -> Option<&KeyDomain> {
        self.domains.iter().find(|d| d.kind == kind)
    }

    /// Names of every array written under `default/<split>`, in write order.
    pub fn array_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for table in &self.tables {
            names.extend(table.fields.iter().map(|f| f.name.as_str()));
        }
        names.extend(self.domains.iter().filter_map(|d| d.persist_as.as_deref()));
        for table in &self.tables {
            if let Some(cr) = &table.cross_reference {
                names.push(cr.ids_name.as_str());
                names.push(cr.fields_name.as_str());
            }
        }
        names.extend(self.indices.iter().map(|i| i.name.as_str()));
        names
    }

    /// Check internal consistency before any split is processed.
    ///
    /// Rejects duplicate domain kinds, duplicate closed-universe values,
    /// references to undefined key kinds or tables, and colliding array
    /// names within the `default/<split>` group.
    pub fn validate(&self) -> Result<(), Error> {
        let mut kinds = HashSet::new();
        for domain in &self.domains {
            if !kinds.insert(domain.kind.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate key domain '{}'",
                    domain.kind
                )));
            }
            if let Universe::Closed(values) = &domain.universe {
                let mut seen = HashSet::new();
                if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
                    return Err(Error::InvalidInput(format!(
                        "Duplicate value '{}' in closed domain '{}'",
                        dup, domain.kind
                    )));
                }
            }
        }

        let mut tables: HashMap<&str, &TableSchema> = HashMap::new();
        for table in &self.tables {
            if tables.insert(table.name.as_str(), table).is_some() {
                return Err(Error::InvalidInput(format!(
                    "Duplicate table '{}'",
                    table.name
                )));
            }
            for field in &table.fields {
                if field.kind == FieldKind::Floats(0) {
                    return Err(Error::InvalidInput(format!(
                        "Field '{}' has zero arity",
                        field.name
                    )));
                }
            }
            if let Some(cr) = &table.cross_reference {
                for (name, column) in &cr.columns {
                    if let ObjectColumn::Key(kind) = column
                        && !kinds.contains(kind.as_str())
                    {
                        return Err(Error::InvalidInput(format!(
                            "Column '{}' of table '{}' references undefined key '{}'",
                            name, table.name, kind
                        )));
                    }
                }
            }
        }

        for index in &self.indices {
            if !tables.contains_key(index.table.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Index '{}' references undefined table '{}'",
                    index.name, index.table
                )));
            }
            let member_kind = match &index.member {
                Member::Key(kind) => Some(kind.as_str()),
                Member::Row => None,
            };
            for kind in std::iter::once(index.group.as_str()).chain(member_kind) {
                if !kinds.contains(kind) {
                    return Err(Error::InvalidInput(format!(
                        "Index '{}' references undefined key '{}'",
                        index.name, kind
                    )));
                }
            }
        }

        let mut names = HashSet::new();
        if let Some(dup) = self.array_names().into_iter().find(|n| !names.insert(*n)) {
            return Err(Error::InvalidInput(format!(
                "Array name '{}' is used twice in schema '{}'",
                dup, self.name
            )));
        }

        Ok(())
    }
}
