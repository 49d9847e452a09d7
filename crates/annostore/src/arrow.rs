// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Arrow export of normalized tables.
//!
//! One row per entity: an `index` column holding the entity identity, one
//! column per field, and one column per key kind. Persisted key kinds
//! (`classes`, `image_filenames`, ...) are resolved to their string values,
//! other kinds are exported as `<kind>_id`. Absent keys are null.

use crate::{
    Error,
    pad::SENTINEL,
    table::{FieldData, ObjectTable, SplitTables},
};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Build a DataFrame from one object table of `split`.
pub fn table_dataframe(split: &SplitTables, table: &ObjectTable) -> Result<DataFrame, Error> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.fields.len() + table.keys.len() + 1);
    columns.push(Series::new("index".into(), table.identities().collect::<Vec<i32>>()).into());

    for field in &table.fields {
        let name: PlSmallStr = field.name.as_str().into();
        let series = match &field.data {
            FieldData::Int(values) => Series::new(name, values),
            FieldData::Float(values) => Series::new(name, values),
            FieldData::Text(values) => Series::new(name, values),
            FieldData::Floats { arity, values } => {
                let rows: Vec<Series> = values
                    .chunks(*arity)
                    .map(|row| Series::new(name.clone(), row))
                    .collect();
                Series::new(name, rows)
                    .cast(&DataType::Array(Box::new(DataType::Float64), *arity))?
            }
        };
        columns.push(series.into());
    }

    for (kind, ids) in &table.keys {
        let series = match split.key_table(kind) {
            Some(key_table) => {
                let values: Vec<Option<&str>> = ids
                    .iter()
                    .map(|&id| {
                        usize::try_from(id)
                            .ok()
                            .and_then(|i| key_table.values.get(i))
                            .map(String::as_str)
                    })
                    .collect();
                Series::new(kind.as_str().into(), values)
            }
            None => {
                let values: Vec<Option<i32>> = ids
                    .iter()
                    .map(|&id| (id != SENTINEL).then_some(id))
                    .collect();
                Series::new(format!("{}_id", kind).into(), values)
            }
        };
        columns.push(series.into());
    }

    Ok(DataFrame::new(columns)?)
}

/// Write every table of `split` to `<dir>/<split>/<table>.arrow`.
pub fn write_split_ipc<P: AsRef<Path>>(dir: P, split: &SplitTables) -> Result<Vec<PathBuf>, Error> {
    let split_dir = dir.as_ref().join(&split.split);
    std::fs::create_dir_all(&split_dir)?;

    let mut paths = Vec::with_capacity(split.tables.len());
    for table in &split.tables {
        let mut df = table_dataframe(split, table)?;
        let path = split_dir.join(format!("{}.arrow", table.name));
        let mut file = std::fs::File::create(&path)?;
        IpcWriter::new(&mut file).finish(&mut df)?;
        log::debug!("Wrote {} rows to {:?}", df.height(), path);
        paths.push(path);
    }
    Ok(paths)
}
