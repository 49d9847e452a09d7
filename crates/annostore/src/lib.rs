// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # Annotation Store
//!
//! Converts raw per-dataset annotation files (directory listings, JSON
//! annotation records, video frame lists) into a randomly accessible metadata
//! store organized as two coupled hierarchies:
//!
//! - `source/<split>`: a mirror of the raw dataset structure
//! - `default/<split>`: normalized parallel field arrays, an `object_ids`
//!   cross-reference table and padded `list_<entity>_per_<group>` reverse
//!   indices
//!
//! ## Features
//!
//! - **Text matrices**: strings stored as zero-padded byte rows ([`text`])
//! - **Padded lists**: ragged integer lists stored with a `-1` sentinel
//!   ([`pad`])
//! - **Object tables**: dense identities and co-indexed field arrays built
//!   from harvested records ([`table`])
//! - **Reverse indices**: sorted, de-duplicated member lists per grouping key
//!   ([`index`])
//! - **Stores**: in-memory and ZIP-backed hierarchical stores ([`store`])
//! - **Datasets**: Caltech Pedestrian detection and UCF Sports recognition
//!   ([`datasets`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use annostore::{ConversionConfig, Converter, ZipStore, datasets};
//!
//! # fn main() -> Result<(), annostore::Error> {
//! let dataset = datasets::lookup("caltech_pedestrian")?;
//! let config = ConversionConfig::load(&dataset.task_config("detection")?, None)?;
//!
//! let mut store = ZipStore::open_or_create("cache/caltech_pedestrian/detection.zip")?;
//! Converter::new(dataset, config)?.run("data/caltech_pedestrian".as_ref(), &mut store)?;
//! store.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! - `polars`: export object tables as DataFrames and Arrow IPC files
//! - `profiling`: `tracing` spans around the build and write stages

pub mod config;
pub mod convert;
pub mod datasets;
mod error;
pub mod index;
mod matrix;
pub mod pad;
mod pipeline;
mod record;
pub mod schema;
pub mod store;
pub mod table;
pub mod text;
pub mod writer;

#[cfg(feature = "polars")]
pub mod arrow;

#[cfg(feature = "profiling")]
pub mod instrument;

pub use crate::{
    config::{ConversionConfig, SplitConfig},
    datasets::Dataset,
    error::Error,
    index::ReverseIndex,
    matrix::{Array, Matrix},
    pipeline::{ConversionSummary, Converter, SplitReport},
    record::{FieldValue, HarvestedSplit, Record, SourceNode},
    schema::DatasetSchema,
    store::{HierarchicalStore, MemoryStore, ZipStore},
    table::{ObjectTable, SplitTables, build_split},
    writer::StoreWriter,
};

#[cfg(test)]
mod tests {
    #[ctor::ctor]
    fn init() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
}
