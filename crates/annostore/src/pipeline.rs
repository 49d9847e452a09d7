// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Harvest → build → write driver.

use crate::{
    ConversionConfig, DatasetSchema, Error, HarvestedSplit, SourceNode,
    datasets::Dataset,
    store::HierarchicalStore,
    table::{SplitTables, build_split},
    writer::{StoreWriter, WriteSummary},
};
use log::info;
use rayon::prelude::*;
use std::path::Path;

#[cfg(feature = "profiling")]
use crate::instrument::info_span;

/// Outcome of one written split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub name: String,
    /// Entities over all object tables of the split.
    pub entities: usize,
    pub arrays: usize,
    pub source_leaves: usize,
}

/// Outcome of a whole conversion, splits in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub splits: Vec<SplitReport>,
}

impl ConversionSummary {
    pub fn split(&self, name: &str) -> Option<&SplitReport> {
        self.splits.iter().find(|s| s.name == name)
    }
}

/// Converts one dataset task into a store.
///
/// Splits are independent: each gets a fresh builder and is written with
/// full-replace semantics. With `parallel` set, all splits are harvested and
/// built on the rayon pool first, then written in listing order. Any failure
/// aborts the conversion; splits already written stay in the store.
///
/// # Example
///
/// ```rust,no_run
/// use annostore::{Converter, ZipStore, datasets};
///
/// let dataset = datasets::lookup("caltech_pedestrian")?;
/// let config = dataset.task_config("detection")?;
/// let mut store = ZipStore::open_or_create("detection.zip")?;
///
/// let summary = Converter::new(dataset, config)?.run("data/caltech".as_ref(), &mut store)?;
/// store.save()?;
/// println!("{} splits written", summary.splits.len());
/// # Ok::<(), annostore::Error>(())
/// ```
pub struct Converter<'a> {
    dataset: &'a dyn Dataset,
    config: ConversionConfig,
    schema: DatasetSchema,
    writer: StoreWriter,
}

impl<'a> Converter<'a> {
    /// Validate the configuration and the dataset schema.
    pub fn new(dataset: &'a dyn Dataset, config: ConversionConfig) -> Result<Self, Error> {
        config.validate()?;
        let schema = dataset.schema();
        schema.validate()?;
        let writer = StoreWriter::new().with_source_mirror(config.include_source_group);
        Ok(Self {
            dataset,
            config,
            schema,
            writer,
        })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Convert every split of the dataset at `root` into `store`.
    pub fn run<S: HierarchicalStore + ?Sized>(
        &self,
        root: &Path,
        store: &mut S,
    ) -> Result<ConversionSummary, Error> {
        self.run_with(root, store, |_, _| Ok(()))
    }

    /// Like [`Converter::run`], calling `on_split` after each split is written.
    pub fn run_with<S, F>(
        &self,
        root: &Path,
        store: &mut S,
        mut on_split: F,
    ) -> Result<ConversionSummary, Error>
    where
        S: HierarchicalStore + ?Sized,
        F: FnMut(&SplitReport, &SplitTables) -> Result<(), Error>,
    {
        info!(
            "Converting {} ({}) from {:?}",
            self.dataset.name(),
            self.config.output_name,
            root
        );
        let splits = self.dataset.harvest(root, &self.config)?;
        let mut summary = ConversionSummary::default();

        if self.config.parallel {
            let harvested = splits.collect::<Result<Vec<_>, Error>>()?;
            let built = harvested
                .into_par_iter()
                .map(|split| self.build(split))
                .collect::<Result<Vec<_>, Error>>()?;
            for (source, tables) in built {
                let report = self.write(store, &source, &tables)?;
                on_split(&report, &tables)?;
                summary.splits.push(report);
            }
        } else {
            for split in splits {
                let (source, tables) = self.build(split?)?;
                let report = self.write(store, &source, &tables)?;
                on_split(&report, &tables)?;
                summary.splits.push(report);
            }
        }

        Ok(summary)
    }

    fn build(&self, mut split: HarvestedSplit) -> Result<(SourceNode, SplitTables), Error> {
        let name = split.name.clone();
        let source = std::mem::take(&mut split.source);
        let tables = build_split(&self.schema, split).map_err(|e| e.in_split(&name))?;
        Ok((source, tables))
    }

    fn write<S: HierarchicalStore + ?Sized>(
        &self,
        store: &mut S,
        source: &SourceNode,
        tables: &SplitTables,
    ) -> Result<SplitReport, Error> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("write", split = %tables.split).entered();

        let WriteSummary {
            arrays,
            source_leaves,
        } = self
            .writer
            .write_split(store, &tables.split, source, tables)
            .map_err(|e| e.in_split(&tables.split))?;
        let entities = tables.tables.iter().map(|t| t.len).sum();

        info!(
            "Split '{}': {} entities, {} arrays, {} source leaves",
            tables.split, entities, arrays, source_leaves
        );
        Ok(SplitReport {
            name: tables.split.clone(),
            entities,
            arrays,
            source_leaves,
        })
    }
}
