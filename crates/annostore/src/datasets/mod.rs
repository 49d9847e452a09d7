// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # Dataset Plugins
//!
//! Each dataset knows how to walk its extracted download and flatten the raw
//! annotation files into [`HarvestedSplit`]s, and which [`DatasetSchema`] the
//! engine should normalize them with.
//!
//! ## Catalog
//!
//! | Category      | Dataset              | Tasks                                   |
//! |---------------|----------------------|-----------------------------------------|
//! | `detection`   | `caltech_pedestrian` | `detection`, `detection_10x`, `detection_30x` |
//! | `recognition` | `ucf_sports`         | `recognition`                           |
//!
//! Every task also has a `_d` variant that skips the `source/<split>` mirror.
//!
//! ## Example
//!
//! ```rust,no_run
//! use annostore::datasets;
//!
//! let dataset = datasets::lookup("caltech_pedestrian")?;
//! let config = dataset.task_config("detection_10x")?;
//! for split in dataset.harvest("data/caltech".as_ref(), &config)? {
//!     let split = split?;
//!     println!("{}: {} records", split.name, split.record_count());
//! }
//! # Ok::<(), annostore::Error>(())
//! ```

mod caltech;
mod ucf_sports;

pub use caltech::CaltechPedestrian;
pub use ucf_sports::UcfSports;

use crate::{ConversionConfig, DatasetSchema, Error, HarvestedSplit};
use std::path::{Path, PathBuf};

/// Lazily harvested splits, in listing order.
pub type SplitIter = Box<dyn Iterator<Item = Result<HarvestedSplit, Error>> + Send>;

/// Suffix of the task variants without a source mirror.
pub const NO_SOURCE_SUFFIX: &str = "_d";

/// A convertible dataset.
pub trait Dataset: Send + Sync {
    /// Catalog name, also the output directory name.
    fn name(&self) -> &'static str;

    /// Catalog category.
    fn category(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Base task names, without the `_d` variants.
    fn tasks(&self) -> &'static [&'static str];

    /// Task used when none is requested.
    fn default_task(&self) -> &'static str;

    /// Preset configuration of a base task. `_d` variants are resolved by
    /// [`Dataset::task_config`].
    fn task_preset(&self, task: &str) -> Option<ConversionConfig>;

    /// Normalization schema shared by every task of the dataset.
    fn schema(&self) -> DatasetSchema;

    /// Scan `root` and return the dataset's splits.
    ///
    /// Fails immediately if the expected layout is missing; per-split
    /// failures surface from the iterator.
    fn harvest(&self, root: &Path, config: &ConversionConfig) -> Result<SplitIter, Error>;

    /// Resolve a task name, including `_d` variants, into its preset.
    fn task_config(&self, task: &str) -> Result<ConversionConfig, Error> {
        let (base, include_source) = match task.strip_suffix(NO_SOURCE_SUFFIX) {
            Some(base) => (base, false),
            None => (task, true),
        };
        let mut config = self.task_preset(base).ok_or_else(|| Error::UnknownTask {
            dataset: self.name().to_string(),
            task: task.to_string(),
        })?;
        config.output_name = task.to_string();
        config.include_source_group = include_source;
        Ok(config)
    }

    /// Every accepted task name.
    fn all_tasks(&self) -> Vec<String> {
        self.tasks()
            .iter()
            .flat_map(|t| [t.to_string(), format!("{}{}", t, NO_SOURCE_SUFFIX)])
            .collect()
    }
}

static CATALOG: &[&dyn Dataset] = &[&CaltechPedestrian, &UcfSports];

/// Every available dataset.
pub fn catalog() -> &'static [&'static dyn Dataset] {
    CATALOG
}

/// Find a dataset by name.
pub fn lookup(name: &str) -> Result<&'static dyn Dataset, Error> {
    CATALOG
        .iter()
        .copied()
        .find(|d| d.name() == name)
        .ok_or_else(|| Error::UnknownDataset(name.to_string()))
}

/// Sorted file names in `dir` whose extension matches `ext` (case-insensitive).
pub(crate) fn list_files(dir: &Path, ext: &str) -> Result<Vec<String>, Error> {
    let mut names = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches {
            names.push(utf8_name(&entry)?);
        }
    }
    Ok(names)
}

/// Sorted sub-directory names of `dir`.
pub(crate) fn list_dirs(dir: &Path) -> Result<Vec<String>, Error> {
    let mut names = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            names.push(utf8_name(&entry)?);
        }
    }
    Ok(names)
}

/// File name of a listed entry; non-UTF-8 names cannot be stored as text.
fn utf8_name(entry: &walkdir::DirEntry) -> Result<String, Error> {
    entry
        .file_name()
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Harvest(format!("Non UTF-8 file name: {:?}", entry.path())))
}

/// Fail with a `Harvest` error if `dir` is not a directory.
pub(crate) fn require_dir(dir: PathBuf) -> Result<PathBuf, Error> {
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(Error::Harvest(format!("Directory not found: {:?}", dir)))
    }
}

#[cfg(test)]
mod tests;
