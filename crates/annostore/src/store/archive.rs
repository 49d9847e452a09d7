// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! ZIP container backend.
//!
//! Layout inside the archive:
//! - one directory entry `<group>/` per group
//! - one `<array>.json` entry per array, holding the serialized [`Array`]

use super::{HierarchicalStore, MemoryStore};
use crate::{Array, Error};
use log::{debug, warn};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, write::SimpleFileOptions};

const ARRAY_SUFFIX: &str = ".json";

/// Hierarchical store persisted as a ZIP file.
///
/// All edits happen in memory; nothing touches the filesystem until
/// [`ZipStore::save`].
///
/// # Example
///
/// ```rust,no_run
/// use annostore::{Array, HierarchicalStore, Matrix, ZipStore};
///
/// let mut store = ZipStore::create("caltech_pedestrian/detection.zip");
/// store.write_array("default/train/id", Array::I32(Matrix::column(vec![0])))?;
/// store.save()?;
///
/// let store = ZipStore::open("caltech_pedestrian/detection.zip")?;
/// assert!(store.is_group("default/train"));
/// # Ok::<(), annostore::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ZipStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl ZipStore {
    /// Start an empty store that will be saved to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            inner: MemoryStore::new(),
        }
    }

    /// Load an existing container.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
        let mut inner = MemoryStore::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();

            if entry.is_dir() {
                inner.create_group(&name)?;
            } else if let Some(array_path) = name.strip_suffix(ARRAY_SUFFIX) {
                let mut contents = String::new();
                entry.read_to_string(&mut contents)?;
                let array: Array = serde_json::from_str(&contents)?;
                inner.write_array(array_path, array)?;
            } else {
                warn!("Ignoring unexpected entry '{}' in {:?}", name, path);
            }
        }

        debug!("Opened {:?} with {} entries", path, inner.len());
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// Open `path` if it exists, otherwise start an empty store.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Ok(Self::create(path))
        }
    }

    /// Path the store is saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// In-memory view of the current contents.
    pub fn contents(&self) -> &MemoryStore {
        &self.inner
    }

    /// Write the container.
    ///
    /// The archive is written to a temporary sibling first and renamed over
    /// the target once complete.
    pub fn save(&self) -> Result<(), Error> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        if let Err(err) = self.write_archive(&tmp_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err);
        }
        std::fs::rename(&tmp_path, &self.path)?;

        debug!("Saved {} entries to {:?}", self.inner.len(), self.path);
        Ok(())
    }

    fn write_archive(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (entry_path, entry) in self.inner.entries() {
            match entry {
                None => zip.add_directory(format!("{}/", entry_path), options)?,
                Some(array) => {
                    zip.start_file(format!("{}{}", entry_path, ARRAY_SUFFIX), options)?;
                    serde_json::to_writer(&mut zip, array)?;
                }
            }
        }

        zip.finish()?;
        Ok(())
    }
}

impl HierarchicalStore for ZipStore {
    fn create_group(&mut self, path: &str) -> Result<(), Error> {
        self.inner.create_group(path)
    }

    fn remove(&mut self, path: &str) -> Result<bool, Error> {
        self.inner.remove(path)
    }

    fn write_array(&mut self, path: &str, array: Array) -> Result<(), Error> {
        self.inner.write_array(path, array)
    }

    fn read_array(&self, path: &str) -> Result<Array, Error> {
        self.inner.read_array(path)
    }

    fn children(&self, path: &str) -> Result<Vec<String>, Error> {
        self.inner.children(path)
    }

    fn is_group(&self, path: &str) -> bool {
        self.inner.is_group(path)
    }
}
