// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Hierarchical store abstraction.
//!
//! A store is a tree of named groups whose leaves are typed [`Array`]s.
//! Paths are `/`-separated and relative to the root group (the empty path).
//!
//! # Store Implementations
//!
//! - [`MemoryStore`]: in-memory tree (no persistence)
//! - [`ZipStore`]: ZIP container with one JSON entry per array
//!
//! # Examples
//!
//! ```rust
//! use annostore::{Array, HierarchicalStore, Matrix, MemoryStore};
//!
//! # fn main() -> Result<(), annostore::Error> {
//! let mut store = MemoryStore::new();
//! store.write_array("default/train/id", Array::I32(Matrix::column(vec![0, 1])))?;
//!
//! assert!(store.is_group("default/train"));
//! assert_eq!(store.children("default/train")?, vec!["id"]);
//! # Ok(())
//! # }
//! ```

mod archive;
mod memory;

pub use archive::ZipStore;
pub use memory::MemoryStore;

use crate::{Array, Error};

/// Trait for hierarchical array stores.
pub trait HierarchicalStore {
    /// Create the group at `path` and any missing parents.
    ///
    /// Existing groups are left untouched. Fails with `InvalidInput` if an
    /// array occupies any segment of the path.
    fn create_group(&mut self, path: &str) -> Result<(), Error>;

    /// Remove the entry at `path` with everything below it.
    ///
    /// Returns `false` if nothing existed there.
    fn remove(&mut self, path: &str) -> Result<bool, Error>;

    /// Write an array, creating parent groups. An existing array at `path`
    /// is replaced; an existing group is an `InvalidInput` error.
    fn write_array(&mut self, path: &str, array: Array) -> Result<(), Error>;

    /// Read the array at `path`.
    ///
    /// Returns `MissingEntry` if the path does not exist or is a group.
    fn read_array(&self, path: &str) -> Result<Array, Error>;

    /// Names of the direct children of the group at `path`, sorted.
    fn children(&self, path: &str) -> Result<Vec<String>, Error>;

    /// Returns `true` if `path` is an existing group.
    fn is_group(&self, path: &str) -> bool;
}

/// Normalize a store path: drop empty segments and reject `.`/`..`.
pub(crate) fn normalize(path: &str) -> Result<String, Error> {
    let mut segments = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(Error::InvalidInput(format!(
                "Store path '{}' contains relative segment '{}'",
                path, segment
            )));
        }
        segments.push(segment);
    }
    Ok(segments.join("/"))
}

/// Join two store paths.
pub fn join(parent: &str, child: &str) -> String {
    match (parent.trim_matches('/'), child.trim_matches('/')) {
        ("", child) => child.to_string(),
        (parent, "") => parent.to_string(),
        (parent, child) => format!("{}/{}", parent, child),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/source//train/").unwrap(), "source/train");
        assert_eq!(normalize("").unwrap(), "");
        assert!(normalize("default/../x").is_err());
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "source"), "source");
        assert_eq!(join("source/", "/train"), "source/train");
        assert_eq!(join("default", ""), "default");
    }
}
