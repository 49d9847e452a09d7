// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use super::{HierarchicalStore, normalize};
use crate::{Array, Error};
use log::trace;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Group,
    Array(Array),
}

/// In-memory hierarchical store.
///
/// Entries are kept in a flat map keyed by their normalized path. The root
/// group always exists and is never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Node>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups and arrays, root excluded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry in path order: `(path, None)` for groups and
    /// `(path, Some(array))` for arrays.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&Array>)> {
        self.entries.iter().map(|(path, node)| match node {
            Node::Group => (path.as_str(), None),
            Node::Array(array) => (path.as_str(), Some(array)),
        })
    }

    fn create_normalized(&mut self, path: &str) -> Result<(), Error> {
        let mut end = 0;
        while end < path.len() {
            end = path[end..].find('/').map(|i| end + i).unwrap_or(path.len());
            let prefix = &path[..end];
            match self.entries.get(prefix) {
                Some(Node::Group) => {}
                Some(Node::Array(_)) => {
                    return Err(Error::InvalidInput(format!(
                        "Cannot create group '{}': '{}' is an array",
                        path, prefix
                    )));
                }
                None => {
                    trace!("create group {}", prefix);
                    self.entries.insert(prefix.to_string(), Node::Group);
                }
            }
            end += 1;
        }
        Ok(())
    }
}

impl HierarchicalStore for MemoryStore {
    fn create_group(&mut self, path: &str) -> Result<(), Error> {
        let path = normalize(path)?;
        self.create_normalized(&path)
    }

    fn remove(&mut self, path: &str) -> Result<bool, Error> {
        let path = normalize(path)?;
        let before = self.entries.len();
        if path.is_empty() {
            self.entries.clear();
        } else {
            let prefix = format!("{}/", path);
            self.entries
                .retain(|key, _| key != &path && !key.starts_with(&prefix));
        }
        Ok(self.entries.len() != before)
    }

    fn write_array(&mut self, path: &str, array: Array) -> Result<(), Error> {
        array.validate()?;
        let path = normalize(path)?;
        if path.is_empty() {
            return Err(Error::InvalidInput(
                "Cannot write an array at the root group".to_string(),
            ));
        }
        let parent = path.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
        self.create_normalized(parent)?;
        if let Some(Node::Group) = self.entries.get(&path) {
            return Err(Error::InvalidInput(format!(
                "Cannot write array '{}': a group exists at that path",
                path
            )));
        }
        trace!("write array {} {} {:?}", path, array.dtype(), array.shape());
        self.entries.insert(path, Node::Array(array));
        Ok(())
    }

    fn read_array(&self, path: &str) -> Result<Array, Error> {
        let path = normalize(path)?;
        match self.entries.get(&path) {
            Some(Node::Array(array)) => Ok(array.clone()),
            Some(Node::Group) => Err(Error::MissingEntry(format!("'{}' is a group", path))),
            None => Err(Error::MissingEntry(path)),
        }
    }

    fn children(&self, path: &str) -> Result<Vec<String>, Error> {
        let path = normalize(path)?;
        if !self.is_group(&path) {
            return Err(Error::MissingEntry(format!("group '{}'", path)));
        }
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };
        Ok(self
            .entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| {
                let rest = &key[prefix.len()..];
                (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
            })
            .collect())
    }

    fn is_group(&self, path: &str) -> bool {
        match normalize(path) {
            Ok(path) if path.is_empty() => true,
            Ok(path) => matches!(self.entries.get(&path), Some(Node::Group)),
            Err(_) => false,
        }
    }
}
