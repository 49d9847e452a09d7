// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

/// Error type for annotation store conversions.
///
/// The structural variants (`InvalidInput`, `SentinelCollision`,
/// `SchemaMismatch`) are raised by the normalization engine and abort the
/// split being processed. Failures coming from the dataset harvesters are
/// reported as opaque `Harvest` errors, and the converter wraps everything in
/// `Split` so the offending split name is always part of the message.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred during file operations.
    IoError(std::io::Error),
    /// Configuration parsing or loading error.
    ConfigError(config::ConfigError),
    /// JSON serialization or deserialization error.
    JsonError(serde_json::Error),
    /// ZIP container read or write error.
    ZipError(zip::result::ZipError),
    /// Malformed input: embedded zero byte in a string, missing required
    /// field, wrong field kind, or a group key outside its closed universe.
    InvalidInput(String),
    /// An identity or index value equals the reserved padding sentinel.
    SentinelCollision {
        /// Row of the list containing the value.
        row: usize,
        /// The offending value.
        value: i32,
    },
    /// Field arrays of one table have divergent lengths.
    SchemaMismatch {
        /// Table name.
        table: String,
        /// Field whose length diverges.
        field: String,
        /// Number of entities in the table.
        expected: usize,
        /// Length of the field array.
        found: usize,
    },
    /// Any failure while processing a split, tagged with the split name.
    Split {
        /// Name of the split that was being processed.
        split: String,
        /// Underlying error.
        source: Box<Error>,
    },
    /// Upstream harvesting failure (missing files, unreadable annotations).
    Harvest(String),
    /// Dataset name not present in the catalog.
    UnknownDataset(String),
    /// Task name not provided by the dataset.
    UnknownTask {
        /// Dataset name.
        dataset: String,
        /// Requested task name.
        task: String,
    },
    /// Store path does not exist or refers to the wrong kind of entry.
    MissingEntry(String),
    /// Polars dataframe operation error (only with "polars" feature).
    #[cfg(feature = "polars")]
    PolarsError(polars::error::PolarsError),
}

impl Error {
    /// Attach a split name to this error, unless it already carries one.
    pub fn in_split(self, split: &str) -> Self {
        match self {
            Error::Split { .. } => self,
            other => Error::Split {
                split: split.to_string(),
                source: Box::new(other),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipError(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Harvest(err.to_string())
    }
}

#[cfg(feature = "polars")]
impl From<polars::error::PolarsError> for Error {
    fn from(err: polars::error::PolarsError) -> Self {
        Error::PolarsError(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Error::JsonError(e) => write!(f, "JSON error: {}", e),
            Error::ZipError(e) => write!(f, "ZIP error: {}", e),
            Error::InvalidInput(s) => write!(f, "Invalid input: {}", s),
            Error::SentinelCollision { row, value } => write!(
                f,
                "Sentinel collision: value {} in row {} equals the padding sentinel",
                value, row
            ),
            Error::SchemaMismatch {
                table,
                field,
                expected,
                found,
            } => write!(
                f,
                "Schema mismatch in table '{}': field '{}' has {} rows, expected {}",
                table, field, found, expected
            ),
            Error::Split { split, source } => write!(f, "Split '{}': {}", split, source),
            Error::Harvest(s) => write!(f, "Harvest error: {}", s),
            Error::UnknownDataset(s) => write!(f, "Unknown dataset: {}", s),
            Error::UnknownTask { dataset, task } => {
                write!(f, "Unknown task '{}' for dataset '{}'", task, dataset)
            }
            Error::MissingEntry(s) => write!(f, "Missing store entry: {}", s),
            #[cfg(feature = "polars")]
            Error::PolarsError(e) => write!(f, "Polars error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::ConfigError(e) => Some(e),
            Error::JsonError(e) => Some(e),
            Error::ZipError(e) => Some(e),
            Error::Split { source, .. } => Some(source.as_ref()),
            #[cfg(feature = "polars")]
            Error::PolarsError(e) => Some(e),
            _ => None,
        }
    }
}
