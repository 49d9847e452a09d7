// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Conversion configuration.
//!
//! A [`ConversionConfig`] is resolved from layered sources, later ones
//! overriding earlier ones:
//!
//! 1. the dataset task preset (itself derived from [`ConversionConfig::default`])
//! 2. an optional configuration file (TOML, JSON or YAML)
//! 3. `ANNOSTORE_*` environment variables, `__` separating nested keys
//!    (`ANNOSTORE_SPLITS__SEED=7`)
//!
//! Command line flags are applied by the caller on the resolved value.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "ANNOSTORE";

/// Random train/test split settings for datasets without official splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of items assigned to the train split.
    pub train_fraction: f64,
    /// Number of independent train/test pairs.
    pub count: usize,
    /// Seed of the shuffling RNG; equal seeds give equal splits.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_fraction: 2.0 / 3.0,
            count: 5,
            seed: 0,
        }
    }
}

/// Parameters of one dataset conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Keep every `skip_step`-th frame, starting at frame `skip_step - 1`.
    pub skip_step: usize,
    /// Output file stem, usually the task name.
    pub output_name: String,
    /// Write the `source/<split>` raw mirror.
    pub include_source_group: bool,
    /// Build split tables in parallel.
    pub parallel: bool,
    pub splits: SplitConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            skip_step: 30,
            output_name: "detection".to_string(),
            include_source_group: true,
            parallel: false,
            splits: SplitConfig::default(),
        }
    }
}

impl ConversionConfig {
    /// Layer an optional file and the process environment over `base`.
    pub fn load(base: &ConversionConfig, file: Option<&Path>) -> Result<Self, Error> {
        Self::load_from(base, file, None)
    }

    /// Like [`ConversionConfig::load`], reading variables from `env` instead
    /// of the process environment when given.
    pub fn load_from(
        base: &ConversionConfig,
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, Error> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(base)?);
        if let Some(path) = file {
            log::debug!("Loading configuration file {:?}", path);
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: ConversionConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no conversion can run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.skip_step == 0 {
            return Err(Error::InvalidInput("skip_step must be at least 1".to_string()));
        }
        if self.output_name.is_empty()
            || self.output_name.contains(['/', '\\'])
            || self.output_name.starts_with('.')
        {
            return Err(Error::InvalidInput(format!(
                "Invalid output name '{}'",
                self.output_name
            )));
        }
        if !(self.splits.train_fraction > 0.0 && self.splits.train_fraction <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "train_fraction must be in (0, 1], got {}",
                self.splits.train_fraction
            )));
        }
        if self.splits.count == 0 {
            return Err(Error::InvalidInput(
                "At least one random split is required".to_string(),
            ));
        }
        Ok(())
    }
}
