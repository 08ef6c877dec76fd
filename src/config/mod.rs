//! Configuration management for the test runner.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
//! - Command line overrides (applied by the binary after loading)
mod cluster;
mod readiness;
pub use cluster::*;
pub use readiness::*;


use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Prefix of environment variables overriding configuration keys,
/// e.g. `RUNNER__CLUSTER__BINARY`.
pub const ENV_PREFIX: &str = "RUNNER";

/// Main configuration container of a test run
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct RunnerConfig {
    /// Cluster topology, binaries and on-disk layout
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Barriers between bring-up phases
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

impl Debug for RunnerConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("cluster", &self.cluster)
            .field("readiness", &self.readiness)
            .finish()
    }
}

impl RunnerConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `RUNNER__` prefix (highest priority)
    ///
    /// # Note
    /// Validation is deferred so that `with_override_config()` and command line
    /// flags can still be layered on top. Callers MUST call `validate()`.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("RUNNER__CLUSTER__BINARY", "/opt/hyperdex/bin/hyperdex");
    /// let cfg = RunnerConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        self.cluster.validate()?;
        self.readiness.validate()?;
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
