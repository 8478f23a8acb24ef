//! Shared configuration loader for the stratbook tools.
//!
//! `defaults/stratbook.default.toml` is embedded into every binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults via
//! [`Loader`] before deserializing into [`StratbookConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stratbook_annotation::{AllocationPolicy, MergeOptions, TokenBoundary};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/stratbook.default.toml");

/// Project-local configuration file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "stratbook.toml";

/// Top-level configuration consumed by stratbook applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StratbookConfig {
    pub merge: MergeConfig,
    pub library: LibraryConfig,
    pub logging: LoggingConfig,
}

/// Defaults for `stratbook merge`.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    pub output: PathBuf,
    pub policy: AllocationPolicy,
    pub boundary: TokenBoundary,
}

impl MergeConfig {
    pub fn options(&self) -> MergeOptions {
        MergeOptions::new(self.policy).with_boundary(self.boundary)
    }
}

/// Where the annotation library lives.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    pub tags_path: PathBuf,
    pub annotation_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// A `tracing` filter directive such as `warn` or `stratbook_annotation=debug`
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<StratbookConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<StratbookConfig, ConfigError> {
    Loader::new().build()
}
