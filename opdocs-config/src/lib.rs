//! Configuration loader for the opdocs generator.
//!
//! `defaults/opdocs.default.json` is embedded into the binary so that the documented
//! defaults and runtime behavior stay in sync. The user's JSON file is layered on top
//! via [`Loader`], then CLI overrides, before deserializing into [`OpdocsConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_JSON: &str = include_str!("../defaults/opdocs.default.json");

/// Top-level configuration for one ISA.
#[derive(Debug, Clone, Deserialize)]
pub struct OpdocsConfig {
    pub archive: ArchiveConfig,
    /// Base URL of the online documentation; every generated link starts with it.
    pub documentation: String,
    /// Instruction-set identifier, used to name the generated table.
    pub isa: String,
    /// Package declared by the generated Kotlin file.
    pub package: String,
    /// Document stems never extracted.
    pub ignored_files: Vec<String>,
    /// Document stems known to duplicate another page, never extracted.
    pub ignored_duplicates: Vec<String>,
    /// Heading qualifiers that let a second instruction share a mnemonic.
    pub disambiguating_qualifiers: Vec<String>,
}

/// Where the vendor documentation archive comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    pub url: String,
    /// File name of the downloaded archive.
    pub name: String,
    /// Directory the archive unpacks into, relative to the input folder.
    pub subdir: String,
}

impl OpdocsConfig {
    /// Stems excluded from corpus discovery.
    pub fn ignored_stems(&self) -> Vec<&str> {
        self.ignored_files
            .iter()
            .chain(&self.ignored_duplicates)
            .map(String::as_str)
            .collect()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let required = [
            ("archive.url", &self.archive.url),
            ("archive.name", &self.archive.name),
            ("archive.subdir", &self.archive.subdir),
            ("documentation", &self.documentation),
            ("isa", &self.isa),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("`{key}` must not be empty")));
            }
        }
        Ok(self)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_JSON, FileFormat::Json));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Json)
            .required(true);
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

    /// Finalize the builder, deserialize and check the required fields.
    pub fn build(self) -> Result<OpdocsConfig, ConfigError> {
        self.builder
            .build()?
            .try_deserialize::<OpdocsConfig>()?
            .validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<OpdocsConfig, ConfigError> {
    Loader::new().build()
}
