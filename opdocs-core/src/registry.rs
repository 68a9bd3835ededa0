//! Format registry for format discovery and selection

use crate::error::EmitError;
use crate::format::{EmitOptions, TableFormat};
use crate::pipeline::DocTable;
use std::collections::HashMap;

/// Registry of table formats, keyed by name.
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let source = registry.emit(&table, &options, "kotlin")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn TableFormat>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: TableFormat + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn TableFormat, EmitError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| EmitError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Emit a table using the named format
    pub fn emit(
        &self,
        table: &DocTable,
        options: &EmitOptions,
        format: &str,
    ) -> Result<String, EmitError> {
        self.get(format)?.emit(table, options)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::kotlin::KotlinScatterMap);
        registry.register(crate::formats::json::JsonTable);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
