//! Table format trait definition
//!
//! A table format turns a verified [`DocTable`] into the text of a generated source
//! file. Formats never see instructions that failed the pipeline's checks.

use crate::error::EmitError;
use crate::pipeline::DocTable;

/// Values every format needs besides the table itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Instruction-set identifier, e.g. `aarch64`. Names the generated table.
    pub isa: String,
    /// Package or namespace the generated file declares.
    pub package: String,
    /// Base URL prepended to every documentation link.
    pub documentation: String,
}

/// Trait for output formats
///
/// ```ignore
/// struct MyFormat;
///
/// impl TableFormat for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn file_extension(&self) -> &str {
///         "txt"
///     }
///
///     fn emit(&self, table: &DocTable, options: &EmitOptions) -> Result<String, EmitError> {
///         todo!()
///     }
/// }
/// ```
pub trait TableFormat: Send + Sync {
    /// The name of this format (e.g., "kotlin", "json")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extension of the generated file, without the dot.
    fn file_extension(&self) -> &str;

    fn emit(&self, table: &DocTable, options: &EmitOptions) -> Result<String, EmitError>;
}
