//! Error types for the extraction pipeline
//!
//! Extraction and rendering failures are soft: the corpus loop logs them and drops the
//! document. Pipeline, corpus and emission failures surface to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single instruction document could not be turned into an [`crate::Instruction`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}: failed to find instructionsection")]
    MissingInstructionSection(String),

    #[error("{0}: title attribute yields no mnemonic")]
    NoMnemonics(String),

    #[error("{0}: neither authored nor description content found")]
    MissingBody(String),

    #[error("{source_id}: {source}")]
    Render {
        source_id: String,
        #[source]
        source: RenderError,
    },
}

impl ExtractError {
    /// Identifier of the document that failed.
    pub fn source_id(&self) -> &str {
        match self {
            ExtractError::MissingInstructionSection(id)
            | ExtractError::NoMnemonics(id)
            | ExtractError::MissingBody(id) => id,
            ExtractError::Render { source_id, .. } => source_id,
        }
    }
}

/// Markdown rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("comrak serialization failed: {0}")]
    Serialization(#[from] std::io::Error),

    #[error("rendered markdown is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Consistency failures detected by the collection pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("self-test failed: {} instruction(s) without a source document: {}", .missing.len(), .missing.join(", "))]
    Inconsistent { missing: Vec<String> },
}

/// Failures while turning a table into its textual form.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("unknown table format '{0}'")]
    FormatNotFound(String),

    #[error("table serialization failed: {0}")]
    Serialization(String),
}

/// I/O failures while walking or reading the documentation corpus. These are fatal.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
