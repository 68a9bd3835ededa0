//! Discovery and bulk extraction of a documentation corpus
//!
//! A corpus is a directory tree of per-instruction `*.xml` documents. The source id of
//! each document is its file stem.

use crate::document;
use crate::error::{CorpusError, ExtractError};
use crate::instruction::Instruction;
use crate::mnemonic::MnemonicExpander;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Aggregate file shipped in the vendor archive alongside the per-instruction ones.
pub const AGGREGATE_FILE: &str = "onebigfile.xml";

/// The documents found under a corpus root, sorted by path.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    documents: Vec<PathBuf>,
}

/// Result of extracting every document in a corpus.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub instructions: Vec<Instruction>,
    /// Documents that could not be turned into an instruction.
    pub skipped: Vec<ExtractError>,
}

impl Corpus {
    /// Walk `root` recursively for `*.xml` documents, leaving out the aggregate file and
    /// any document whose stem is listed in `ignored`.
    pub fn discover<S: AsRef<str>>(root: &Path, ignored: &[S]) -> Result<Self, CorpusError> {
        let ignored: HashSet<&str> = ignored.iter().map(AsRef::as_ref).collect();
        let mut documents = Vec::new();
        walk(root, &mut documents)?;
        documents.retain(|path| {
            let keep = path.file_name().and_then(|n| n.to_str()) != Some(AGGREGATE_FILE)
                && !source_id(path).is_some_and(|id| ignored.contains(id));
            if !keep {
                tracing::debug!(path = %path.display(), "ignoring document");
            }
            keep
        });
        documents.sort();
        tracing::info!(root = %root.display(), count = documents.len(), "discovered documents");

        Ok(Self {
            root: root.to_path_buf(),
            documents,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Read and extract every document. Extraction failures are logged and collected in
    /// [`ExtractionOutcome::skipped`]; read failures abort.
    pub fn extract_all(&self, expander: &MnemonicExpander) -> Result<ExtractionOutcome, CorpusError> {
        let mut outcome = ExtractionOutcome::default();
        for path in &self.documents {
            let Some(id) = source_id(path) else {
                tracing::warn!(path = %path.display(), "document name is not valid UTF-8, skipping");
                continue;
            };
            let markup = fs::read_to_string(path).map_err(|source| CorpusError::Io {
                path: path.clone(),
                source,
            })?;
            match document::extract(id, &markup, expander) {
                Ok(instruction) => {
                    tracing::debug!(source_id = id, names = ?instruction.names(), "extracted");
                    outcome.instructions.push(instruction);
                }
                Err(err) => {
                    tracing::warn!(source_id = id, error = %err, "failed to parse document");
                    outcome.skipped.push(err);
                }
            }
        }
        tracing::info!(
            extracted = outcome.instructions.len(),
            skipped = outcome.skipped.len(),
            "extraction finished"
        );
        Ok(outcome)
    }
}

fn source_id(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

fn walk(dir: &Path, documents: &mut Vec<PathBuf>) -> Result<(), CorpusError> {
    let io_err = |source| CorpusError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        // Symlinks are not followed, so a link cycle cannot recurse forever.
        let is_dir = entry.file_type().map_err(io_err)?.is_dir();
        let path = entry.path();
        if is_dir {
            walk(&path, documents)?;
        } else if path.extension().is_some_and(|ext| ext == "xml") {
            documents.push(path);
        }
    }
    Ok(())
}
