//! Lookup of the documents backing each instruction

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Answers whether a source document exists for a given source id.
pub trait SourceIndex {
    fn contains(&self, source_id: &str) -> bool;
}

/// Checks `<root>/<source_id>.xml` on disk at the time of the query.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    root: PathBuf,
}

impl DirectoryIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, source_id: &str) -> PathBuf {
        self.root.join(format!("{source_id}.xml"))
    }
}

impl SourceIndex for DirectoryIndex {
    fn contains(&self, source_id: &str) -> bool {
        self.path_for(source_id).is_file()
    }
}

impl SourceIndex for HashSet<String> {
    fn contains(&self, source_id: &str) -> bool {
        HashSet::contains(self, source_id)
    }
}
