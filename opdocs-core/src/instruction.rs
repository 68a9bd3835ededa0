//! The canonical per-document record

use std::collections::BTreeSet;

/// Characters stripped from the end of a tooltip.
const TOOLTIP_TRAILING: &[char] = &[':', ',', ' '];

/// One documented instruction, extracted from exactly one source document.
///
/// Records are immutable once built; everything downstream of the extractor only
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    source_id: String,
    heading: String,
    names: BTreeSet<String>,
    brief: String,
    tooltip: String,
    body_markdown: String,
}

impl Instruction {
    /// Build a record. Returns `None` when `names` is empty, since such a record
    /// could never produce a table entry.
    pub fn new(
        source_id: impl Into<String>,
        heading: impl Into<String>,
        names: BTreeSet<String>,
        brief: impl Into<String>,
        tooltip: &str,
        body_markdown: impl Into<String>,
    ) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        Some(Self {
            source_id: source_id.into(),
            heading: heading.into(),
            names,
            brief: brief.into(),
            tooltip: tooltip.trim_end_matches(TOOLTIP_TRAILING).to_string(),
            body_markdown: body_markdown.into(),
        })
    }

    /// File stem of the originating document.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Expanded mnemonic names, in sorted order.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn brief(&self) -> &str {
        &self.brief
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn body_markdown(&self) -> &str {
        &self.body_markdown
    }
}
