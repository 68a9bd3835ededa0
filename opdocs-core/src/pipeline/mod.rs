//! Collection pipeline: ordering, self-test, overlap report and key deduplication
//!
//! Input is every successfully extracted [`Instruction`]. The pipeline
//!
//! 1. sorts by source id (the only ordering the table guarantees),
//! 2. runs the self-test (every record must trace back to a document) and warns,
//! 3. reports overlapping name sets between instructions,
//! 4. builds the table, letting the first instruction in source order own a key unless
//!    the [`DisambiguationPolicy`] allows a second entry,
//! 5. re-runs the self-test and fails hard if it does not pass.
//!
//! Diagnostics accumulate in the returned [`PipelineReport`] as well as being logged.

mod ledger;
mod policy;
mod source_index;

pub use ledger::{Claim, KeyLedger};
pub use policy::{DisambiguationPolicy, FirstWins, HeadingSuffixPolicy};
pub use source_index::{DirectoryIndex, SourceIndex};

use crate::error::PipelineError;
use crate::instruction::Instruction;
use std::collections::BTreeSet;

/// One insertion into the generated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Lower-cased mnemonic used as the lookup key.
    pub key: String,
    /// Mnemonic in its original case.
    pub name: String,
    pub source_id: String,
    pub heading: String,
    pub brief: String,
    pub body_markdown: String,
}

/// The verified, ordered table handed to the emitters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTable {
    /// Number of instructions the table was built from.
    pub capacity: usize,
    pub entries: Vec<TableEntry>,
}

impl DocTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries registered under `key`, in insertion order.
    pub fn entries_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a TableEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.key == key)
    }
}

/// Names shared between an instruction and the ones sorted before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub source_id: String,
    pub names: BTreeSet<String>,
}

/// A table key dropped because an earlier instruction owned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub key: String,
    pub kept: String,
    pub discarded: String,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub table: DocTable,
    pub overlaps: Vec<Overlap>,
    pub duplicates: Vec<Duplicate>,
}

pub struct Pipeline<'a> {
    sources: &'a dyn SourceIndex,
    policy: &'a dyn DisambiguationPolicy,
}

impl<'a> Pipeline<'a> {
    pub fn new(sources: &'a dyn SourceIndex, policy: &'a dyn DisambiguationPolicy) -> Self {
        Self { sources, policy }
    }

    pub fn run(&self, mut instructions: Vec<Instruction>) -> Result<PipelineReport, PipelineError> {
        instructions.sort_by(|a, b| a.source_id().cmp(b.source_id()));

        self.self_test(&instructions);
        let overlaps = find_overlaps(&instructions);
        let (table, duplicates) = self.build_table(&instructions);

        let missing = self.self_test(&instructions);
        if !missing.is_empty() {
            return Err(PipelineError::Inconsistent { missing });
        }

        Ok(PipelineReport {
            table,
            overlaps,
            duplicates,
        })
    }

    /// Source ids without a backing document. Each one is logged.
    pub fn self_test(&self, instructions: &[Instruction]) -> Vec<String> {
        instructions
            .iter()
            .filter(|inst| !self.sources.contains(inst.source_id()))
            .map(|inst| {
                tracing::warn!(source_id = inst.source_id(), "instruction has no file associated");
                inst.source_id().to_string()
            })
            .collect()
    }

    fn build_table(&self, instructions: &[Instruction]) -> (DocTable, Vec<Duplicate>) {
        let mut ledger = KeyLedger::new();
        let mut entries = Vec::new();
        let mut duplicates = Vec::new();

        for (position, inst) in instructions.iter().enumerate() {
            let allow_shared = self.policy.allows_duplicate(inst.heading());
            for name in inst.names() {
                let key = name.to_lowercase();
                match ledger.claim(&key, position, allow_shared) {
                    Claim::Rejected { owner } => {
                        let kept = instructions[owner].source_id();
                        tracing::warn!(
                            key = %key,
                            kept,
                            discarded = inst.source_id(),
                            "duplicate mnemonic, keeping the earlier instruction"
                        );
                        duplicates.push(Duplicate {
                            key,
                            kept: kept.to_string(),
                            discarded: inst.source_id().to_string(),
                        });
                        continue;
                    }
                    Claim::Shared { previous } => {
                        tracing::debug!(
                            key = %key,
                            previous = instructions[previous].source_id(),
                            source_id = inst.source_id(),
                            "disambiguated duplicate kept"
                        );
                    }
                    Claim::Fresh => {}
                }
                entries.push(TableEntry {
                    key,
                    name: name.clone(),
                    source_id: inst.source_id().to_string(),
                    heading: inst.heading().to_string(),
                    brief: inst.brief().to_string(),
                    body_markdown: inst.body_markdown().to_string(),
                });
            }
        }

        let table = DocTable {
            capacity: instructions.len(),
            entries,
        };
        (table, duplicates)
    }
}

/// Compare each instruction's names with the union of all names sorted before it.
fn find_overlaps(instructions: &[Instruction]) -> Vec<Overlap> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut overlaps = Vec::new();

    for inst in instructions {
        let shared: BTreeSet<String> = inst
            .names()
            .iter()
            .filter(|name| seen.contains(name.as_str()))
            .cloned()
            .collect();
        if !shared.is_empty() {
            tracing::warn!(source_id = inst.source_id(), names = ?shared, "overlap in instruction names");
            overlaps.push(Overlap {
                source_id: inst.source_id().to_string(),
                names: shared,
            });
        }
        seen.extend(inst.names().iter().map(String::as_str));
    }

    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn inst(source_id: &str, heading: &str, names: &[&str]) -> Instruction {
        Instruction::new(
            source_id,
            heading,
            names.iter().map(|s| s.to_string()).collect(),
            "brief",
            "tooltip",
            format!("body of {source_id}"),
        )
        .unwrap()
    }

    fn index(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_by_source_id() {
        let sources = index(&["b", "a", "c"]);
        let policy = HeadingSuffixPolicy::default();
        let report = Pipeline::new(&sources, &policy)
            .run(vec![
                inst("c", "C", &["C"]),
                inst("a", "A", &["A"]),
                inst("b", "B", &["B"]),
            ])
            .unwrap();

        let ids: Vec<_> = report.table.entries.iter().map(|e| e.source_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(report.table.capacity, 3);
    }

    #[test]
    fn test_first_source_wins_on_duplicate() {
        let sources = index(&["add", "addx"]);
        let policy = HeadingSuffixPolicy::default();
        let report = Pipeline::new(&sources, &policy)
            .run(vec![inst("addx", "ADDX", &["ADD"]), inst("add", "ADD", &["ADD"])])
            .unwrap();

        let entries: Vec<_> = report.table.entries_for("add").collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_id, "add");
        assert_eq!(
            report.duplicates,
            vec![Duplicate {
                key: "add".to_string(),
                kept: "add".to_string(),
                discarded: "addx".to_string(),
            }]
        );
    }

    #[test]
    fn test_disambiguated_headings_both_kept() {
        let sources = index(&["add_imm", "add_reg"]);
        let policy = HeadingSuffixPolicy::default();
        let report = Pipeline::new(&sources, &policy)
            .run(vec![
                inst("add_imm", "ADD (immediate)", &["ADD"]),
                inst("add_reg", "ADD (register)", &["ADD"]),
            ])
            .unwrap();

        let owners: Vec<_> = report
            .table
            .entries_for("add")
            .map(|e| e.source_id.as_str())
            .collect();
        assert_eq!(owners, vec!["add_imm", "add_reg"]);
        assert!(report.duplicates.is_empty());
    }

    #[test]
    fn test_duplicate_skips_only_the_colliding_name() {
        let sources = index(&["a", "b"]);
        let policy = FirstWins;
        let report = Pipeline::new(&sources, &policy)
            .run(vec![inst("a", "A", &["MOV"]), inst("b", "B", &["MOV", "MOVK"])])
            .unwrap();

        let keys: Vec<_> = report.table.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["mov", "movk"]);
    }

    #[test]
    fn test_keys_are_lowercased_and_names_keep_case() {
        let sources = index(&["b_cond"]);
        let policy = HeadingSuffixPolicy::default();
        let report = Pipeline::new(&sources, &policy)
            .run(vec![inst("b_cond", "B.cond", &["B.EQ"])])
            .unwrap();
        assert_eq!(report.table.entries[0].key, "b.eq");
        assert_eq!(report.table.entries[0].name, "B.EQ");
    }

    #[test]
    fn test_case_variants_within_one_instruction() {
        let sources = index(&["a"]);
        let policy = FirstWins;
        let report = Pipeline::new(&sources, &policy)
            .run(vec![inst("a", "A", &["Add", "ADD"])])
            .unwrap();
        assert_eq!(report.table.entries_for("add").count(), 2);
    }

    #[test]
    fn test_overlaps_reported_not_fatal() {
        let sources = index(&["a", "b"]);
        let policy = FirstWins;
        let report = Pipeline::new(&sources, &policy)
            .run(vec![inst("a", "A", &["X", "Y"]), inst("b", "B", &["Y", "Z"])])
            .unwrap();
        assert_eq!(
            report.overlaps,
            vec![Overlap {
                source_id: "b".to_string(),
                names: ["Y".to_string()].into_iter().collect(),
            }]
        );
    }

    #[test]
    fn test_same_stem_in_two_directories_is_a_duplicate() {
        let sources = index(&["add"]);
        let policy = HeadingSuffixPolicy::default();
        let report = Pipeline::new(&sources, &policy)
            .run(vec![inst("add", "ADD", &["ADD"]), inst("add", "ADD", &["ADD"])])
            .unwrap();

        assert_eq!(report.table.entries_for("add").count(), 1);
        assert_eq!(
            report.duplicates,
            vec![Duplicate {
                key: "add".to_string(),
                kept: "add".to_string(),
                discarded: "add".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_source_aborts() {
        let sources = index(&["add"]);
        let policy = HeadingSuffixPolicy::default();
        let err = Pipeline::new(&sources, &policy)
            .run(vec![inst("add", "ADD", &["ADD"]), inst("ghost", "GHOST", &["GHOST"])])
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Inconsistent {
                missing: vec!["ghost".to_string()]
            }
        );
    }
}
