//! Instruction documentation tables from vendor ISA XML
//!
//!     This crate turns a corpus of per-instruction XML documents (as shipped in the Arm
//!     A64 ISA archive) into a string-keyed lookup table from mnemonic to a short
//!     Markdown description and documentation link, emitted as generated source code.
//!
//! Architecture
//!
//!     raw documents → document::extract (MnemonicExpander, markdown::render)
//!                   → Vec<Instruction>
//!                   → Pipeline (sort, self-test, overlaps, dedup)
//!                   → DocTable
//!                   → TableFormat (via FormatRegistry)
//!
//!     This is a pure lib: it powers the opdocs cli but is shell agnostic. Nothing here
//!     prints, reads env vars or downloads; diagnostics go through `tracing`.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── instruction.rs          # The Instruction record
//!     ├── mnemonic.rs             # Template expansion of mnemonic names
//!     ├── document                # XML → Instruction
//!     │   ├── dom.rs              # Parsing and DOM queries
//!     │   └── tree.rs             # Normalized body tree
//!     ├── markdown.rs             # Body tree → Markdown via comrak
//!     ├── corpus.rs               # Directory discovery and bulk extraction
//!     ├── pipeline                # Ordering, checks and dedup
//!     ├── links.rs                # Documentation URLs
//!     ├── format.rs               # TableFormat trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── kotlin.rs
//!     │   └── json.rs
//!     └── lib.rs
//!
//! Implementation Principles
//!
//!     We never write markdown or XML parsers by hand: xml5ever builds the DOM and comrak
//!     serializes the body. The work here is adapting one tree into the other.
//!
//!     Per-document problems are soft (the document is skipped and logged). A table whose
//!     instructions cannot all be traced back to a source document is never emitted.

pub mod corpus;
pub mod document;
pub mod error;
pub mod format;
pub mod formats;
pub mod instruction;
pub mod links;
pub mod markdown;
pub mod mnemonic;
pub mod pipeline;
pub mod registry;

pub use corpus::{Corpus, ExtractionOutcome};
pub use error::{CorpusError, EmitError, ExtractError, PipelineError, RenderError};
pub use format::{EmitOptions, TableFormat};
pub use instruction::Instruction;
pub use mnemonic::MnemonicExpander;
pub use pipeline::{DocTable, Pipeline, PipelineReport, TableEntry};
pub use registry::FormatRegistry;
