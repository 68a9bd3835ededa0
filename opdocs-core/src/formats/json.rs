//! JSON table format
//!
//! A language-neutral dump of the table, for consumers that are not Kotlin builds:
//!
//! ```text
//! {
//!   "isa": "aarch64",
//!   "capacity": 1,
//!   "entries": [
//!     { "key": "add", "name": "ADD", "body": "...", "url": "..." }
//!   ]
//! }
//! ```

use crate::error::EmitError;
use crate::format::{EmitOptions, TableFormat};
use crate::links::doc_url;
use crate::pipeline::DocTable;
use serde::Serialize;

pub struct JsonTable;

#[derive(Serialize)]
struct JsonDocument<'a> {
    isa: &'a str,
    capacity: usize,
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    key: &'a str,
    name: &'a str,
    source_id: &'a str,
    body: &'a str,
    url: String,
}

impl TableFormat for JsonTable {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON document listing every table entry"
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn emit(&self, table: &DocTable, options: &EmitOptions) -> Result<String, EmitError> {
        let document = JsonDocument {
            isa: &options.isa,
            capacity: table.capacity,
            entries: table
                .entries
                .iter()
                .map(|entry| JsonEntry {
                    key: &entry.key,
                    name: &entry.name,
                    source_id: &entry.source_id,
                    body: &entry.body_markdown,
                    url: doc_url(&options.documentation, &entry.heading, &entry.brief),
                })
                .collect(),
        };
        let mut json = serde_json::to_string_pretty(&document)
            .map_err(|e| EmitError::Serialization(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}
