//! Kotlin `ScatterMap` table format
//!
//! Emits one `MutableScatterMap<String, OpCodeDoc>` whose capacity is the number of
//! instructions, followed by one insertion per table entry:
//!
//! ```text
//! val Aarch64Docs = MutableScatterMap<String, OpCodeDoc>(1).apply {
//!     this["add"] = OpCodeDoc(
//!         "ADD",
//!         """Adds `Rn` and `Rm`.""",
//!         "https://.../ADD--register---Add--register--"
//!     )
//! } as ScatterMap<String, OpCodeDoc>
//! ```
//!
//! Bodies are raw strings. A body can never close its own literal: `$` is emitted as
//! `${'$'}`, and a quote that would form `"""` with its neighbours is emitted as `${'"'}`.

use crate::error::EmitError;
use crate::format::{EmitOptions, TableFormat};
use crate::links::{capitalize, doc_url};
use crate::pipeline::DocTable;
use std::fmt::Write;

const HEADER: &str = "// NOTE: AUTO-GENERATED FILE, DO NOT MODIFY!\n";
const QUOTE_TEMPLATE: &str = "${'\"'}";
const DOLLAR_TEMPLATE: &str = "${'$'}";

pub struct KotlinScatterMap;

impl TableFormat for KotlinScatterMap {
    fn name(&self) -> &str {
        "kotlin"
    }

    fn description(&self) -> &str {
        "Kotlin source declaring a MutableScatterMap<String, OpCodeDoc>"
    }

    fn file_extension(&self) -> &str {
        "kt"
    }

    fn emit(&self, table: &DocTable, options: &EmitOptions) -> Result<String, EmitError> {
        write_table(table, options).map_err(|e| EmitError::Serialization(e.to_string()))
    }
}

fn write_table(table: &DocTable, options: &EmitOptions) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out, "package {}", options.package)?;
    writeln!(out)?;
    writeln!(out, "import androidx.collection.MutableScatterMap")?;
    writeln!(out)?;
    writeln!(
        out,
        "val {}Docs = MutableScatterMap<String, OpCodeDoc>({}).apply {{",
        capitalize(&options.isa),
        table.capacity
    )?;
    for entry in &table.entries {
        let url = doc_url(&options.documentation, &entry.heading, &entry.brief);
        writeln!(out, "    this[{}] = OpCodeDoc(", string_literal(&entry.key))?;
        writeln!(out, "        {},", string_literal(&entry.name))?;
        writeln!(out, "        \"\"\"{}\"\"\",", raw_string_body(&entry.body_markdown))?;
        writeln!(out, "        {}", string_literal(&url))?;
        writeln!(out, "    )")?;
    }
    writeln!(out, "}} as ScatterMap<String, OpCodeDoc>")?;
    Ok(out)
}

/// Quoted Kotlin string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Contents of a Kotlin raw string. Raw strings have no escapes, so `$` and quotes
/// that could end the literal are written as template expressions.
fn raw_string_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut quotes = 0usize;
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                // A third consecutive quote, or a quote run touching the closing
                // delimiter, would terminate the literal.
                if quotes == 2 || chars.peek().is_none() {
                    out.push_str(QUOTE_TEMPLATE);
                    quotes = 0;
                } else {
                    out.push('"');
                    quotes += 1;
                }
            }
            '$' => {
                out.push_str(DOLLAR_TEMPLATE);
                quotes = 0;
            }
            c => {
                out.push(c);
                quotes = 0;
            }
        }
    }
    out
}
