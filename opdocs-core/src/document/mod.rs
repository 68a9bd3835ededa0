//! Per-instruction document extraction
//!
//! Turns one vendor XML document into an [`Instruction`]. The expected shape is:
//!
//! ```text
//! <instructionsection id="..." title="ADD, ADDS (immediate)">
//!   <heading>ADD (immediate)</heading>
//!   <desc>
//!     <brief><para>Add (immediate)</para></brief>
//!     <authored>            (or <description>)
//!       <para>...</para>
//!       <list><listitem><content>...</content></listitem></list>
//!     </authored>
//!   </desc>
//! </instructionsection>
//! ```
//!
//! Missing optional pieces fall back (heading → source id, brief → empty). A missing
//! `instructionsection`, an empty mnemonic set or a missing body yields an
//! [`ExtractError`]; no partial record is ever produced.

pub mod dom;
pub mod tree;

use crate::error::ExtractError;
use crate::instruction::Instruction;
use crate::markdown;
use crate::mnemonic::MnemonicExpander;
use markup5ever_rcdom::Handle;

pub use tree::{Block, Inline, ListItem};

/// Extract an instruction record from raw document markup.
pub fn extract(
    source_id: &str,
    markup: &str,
    expander: &MnemonicExpander,
) -> Result<Instruction, ExtractError> {
    let dom = dom::parse(markup);
    let root = &dom.document;

    let section = dom::find_first(root, "instructionsection")
        .ok_or_else(|| ExtractError::MissingInstructionSection(source_id.to_string()))?;

    let heading = dom::find_first(root, "heading")
        .map(|node| dom::text_content(&node).trim().to_string())
        .unwrap_or_else(|| source_id.to_string());

    let names = dom::attribute(&section, "title")
        .map(|title| expander.expand_title(&title))
        .unwrap_or_default();

    let desc = dom::find_first(&section, "desc");
    let brief = desc.as_ref().map(brief_text).unwrap_or_default();

    let part = desc
        .as_ref()
        .and_then(|desc| {
            dom::find_first(desc, "authored").or_else(|| dom::find_first(desc, "description"))
        })
        .ok_or_else(|| ExtractError::MissingBody(source_id.to_string()))?;

    let blocks = tree::normalize_body(&part);
    let tooltip = blocks
        .first()
        .map(|block| block.plain_text().trim().to_string())
        .unwrap_or_default();
    let body = markdown::render(&blocks).map_err(|source| ExtractError::Render {
        source_id: source_id.to_string(),
        source,
    })?;

    Instruction::new(source_id, heading, names, brief, &tooltip, body)
        .ok_or_else(|| ExtractError::NoMnemonics(source_id.to_string()))
}

/// Brief summary: empty unless the `brief` node wraps a `para`.
fn brief_text(desc: &Handle) -> String {
    match dom::find_first(desc, "brief") {
        Some(brief) if dom::find_first(&brief, "para").is_some() => {
            dom::text_content(&brief).trim().to_string()
        }
        _ => String::new(),
    }
}
