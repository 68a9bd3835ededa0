//! Markdown rendering of normalized bodies
//!
//! Pipeline: [`Block`] tree → Comrak AST → CommonMark string. We never write markdown
//! by hand; comrak's formatter handles escaping and list layout.

use crate::document::{Block, Inline, ListItem};
use crate::error::RenderError;
use comrak::nodes::{Ast, AstNode, ListDelimType, ListType, NodeValue};
use comrak::{format_commonmark, Arena, ComrakOptions};
use std::cell::RefCell;

/// Render blocks to a markdown string. The result carries no leading or trailing
/// whitespace; an empty block list renders to an empty string.
pub fn render(blocks: &[Block]) -> Result<String, RenderError> {
    if blocks.is_empty() {
        return Ok(String::new());
    }

    let arena = Arena::new();
    let root = new_node(&arena, NodeValue::Document);
    for block in blocks {
        append_block(&arena, root, block);
    }

    let mut output = Vec::new();
    format_commonmark(root, &default_comrak_options(), &mut output)?;
    let markdown = String::from_utf8(output)?;

    // Comrak separates adjacent lists with an HTML comment; the table has no use for it.
    Ok(markdown
        .replace("<!-- end list -->\n\n", "")
        .trim()
        .to_string())
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    // 0 disables re-wrapping of long paragraphs.
    options.render.width = 0;
    options
}

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn append_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, block: &Block) {
    match block {
        Block::Paragraph(inlines) => {
            let para = new_node(arena, NodeValue::Paragraph);
            parent.append(para);
            for inline in inlines {
                append_inline(arena, para, inline);
            }
        }
        Block::List(items) => {
            let list = new_node(arena, NodeValue::List(bullet_list()));
            parent.append(list);
            for item in items {
                append_item(arena, list, item);
            }
        }
    }
}

fn append_item<'a>(arena: &'a Arena<AstNode<'a>>, list: &'a AstNode<'a>, item: &ListItem) {
    let node = new_node(arena, NodeValue::Item(bullet_list()));
    list.append(node);
    for block in &item.0 {
        append_block(arena, node, block);
    }
}

fn append_inline<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, inline: &Inline) {
    let value = match inline {
        Inline::Text(text) => NodeValue::Text(text.clone()),
        Inline::Code(code) => NodeValue::Code(comrak::nodes::NodeCode {
            num_backticks: 1,
            literal: code.clone(),
        }),
    };
    parent.append(new_node(arena, value));
}

fn bullet_list() -> comrak::nodes::NodeList {
    comrak::nodes::NodeList {
        list_type: ListType::Bullet,
        marker_offset: 0,
        padding: 0,
        start: 1,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: true,
    }
}
