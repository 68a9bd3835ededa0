//! Normalized body structure
//!
//! The vendor markup mixes `para`, `list`/`listitem`/`content`, inline `value` and
//! `instruction` elements and decorative `image`s. [`normalize_body`] maps that markup
//! onto a small owned tree of [`Block`]s that the markdown renderer consumes. The DOM
//! is only read, never retagged in place.
//!
//! | Vendor element            | Normalized                     |
//! |---------------------------|--------------------------------|
//! | `para`                    | [`Block::Paragraph`]           |
//! | `list`                    | [`Block::List`] (unordered)    |
//! | `listitem` / `content`    | [`ListItem`] (wrapper dropped) |
//! | `value`, `instruction`    | [`Inline::Code`]               |
//! | `image`                   | removed                        |
//! | anything else inline      | its text                       |

use super::dom;
use markup5ever_rcdom::Handle;

const CODE_ELEMENTS: &[&str] = &["value", "instruction"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem(pub Vec<Block>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    List(Vec<ListItem>),
}

impl Block {
    /// Plain text of the block, code spans included without delimiters.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(inlines) => inline_text(inlines),
            Block::List(items) => items
                .iter()
                .map(|item| {
                    item.0
                        .iter()
                        .map(Block::plain_text)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn inline_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) | Inline::Code(text) => text.as_str(),
        })
        .collect()
}

/// Normalize the direct children of an `authored` or `description` element.
///
/// Only `para` and `list` children produce blocks; everything else at this level is
/// ignored. Paragraphs without any text are dropped.
pub fn normalize_body(part: &Handle) -> Vec<Block> {
    dom::children(part)
        .iter()
        .filter_map(|child| match dom::element_name(child) {
            Some("para") => paragraph(child),
            Some("list") => Some(list(child)),
            _ => None,
        })
        .collect()
}

fn paragraph(node: &Handle) -> Option<Block> {
    let inlines = finish_inlines(collect_inlines(node));
    (!inlines.is_empty()).then_some(Block::Paragraph(inlines))
}

fn list(node: &Handle) -> Block {
    let items = dom::children(node)
        .iter()
        .filter(|child| dom::is_element(child, "listitem"))
        .map(list_item)
        .collect();
    Block::List(items)
}

fn list_item(node: &Handle) -> ListItem {
    let mut blocks = Vec::new();
    let mut pending = Vec::new();
    item_blocks(node, &mut blocks, &mut pending);
    flush_pending(&mut blocks, &mut pending);
    ListItem(blocks)
}

/// Walk a list item, unwrapping `content` wrappers. Runs of inline content between
/// block-level children become implicit paragraphs.
fn item_blocks(node: &Handle, blocks: &mut Vec<Block>, pending: &mut Vec<Inline>) {
    for child in dom::children(node) {
        match dom::element_name(&child) {
            Some("content") => item_blocks(&child, blocks, pending),
            Some("para") => {
                flush_pending(blocks, pending);
                blocks.extend(paragraph(&child));
            }
            Some("list") => {
                flush_pending(blocks, pending);
                blocks.push(list(&child));
            }
            _ => push_inline_node(&child, pending),
        }
    }
}

fn flush_pending(blocks: &mut Vec<Block>, pending: &mut Vec<Inline>) {
    let inlines = finish_inlines(std::mem::take(pending));
    if !inlines.is_empty() {
        blocks.push(Block::Paragraph(inlines));
    }
}

fn collect_inlines(node: &Handle) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for child in dom::children(node) {
        push_inline_node(&child, &mut inlines);
    }
    inlines
}

fn push_inline_node(node: &Handle, inlines: &mut Vec<Inline>) {
    if let Some(text) = dom::text_of(node) {
        push_text(inlines, &text);
        return;
    }
    match dom::element_name(node) {
        Some("image") | None => {}
        Some(name) if CODE_ELEMENTS.contains(&name) => {
            let code = collapse_whitespace(&dom::text_content(node));
            let code = code.trim();
            if !code.is_empty() {
                inlines.push(Inline::Code(code.to_string()));
            }
        }
        Some(_) => {
            for child in dom::children(node) {
                push_inline_node(&child, inlines);
            }
        }
    }
}

/// Append text, merging with a preceding text run.
fn push_text(inlines: &mut Vec<Inline>, text: &str) {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        if last.ends_with(' ') && text.starts_with(' ') {
            last.push_str(&text[1..]);
        } else {
            last.push_str(&text);
        }
        return;
    }
    inlines.push(Inline::Text(text));
}

/// Trim the outer edges of an inline run and drop text left empty.
fn finish_inlines(mut inlines: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(first)) = inlines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        *last = last.trim_end().to_string();
    }
    inlines.retain(|inline| !matches!(inline, Inline::Text(text) if text.is_empty()));
    inlines
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(markup: &str) -> Vec<Block> {
        let dom = dom::parse(markup);
        let part = dom::find_first(&dom.document, "authored").unwrap();
        normalize_body(&part)
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn code(s: &str) -> Inline {
        Inline::Code(s.to_string())
    }

    #[test]
    fn test_paragraph_with_code() {
        let blocks = body(
            "<authored><para>Writes <value>Rd</value>\n   to the\tdestination.</para></authored>",
        );
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                text("Writes "),
                code("Rd"),
                text(" to the destination.")
            ])]
        );
    }

    #[test]
    fn test_images_removed() {
        let blocks = body(
            "<authored><para>See <image file=\"a.svg\"/>figure.</para><image file=\"b.svg\"/></authored>",
        );
        assert_eq!(blocks, vec![Block::Paragraph(vec![text("See figure.")])]);
    }

    #[test]
    fn test_list_items_unwrap_content() {
        let blocks = body(
            "<authored><list type=\"unordered\">\
             <listitem><content>First <instruction>ADD</instruction></content></listitem>\
             <listitem><content>Second</content></listitem>\
             </list></authored>",
        );
        assert_eq!(
            blocks,
            vec![Block::List(vec![
                ListItem(vec![Block::Paragraph(vec![text("First "), code("ADD")])]),
                ListItem(vec![Block::Paragraph(vec![text("Second")])]),
            ])]
        );
    }

    #[test]
    fn test_nested_list_in_item() {
        let blocks = body(
            "<authored><list><listitem><content>Outer\
             <list><listitem><content>Inner</content></listitem></list>\
             </content></listitem></list></authored>",
        );
        let Block::List(items) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items[0].0.len(), 2);
        assert!(matches!(items[0].0[1], Block::List(_)));
    }

    #[test]
    fn test_other_top_level_elements_ignored() {
        let blocks = body(
            "<authored><note>Ignored</note><para>Kept</para><para>  </para></authored>",
        );
        assert_eq!(blocks, vec![Block::Paragraph(vec![text("Kept")])]);
    }

    #[test]
    fn test_plain_text_includes_code() {
        let block = Block::Paragraph(vec![text("Add "), code("X1"), text(".")]);
        assert_eq!(block.plain_text(), "Add X1.");
    }
}
