//! Small read-only helpers over the `markup5ever_rcdom` tree
//!
//! The XML is parsed once with `xml5ever`; nothing here mutates the DOM. Lookups follow
//! the vendor documents' loose structure: sections are found as the first matching
//! descendant rather than by exact path.

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use xml5ever::driver::{parse_document, XmlParseOpts};
use xml5ever::tendril::TendrilSink;

/// Parse XML markup into a DOM. The parser recovers from malformed input.
pub fn parse(markup: &str) -> RcDom {
    parse_document(RcDom::default(), XmlParseOpts::default()).one(markup)
}

/// Local name of an element, `None` for text, comments and the document node.
pub fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(handle: &Handle, tag: &str) -> bool {
    element_name(handle) == Some(tag)
}

/// First descendant element named `tag`, in document order. `handle` itself is not
/// considered.
pub fn find_first(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if is_element(child, tag) {
            return Some(child.clone());
        }
        if let Some(found) = find_first(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Value of the attribute `name` on an element.
pub fn attribute(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Concatenated text of every descendant text node.
pub fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

/// Text of the node, or `None` for anything that is not a text node.
pub fn text_of(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Snapshot of the node's children, so callers can recurse without holding a borrow.
pub fn children(handle: &Handle) -> Vec<Handle> {
    handle.children.borrow().clone()
}
