//! DOM helpers over the mutable `kuchikikiki` tree.
//!
//! Everything that needs to read or splice the tree goes through these
//! functions so the scoring and cleaning passes stay free of node-data
//! matching.

use crate::error::{ReaderError, Result};
use kuchikikiki::iter::NodeIterator;
use kuchikikiki::traits::TendrilSink;
use kuchikikiki::{NodeData, NodeRef};

/// Parse a complete HTML document.
pub fn parse_document(html: &str) -> NodeRef {
    kuchikikiki::parse_html().one(html)
}

/// Parse body markup into a detached `<body>` element.
///
/// The explicit wrapper keeps head-only tags (`<style>`, `<meta>`) inside the
/// body instead of letting the parser hoist them into `<head>`.
pub fn parse_body(markup: &str) -> Result<NodeRef> {
    let document = parse_document(&format!(
        "<html><head></head><body>{}</body></html>",
        markup
    ));
    let body = body_of(&document)
        .ok_or_else(|| ReaderError::InvalidDocument("parsed markup has no body".to_string()))?;
    body.detach();
    Ok(body)
}

/// The `<body>` element of a document, if any.
pub fn body_of(document: &NodeRef) -> Option<NodeRef> {
    document
        .select_first("body")
        .ok()
        .map(|body| body.as_node().clone())
}

/// Create a detached element with the given tag name.
pub fn create_element(tag: &str) -> Result<NodeRef> {
    let body = parse_body(&format!("<{tag}></{tag}>", tag = tag))?;
    let element = body
        .select_first(tag)
        .map_err(|_| ReaderError::InvalidDocument(format!("cannot create <{}>", tag)))?
        .as_node()
        .clone();
    element.detach();
    Ok(element)
}

/// Lowercase local name of an element node.
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.as_element()
        .map_or(false, |element| &*element.name.local == tag)
}

pub fn is_element(node: &NodeRef) -> bool {
    node.as_element().is_some()
}

pub fn get_attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(element) = node.as_element() {
        element
            .attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .map_or(false, |element| element.attributes.borrow_mut().remove(name).is_some())
}

/// The `class` attribute, or an empty string.
pub fn class_name(node: &NodeRef) -> String {
    get_attr(node, "class").unwrap_or_default()
}

/// The `id` attribute, or an empty string.
pub fn id(node: &NodeRef) -> String {
    get_attr(node, "id").unwrap_or_default()
}

/// Descendant elements (excluding `node` itself) with the given tag, in document order.
pub fn elements_by_tag(node: &NodeRef, tag: &str) -> Vec<NodeRef> {
    node.descendants()
        .elements()
        .filter(|element| &*element.name.local == tag)
        .map(|element| element.as_node().clone())
        .collect()
}

pub fn count_by_tag(node: &NodeRef, tag: &str) -> usize {
    node.descendants()
        .elements()
        .filter(|element| &*element.name.local == tag)
        .count()
}

/// All descendant elements (excluding `node` itself), in document order.
pub fn descendant_elements(node: &NodeRef) -> Vec<NodeRef> {
    node.descendants()
        .elements()
        .map(|element| element.as_node().clone())
        .collect()
}

/// Serialized markup of the children of `node`.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

pub fn outer_html(node: &NodeRef) -> String {
    node.to_string()
}

/// Copy a node without its children.
pub fn shallow_clone(node: &NodeRef) -> NodeRef {
    match node.data() {
        NodeData::Element(element) => NodeRef::new_element(
            element.name.clone(),
            element.attributes.borrow().map.clone(),
        ),
        NodeData::Text(text) => NodeRef::new_text(text.borrow().clone()),
        NodeData::Comment(comment) => NodeRef::new_comment(comment.borrow().clone()),
        // Only body content is ever cloned; anything else degrades to an empty container.
        _ => NodeRef::new_document(),
    }
}

/// Copy a node and its whole subtree. The copy is detached.
pub fn deep_clone(node: &NodeRef) -> NodeRef {
    let copy = shallow_clone(node);
    for child in node.children() {
        copy.append(deep_clone(&child));
    }
    copy
}

/// Move every child of `from` to the end of `to`.
pub fn move_children(from: &NodeRef, to: &NodeRef) {
    let children: Vec<NodeRef> = from.children().collect();
    for child in children {
        to.append(child);
    }
}

/// Whether `ancestor` is `node` or one of its ancestors.
pub fn contains(ancestor: &NodeRef, node: &NodeRef) -> bool {
    node.inclusive_ancestors().any(|candidate| candidate == *ancestor)
}
