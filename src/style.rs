//! Style lookups used by the image-worthiness probe and the cleaner.
//!
//! Extraction never assumes a rendering engine. Hosts that have computed
//! styles implement [`StyleQuery`]; everyone else gets [`InlineStyles`],
//! which reads `style` attributes and falls back to CSS initial values.

use crate::dom_utils;
use kuchikikiki::NodeRef;
use std::collections::HashMap;

/// Resolves a CSS property of an element.
///
/// Returns an empty string when the property is unknown, like
/// `getPropertyValue` does.
pub trait StyleQuery {
    fn property(&self, element: &NodeRef, name: &str) -> String;
}

/// [`StyleQuery`] backed by inline `style` attributes only.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStyles;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "div", "dl", "dt",
    "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

impl StyleQuery for InlineStyles {
    fn property(&self, element: &NodeRef, name: &str) -> String {
        if let Some(value) = inline_declaration(element, name) {
            return value;
        }
        match name {
            "float" => "none".to_string(),
            "display" => {
                let tag = dom_utils::tag_name(element).unwrap_or_default();
                if BLOCK_TAGS.contains(&tag.as_str()) {
                    "block".to_string()
                } else {
                    "inline".to_string()
                }
            }
            _ => String::new(),
        }
    }
}

/// [`StyleQuery`] for a work tree re-parsed from a source tree.
///
/// Lookups on a work-tree element are answered by the host query for the
/// source element it was copied from. Elements are matched by tag name and
/// position among elements of that tag. When the work tree has no media
/// elements, source elements inside `<audio>`/`<video>` are left out of the
/// matching, as those blocks were stripped. Unmatched elements are passed
/// through.
pub struct SourceStyles<'a> {
    host: &'a dyn StyleQuery,
    work: NodeRef,
    source: HashMap<String, Vec<NodeRef>>,
}

impl<'a> SourceStyles<'a> {
    pub fn new(host: &'a dyn StyleQuery, source: &NodeRef, work: &NodeRef) -> Self {
        let media_stripped =
            dom_utils::count_by_tag(work, "audio") + dom_utils::count_by_tag(work, "video") == 0;
        let mut by_tag: HashMap<String, Vec<NodeRef>> = HashMap::new();
        for element in dom_utils::descendant_elements(source) {
            if media_stripped
                && element
                    .inclusive_ancestors()
                    .any(|node| dom_utils::is_tag(&node, "audio") || dom_utils::is_tag(&node, "video"))
            {
                continue;
            }
            if let Some(tag) = dom_utils::tag_name(&element) {
                by_tag.entry(tag).or_default().push(element);
            }
        }
        Self {
            host,
            work: work.clone(),
            source: by_tag,
        }
    }

    /// The source element `element` was copied from.
    pub fn source_of(&self, element: &NodeRef) -> Option<NodeRef> {
        let tag = dom_utils::tag_name(element)?;
        let ordinal = dom_utils::elements_by_tag(&self.work, &tag)
            .iter()
            .position(|candidate| candidate == element)?;
        self.source.get(&tag)?.get(ordinal).cloned()
    }
}

impl StyleQuery for SourceStyles<'_> {
    fn property(&self, element: &NodeRef, name: &str) -> String {
        match self.source_of(element) {
            Some(source) => self.host.property(&source, name),
            None => self.host.property(element, name),
        }
    }
}

/// The value of `name` declared in the element's own `style` attribute.
///
/// The last declaration wins; `!important` is dropped.
pub fn inline_declaration(element: &NodeRef, name: &str) -> Option<String> {
    let style = dom_utils::get_attr(element, "style")?;
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .filter(|(property, _)| property.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| {
            value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase()
        })
        .last()
}

/// Pixel size of an image from its `width`/`height` attributes, falling back
/// to inline style. Unknown dimensions are `0`.
pub fn image_size(img: &NodeRef) -> (u32, u32) {
    let dimension = |name: &str| {
        dom_utils::get_attr(img, name)
            .and_then(|value| leading_pixels(&value))
            .or_else(|| inline_declaration(img, name).and_then(|value| leading_pixels(&value)))
            .unwrap_or(0)
    };
    (dimension("width"), dimension("height"))
}

fn leading_pixels(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
