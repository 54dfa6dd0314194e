//! Structural cleanup of the assembled article container.
//!
//! The rules run in a fixed order; later rules rely on earlier ones having
//! fired (for instance the image-link span rule expects inline styles to be
//! gone already). [`StructuralCleaner::clean`] repeats the sequence until the
//! container stops changing, so cleaning an already-clean fragment is a no-op.

use crate::constants::{STYLED_MARKER_CLASS, WHITELIST_CLASSES, WHITELIST_ID};
use crate::dom_utils;
use crate::rules::RuleSet;
use crate::scoring::ScoreTable;
use crate::style::{image_size, inline_declaration};
use crate::text_metrics::{class_weight, contains_cjk, count_commas, link_density, visible_text};
use kuchikikiki::iter::NodeIterator;
use kuchikikiki::NodeRef;
use tracing::trace;

const MAX_PASSES: usize = 8;

const ALWAYS_REMOVED: [&str; 6] = ["iframe", "script", "style", "textarea", "input", "noscript"];

/// Whether the document carries one of the markers that protect divs from
/// conditional removal.
pub fn document_whitelisted(document: &NodeRef) -> bool {
    let has_class = document.descendants().elements().any(|element| {
        let attributes = element.attributes.borrow();
        let Some(class) = attributes.get("class") else {
            return false;
        };
        let tokens: Vec<&str> = class.split_whitespace().collect();
        WHITELIST_CLASSES.iter().any(|marker| {
            marker
                .split_whitespace()
                .all(|required| tokens.contains(&required))
        })
    });
    if has_class {
        return true;
    }

    document.descendants().elements().any(|element| {
        element.attributes.borrow().get("id") == Some(WHITELIST_ID)
            && !dom_utils::inner_html(element.as_node()).is_empty()
    })
}

pub struct StructuralCleaner<'a> {
    rules: &'a RuleSet,
    scores: Option<&'a ScoreTable>,
    whitelisted: bool,
}

impl<'a> StructuralCleaner<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            scores: None,
            whitelisted: false,
        }
    }

    /// Content scores to combine with the class weight in conditional cleaning.
    pub fn with_scores(mut self, scores: &'a ScoreTable) -> Self {
        self.scores = Some(scores);
        self
    }

    /// Protect divs from conditional removal (see [`document_whitelisted`]).
    pub fn with_whitelist(mut self, whitelisted: bool) -> Self {
        self.whitelisted = whitelisted;
        self
    }

    /// Clean `container` in place until it stops changing.
    pub fn clean(&self, container: &NodeRef) {
        let mut before = dom_utils::inner_html(container);
        for pass in 1..=MAX_PASSES {
            self.clean_once(container);
            let after = dom_utils::inner_html(container);
            if after == before {
                trace!(pass, "article container is clean");
                return;
            }
            before = after;
        }
    }

    /// One run of the whole rule sequence.
    pub fn clean_once(&self, container: &NodeRef) {
        strip_styles(container);
        self.clean_headers(container);
        self.clean_conditionally(container, "form");
        self.clean_objects(container);
        remove_all(container, "video");
        remove_all(container, "audio");
        for select in dom_utils::elements_by_tag(container, "select") {
            dom_utils::set_attr(&select, "style", "display: none;");
        }
        let h2s = dom_utils::elements_by_tag(container, "h2");
        if h2s.len() == 1 {
            remove_all(container, "h2");
        }
        for tag in ALWAYS_REMOVED {
            remove_all(container, tag);
        }
        self.clean_image_link_spans(container);
        clean_image_links(container);
        self.clean_headers(container);
        self.clean_conditionally(container, "table");
        self.clean_conditionally(container, "ul");
        self.clean_conditionally(container, "div");
        remove_empty_paragraphs(container);
        remove_breaks_before_paragraphs(container);
    }

    /// Drop `<h1>`/`<h2>` headers with a negative class weight or mostly link text.
    pub fn clean_headers(&self, container: &NodeRef) {
        for tag in ["h1", "h2"] {
            for header in dom_utils::elements_by_tag(container, tag).into_iter().rev() {
                if class_weight(&header, self.rules) < 0 || link_density(&header) > 0.33 {
                    header.detach();
                }
            }
        }
    }

    /// Drop `<object>` elements unless they reference a known video host.
    fn clean_objects(&self, container: &NodeRef) {
        for object in dom_utils::elements_by_tag(container, "object").into_iter().rev() {
            let attribute_values: String = object
                .as_element()
                .map(|element| {
                    element
                        .attributes
                        .borrow()
                        .map
                        .values()
                        .map(|attribute| format!("{}|", attribute.value))
                        .collect()
                })
                .unwrap_or_default();
            if self.rules.videos.is_match(&attribute_values)
                || self.rules.videos.is_match(&dom_utils::inner_html(&object))
            {
                continue;
            }
            object.detach();
        }
    }

    /// Inside anchors that wrap an image, unscored text spans only duplicate
    /// the image caption; such a span stays only when it explicitly has no
    /// background image. Scored spans go through the conditional rules.
    fn clean_image_link_spans(&self, container: &NodeRef) {
        for link in dom_utils::elements_by_tag(container, "a") {
            if dom_utils::count_by_tag(&link, "img") == 0 {
                continue;
            }
            for span in dom_utils::elements_by_tag(&link, "span").into_iter().rev() {
                if !dom_utils::contains(&link, &span) {
                    continue;
                }
                if self.combined_weight(&span) < 0.0 {
                    span.detach();
                    continue;
                }
                if self.content_score(&span) == 0.0 {
                    if inline_declaration(&span, "background-image").as_deref() != Some("none") {
                        span.detach();
                    }
                    continue;
                }
                let text = visible_text(&span, true);
                if count_commas(&text) < 10 && self.should_remove(&span, "span", &text) {
                    span.detach();
                }
            }
        }
    }

    fn content_score(&self, node: &NodeRef) -> f64 {
        self.scores
            .and_then(|scores| scores.score(node))
            .unwrap_or(0.0)
    }

    fn combined_weight(&self, node: &NodeRef) -> f64 {
        f64::from(class_weight(node, self.rules)) + self.content_score(node)
    }

    /// Remove `tag` elements that look like boilerplate, deepest last-in-document first.
    pub fn clean_conditionally(&self, container: &NodeRef, tag: &str) {
        for node in dom_utils::elements_by_tag(container, tag).into_iter().rev() {
            if !dom_utils::contains(container, &node) {
                continue;
            }

            if self.combined_weight(&node) < 0.0 {
                trace!(tag, class = %dom_utils::class_name(&node), "removed negative-weight element");
                node.detach();
                continue;
            }

            let text = visible_text(&node, true);
            if count_commas(&text) >= 10 {
                continue;
            }

            if self.should_remove(&node, tag, &text) {
                trace!(tag, class = %dom_utils::class_name(&node), "conditionally removed");
                node.detach();
            }
        }
    }

    fn should_remove(&self, node: &NodeRef, tag: &str, text: &str) -> bool {
        let weight = class_weight(node, self.rules);
        let paragraphs = dom_utils::count_by_tag(node, "p");
        let images = dom_utils::count_by_tag(node, "img");
        let list_items = dom_utils::count_by_tag(node, "li") as i64 - 100;
        let inputs = dom_utils::count_by_tag(node, "input");
        let embeds = dom_utils::elements_by_tag(node, "embed")
            .iter()
            .filter(|embed| {
                let src = dom_utils::get_attr(embed, "src").unwrap_or_default();
                !self.rules.videos.is_match(&src)
            })
            .count();
        let density = link_density(node);
        let length = text.chars().count();

        let mut remove = images > paragraphs
            || (list_items > paragraphs as i64 && tag != "ul" && tag != "ol")
            || inputs > paragraphs / 3
            || (length < 25 && (images > 2 || images == 0))
            || (weight < 25 && density > 0.2)
            || (weight >= 25 && density > 0.5)
            || (embeds == 1 && length < 75)
            || embeds > 1;

        if remove && contains_cjk(text) {
            remove = weight < 25 && density > 0.3;
        }

        let has_large_image = dom_utils::elements_by_tag(node, "img").iter().any(|img| {
            let (width, height) = image_size(img);
            height >= 150 && width >= 200
        });
        if has_large_image {
            remove = false;
        }

        if tag == "div" && self.whitelisted {
            remove = false;
        }

        remove
    }
}

/// Remove every `style` attribute under and including `root`, except on
/// elements whose class is exactly the styled marker.
pub fn strip_styles(root: &NodeRef) {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if dom_utils::is_element(&node) && dom_utils::class_name(&node) != STYLED_MARKER_CLASS {
            dom_utils::remove_attr(&node, "style");
        }
        let children: Vec<NodeRef> = node.children().filter(dom_utils::is_element).collect();
        stack.extend(children.into_iter().rev());
    }
}

fn remove_all(container: &NodeRef, tag: &str) {
    for node in dom_utils::elements_by_tag(container, tag).into_iter().rev() {
        node.detach();
    }
}

/// An image directly inside a link keeps the image but loses the link target.
fn clean_image_links(container: &NodeRef) {
    for img in dom_utils::elements_by_tag(container, "img") {
        if let Some(parent) = img.parent() {
            if dom_utils::is_tag(&parent, "a") {
                dom_utils::remove_attr(&parent, "href");
            }
        }
    }
}

fn remove_empty_paragraphs(container: &NodeRef) {
    for p in dom_utils::elements_by_tag(container, "p").into_iter().rev() {
        let has_media = ["img", "embed", "object"]
            .iter()
            .any(|tag| dom_utils::count_by_tag(&p, tag) > 0);
        if !has_media && visible_text(&p, false).trim().is_empty() {
            p.detach();
        }
    }
}

/// Drop a `<br>` (and the whitespace after it) that directly precedes an
/// element whose tag starts with `p`.
fn remove_breaks_before_paragraphs(container: &NodeRef) {
    for br in dom_utils::elements_by_tag(container, "br") {
        let mut whitespace = Vec::new();
        let mut next = br.next_sibling();
        while let Some(node) = next {
            let is_blank = node
                .as_text()
                .map_or(false, |text| text.borrow().trim().is_empty());
            if !is_blank {
                next = Some(node);
                break;
            }
            next = node.next_sibling();
            whitespace.push(node);
        }

        let before_paragraph = next
            .as_ref()
            .and_then(dom_utils::tag_name)
            .map_or(false, |tag| tag.starts_with('p'));
        if before_paragraph {
            for node in whitespace {
                node.detach();
            }
            br.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom_utils::{count_by_tag, elements_by_tag, parse_body};

    fn container(html: &str) -> NodeRef {
        let body = parse_body(&format!(r#"<div id="readability-content">{}</div>"#, html)).unwrap();
        body.first_child().unwrap()
    }

    const PROSE: &str = "A long paragraph of article prose that easily clears every length check in the cleaner.";

    #[test]
    fn test_strip_styles_keeps_marker() {
        let root = container(
            r#"<p style="color:red">a</p><span class="readability-styled" style="x:y"><b style="z:w">b</b></span>"#,
        );
        strip_styles(&root);
        assert_eq!(
            dom_utils::inner_html(&root),
            r#"<p>a</p><span class="readability-styled" style="x:y"><b>b</b></span>"#
        );
    }

    #[test]
    fn test_always_removed_and_hidden_select() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            "<p>{}</p><script>x()</script><iframe></iframe><select><option>a</option></select><video></video>",
            PROSE
        ));
        StructuralCleaner::new(&rules).clean(&root);

        assert_eq!(count_by_tag(&root, "script"), 0);
        assert_eq!(count_by_tag(&root, "iframe"), 0);
        assert_eq!(count_by_tag(&root, "video"), 0);
        let select = elements_by_tag(&root, "select").remove(0);
        assert_eq!(dom_utils::get_attr(&select, "style").as_deref(), Some("display: none;"));
    }

    #[test]
    fn test_lone_h2_removed() {
        let rules = RuleSet::extraction();
        let one = container(&format!("<h2>Title</h2><p>{}</p>", PROSE));
        StructuralCleaner::new(&rules).clean(&one);
        assert_eq!(count_by_tag(&one, "h2"), 0);

        let two = container(&format!("<h2>First</h2><p>{p}</p><h2>Second</h2><p>{p}</p>", p = PROSE));
        StructuralCleaner::new(&rules).clean(&two);
        assert_eq!(count_by_tag(&two, "h2"), 2);
    }

    #[test]
    fn test_object_kept_only_for_video_hosts() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            r#"<p>{}</p><object data="http://www.youtube.com/v/abc"></object><object data="http://ads.example.com/x"></object>"#,
            PROSE
        ));
        StructuralCleaner::new(&rules).clean(&root);
        let objects = elements_by_tag(&root, "object");
        assert_eq!(objects.len(), 1);
        assert!(dom_utils::get_attr(&objects[0], "data").unwrap().contains("youtube"));
    }

    #[test]
    fn test_image_link_loses_href_and_spans() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            r#"<p>{}<a href="/full.jpg"><img src="thumb.jpg" width="300" height="200"><span>Enlarge</span></a></p>"#,
            PROSE
        ));
        StructuralCleaner::new(&rules).clean(&root);
        let link = elements_by_tag(&root, "a").remove(0);
        assert_eq!(dom_utils::get_attr(&link, "href"), None);
        assert_eq!(count_by_tag(&link, "span"), 0);
        assert_eq!(count_by_tag(&link, "img"), 1);
    }

    #[test]
    fn test_link_heavy_div_removed() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            r#"<div><p>{}</p></div><div><a href="/1">Related story one</a> <a href="/2">Related story two</a></div>"#,
            PROSE
        ));
        StructuralCleaner::new(&rules).clean(&root);
        assert_eq!(count_by_tag(&root, "div"), 1);
        assert_eq!(count_by_tag(&root, "a"), 0);
    }

    #[test]
    fn test_whitelist_protects_divs() {
        let rules = RuleSet::extraction();
        let html = r#"<div><a href="/1">Related story one</a> <a href="/2">Related story two</a></div>"#;
        let root = container(html);
        StructuralCleaner::new(&rules).with_whitelist(true).clean(&root);
        assert_eq!(count_by_tag(&root, "div"), 1);

        let document = parse_body(r#"<div class="view_cnt"></div>"#).unwrap();
        assert!(document_whitelisted(&document));
        let document = parse_body(r#"<div id="description"></div>"#).unwrap();
        assert!(!document_whitelisted(&document));
        let document = parse_body(r#"<div id="description"><p>Listing details</p></div>"#).unwrap();
        assert!(document_whitelisted(&document));
        let document = parse_body(r#"<div class="full sixteen hnews columns hreview hentry"></div>"#).unwrap();
        assert!(document_whitelisted(&document));
    }

    #[test]
    fn test_scored_image_link_span_is_judged_not_dropped() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            r#"<p>{}<a href="/full.jpg"><img src="thumb.jpg"><span id="kept">The river otters photographed at dawn near the old mill</span><span>Enlarge</span></a></p>"#,
            PROSE
        ));
        let kept = elements_by_tag(&root, "span").remove(0);
        let mut scores = ScoreTable::new();
        scores.initialize(&kept, &rules);
        scores.accumulate(&kept, 12.0).unwrap();

        StructuralCleaner::new(&rules).with_scores(&scores).clean(&root);

        let spans = elements_by_tag(&root, "span");
        assert_eq!(spans.len(), 1);
        assert_eq!(dom_utils::id(&spans[0]), "kept");
    }

    #[test]
    fn test_cjk_text_needs_higher_link_density() {
        let rules = RuleSet::extraction();
        let body = "文".repeat(40);
        let light = "链".repeat(12);
        let heavy = "链".repeat(30);

        let root = container(&format!(
            r#"<div id="light"><p>{}</p><a href="/x">{}</a></div><div id="heavy"><p>{}</p><a href="/y">{}</a></div>"#,
            body, light, body, heavy
        ));
        StructuralCleaner::new(&rules).clean_conditionally(&root, "div");

        let ids: Vec<String> = elements_by_tag(&root, "div").iter().map(dom_utils::id).collect();
        assert_eq!(ids, vec!["light"]);

        let latin = container(&format!(
            r#"<div><p>{}</p><a href="/x">{}</a></div>"#,
            "w".repeat(40),
            "l".repeat(12)
        ));
        StructuralCleaner::new(&rules).clean_conditionally(&latin, "div");
        assert_eq!(count_by_tag(&latin, "div"), 0);
    }

    #[test]
    fn test_list_items_beyond_allowance_remove_div() {
        let rules = RuleSet::extraction();
        let items = |count: usize| "<li>item</li>".repeat(count);

        let crowded = container(&format!("<div><ul>{}</ul><p>{}</p></div>", items(102), PROSE));
        StructuralCleaner::new(&rules).clean_conditionally(&crowded, "div");
        assert_eq!(count_by_tag(&crowded, "div"), 0);

        let allowed = container(&format!("<div><ul>{}</ul><p>{}</p></div>", items(100), PROSE));
        StructuralCleaner::new(&rules).clean_conditionally(&allowed, "div");
        assert_eq!(count_by_tag(&allowed, "div"), 1);

        let list = container(&format!("<ul>{}</ul>", items(102)));
        StructuralCleaner::new(&rules).clean_conditionally(&list, "ul");
        assert_eq!(count_by_tag(&list, "ul"), 1);
    }

    #[test]
    fn test_inputs_against_paragraphs() {
        let rules = RuleSet::extraction();

        let form_like = container(&format!(r#"<div><p>{}</p><input type="text"></div>"#, PROSE));
        StructuralCleaner::new(&rules).clean_conditionally(&form_like, "div");
        assert_eq!(count_by_tag(&form_like, "div"), 0);

        let prose = container(&format!(
            r#"<div><p>{p}</p><p>{p}</p><p>{p}</p><input type="text"></div>"#,
            p = PROSE
        ));
        StructuralCleaner::new(&rules).clean_conditionally(&prose, "div");
        assert_eq!(count_by_tag(&prose, "div"), 1);
    }

    #[test]
    fn test_single_embed_with_short_text() {
        let rules = RuleSet::extraction();
        let caption = "Short caption for the embedded clip";

        let ad = container(&format!(
            r#"<div><p>{}</p><embed src="http://ads.example.com/banner.swf"></div>"#,
            caption
        ));
        StructuralCleaner::new(&rules).clean_conditionally(&ad, "div");
        assert_eq!(count_by_tag(&ad, "div"), 0);

        let video = container(&format!(
            r#"<div><p>{}</p><embed src="https://www.youtube.com/v/abc"></div>"#,
            caption
        ));
        StructuralCleaner::new(&rules).clean_conditionally(&video, "div");
        assert_eq!(count_by_tag(&video, "div"), 1);

        let long = container(&format!(
            r#"<div><p>{}</p><embed src="http://ads.example.com/banner.swf"></div>"#,
            PROSE
        ));
        StructuralCleaner::new(&rules).clean_conditionally(&long, "div");
        assert_eq!(count_by_tag(&long, "div"), 1);
    }

    #[test]
    fn test_several_embeds_remove_div() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            r#"<div><p>{}</p><embed src="http://ads.example.com/a.swf"><embed src="http://ads.example.com/b.swf"></div>"#,
            PROSE
        ));
        StructuralCleaner::new(&rules).clean_conditionally(&root, "div");
        assert_eq!(count_by_tag(&root, "div"), 0);
    }

    #[test]
    fn test_https_video_object_is_kept() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            r#"<p>{}</p><object data="https://player.vimeo.com/video/1"></object><object data="https://vimeo.com/1"></object>"#,
            PROSE
        ));
        StructuralCleaner::new(&rules).clean(&root);
        let objects = elements_by_tag(&root, "object");
        assert_eq!(objects.len(), 1);
        assert_eq!(dom_utils::get_attr(&objects[0], "data").as_deref(), Some("https://vimeo.com/1"));
    }

    #[test]
    fn test_large_image_keeps_div() {
        let rules = RuleSet::extraction();
        let root = container(r#"<div><img src="a.jpg" width="640" height="480"></div>"#);
        StructuralCleaner::new(&rules).clean(&root);
        assert_eq!(count_by_tag(&root, "img"), 1);
    }

    #[test]
    fn test_empty_paragraphs_and_breaks() {
        let rules = RuleSet::extraction();
        let root = container(&format!("<p>  </p><p><img src=\"a.jpg\" width=\"300\" height=\"200\"></p>text<br> \n<p>{}</p>", PROSE));
        StructuralCleaner::new(&rules).clean(&root);
        assert_eq!(count_by_tag(&root, "p"), 2);
        assert_eq!(count_by_tag(&root, "br"), 0);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let rules = RuleSet::extraction();
        let root = container(&format!(
            r#"<table><tr><td><div><a href="/x">nav</a></div><p>{p}</p></td></tr></table><h1 class="sidebar">Menu</h1><p>{p}</p><p></p>"#,
            p = PROSE
        ));
        let cleaner = StructuralCleaner::new(&rules);
        cleaner.clean(&root);
        let once = dom_utils::inner_html(&root);
        cleaner.clean(&root);
        assert_eq!(dom_utils::inner_html(&root), once);
    }
}
