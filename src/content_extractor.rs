//! Article extraction pipeline for a single page.
//!
//! The page markup is re-parsed into a detached work tree, scored, grown
//! around the top candidate and cleaned. The caller's document is never
//! touched.

use crate::candidates::CandidateSelector;
use crate::cleaner::{document_whitelisted, StructuralCleaner};
use crate::constants::{AUDIO_BLOCK, VIDEO_BLOCK};
use crate::dom_utils;
use crate::error::Result;
use crate::options::ReaderOptions;
use crate::rules::RuleSet;
use crate::siblings::SiblingExpander;
use crate::style::{SourceStyles, StyleQuery};
use crate::text_metrics::visible_text;
use kuchikikiki::NodeRef;
use tracing::debug;

/// Build the detached work tree for `body_markup`.
///
/// Media blocks are removed first when `strip_media` is set, and line breaks
/// in the markup become spaces.
pub fn prepare_page(body_markup: &str, strip_media: bool) -> Result<NodeRef> {
    let mut markup = body_markup.to_string();
    if strip_media {
        markup = AUDIO_BLOCK.replace_all(&markup, "").into_owned();
        markup = VIDEO_BLOCK.replace_all(&markup, "").into_owned();
    }
    let markup = markup.replace(['\r', '\n'], " ");
    dom_utils::parse_body(&markup)
}

/// Extract the cleaned article container from a prepared work tree.
///
/// Returns `None` when nothing survives cleaning.
pub fn extract_container(
    page: &NodeRef,
    rules: &RuleSet,
    sibling_levels: usize,
    styles: &dyn StyleQuery,
) -> Result<Option<NodeRef>> {
    let whitelisted = document_whitelisted(page);
    let mut selection = CandidateSelector::new(rules).select(page)?;

    let top_candidate = match selection.top_candidate.clone() {
        Some(top) if !dom_utils::is_tag(&top, "body") => top,
        _ => {
            debug!("no usable top candidate, wrapping the whole page");
            let wrapper = dom_utils::create_element("div")?;
            dom_utils::move_children(page, &wrapper);
            page.append(wrapper.clone());
            selection.scores.initialize(&wrapper, rules);
            wrapper
        }
    };

    let expansion =
        SiblingExpander::new(&selection.scores, styles, sibling_levels).expand(&top_candidate)?;
    selection.scores.clear();

    StructuralCleaner::new(rules)
        .with_scores(&expansion.scores)
        .with_whitelist(whitelisted)
        .clean(&expansion.container);

    let container = expansion.container;
    let has_content = container.children().any(|child| {
        dom_utils::is_element(&child) || !visible_text(&child, true).is_empty()
    });
    if !has_content {
        debug!("article container is empty after cleaning");
        return Ok(None);
    }
    Ok(Some(container))
}

/// Extract the article HTML from `page`, a document or a `<body>`.
///
/// The page is serialized and re-parsed first, so `page` is left as it was.
/// `styles` is queried with the elements of `page`, not of the copy.
pub fn grab_article(
    page: &NodeRef,
    rules: &RuleSet,
    options: &ReaderOptions,
    styles: &dyn StyleQuery,
) -> Result<Option<String>> {
    let source = dom_utils::body_of(page).unwrap_or_else(|| page.clone());
    let work = prepare_page(&dom_utils::inner_html(&source), options.strip_media)?;
    let styles = SourceStyles::new(styles, &source, &work);
    let container = extract_container(&work, rules, options.sibling_levels, &styles)?;
    Ok(container.map(|container| dom_utils::inner_html(&container)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::InlineStyles;

    fn article_markup() -> String {
        let paragraphs: String = (0..5)
            .map(|i| {
                format!(
                    "<p>Paragraph {} of the story, with commas, clauses, and enough words to count as prose for scoring.</p>",
                    i
                )
            })
            .collect();
        format!(
            r#"<div class="sidebar"><a href="/a">Home</a> <a href="/b">About</a></div>
               <article id="main-story">{}</article>
               <div class="footer">Copyright</div>"#,
            paragraphs
        )
    }

    #[test]
    fn test_prepare_page_strips_media_and_newlines() {
        let page = prepare_page("<p>a\nb</p><video src=x.mp4>fallback</video><audio></audio>", true).unwrap();
        assert_eq!(dom_utils::inner_html(&page), "<p>a b</p>");

        let kept = prepare_page("<video src=x.mp4></video>", false).unwrap();
        assert_eq!(dom_utils::count_by_tag(&kept, "video"), 1);
    }

    #[test]
    fn test_grab_article_picks_story() {
        let document = dom_utils::parse_document(&format!("<html><body>{}</body></html>", article_markup()));
        let before = document.to_string();
        let options = ReaderOptions::default();

        let html = grab_article(&document, &options.extraction_rules, &options, &InlineStyles)
            .unwrap()
            .unwrap();

        assert!(html.contains("Paragraph 0 of the story"));
        assert!(html.contains("Paragraph 4 of the story"));
        assert!(!html.contains("Copyright"));
        assert!(!html.contains("About"));
        assert_eq!(document.to_string(), before);
    }

    #[test]
    fn test_body_level_paragraphs_fall_back_to_wrapper() {
        let page = prepare_page(
            "<p>First paragraph has more than enough text here.</p><p>Second one, also long enough, with commas.</p>",
            true,
        )
        .unwrap();
        let rules = RuleSet::extraction();

        let container = extract_container(&page, &rules, 1, &InlineStyles).unwrap().unwrap();
        let text = visible_text(&container, true);
        assert!(text.contains("First paragraph"));
        assert!(text.contains("Second one"));
    }

    #[test]
    fn test_short_page_is_cleaned_away() {
        let page = prepare_page("<h3>Heading</h3><div><p>Short.</p></div>", true).unwrap();
        let rules = RuleSet::extraction();
        assert!(extract_container(&page, &rules, 1, &InlineStyles).unwrap().is_none());
    }

    #[test]
    fn test_empty_page_yields_none() {
        let page = prepare_page("   ", true).unwrap();
        let rules = RuleSet::extraction();
        assert!(extract_container(&page, &rules, 1, &InlineStyles).unwrap().is_none());
    }
}
