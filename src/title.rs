//! Article title heuristics.
//!
//! The `<title>` text is cleaned of site-name affixes, replaced by a lone
//! `<h1>` when its length looks wrong, and finally compared against any
//! title-bearing `<meta>` tag.

use crate::constants::{
    NORMALIZE, TITLE_AFTER_FIRST_COLON, TITLE_AFTER_FIRST_SEPARATOR, TITLE_AFTER_LAST_COLON,
    TITLE_BEFORE_LAST_SEPARATOR, TITLE_SEPARATOR,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());

fn pieces(text: &str) -> usize {
    text.split(' ').count()
}

fn element_text(element: ElementRef) -> String {
    let text: String = element.text().collect();
    NORMALIZE.replace_all(text.trim(), " ").into_owned()
}

/// Drop a site name glued to `title` with `|`, `-` or `:`.
///
/// The part before the last separator is preferred; when that leaves fewer
/// than three words, the part after the first separator is used instead.
///
/// ```rust
/// use readerview::title::clean_title_candidate;
///
/// assert_eq!(
///     clean_title_candidate("How the river changed the town | Daily News"),
///     "How the river changed the town "
/// );
/// ```
pub fn clean_title_candidate(title: &str) -> String {
    let mut current = title.to_string();

    if TITLE_SEPARATOR.is_match(title) {
        current = TITLE_BEFORE_LAST_SEPARATOR
            .replace_all(title, "$1")
            .into_owned();
        if pieces(&current) < 3 {
            current = TITLE_AFTER_FIRST_SEPARATOR
                .replace_all(title, "$1")
                .into_owned();
        }
    }

    if current.contains(": ") {
        current = TITLE_AFTER_LAST_COLON.replace_all(title, "$1").into_owned();
        if pieces(&current) < 3 {
            current = TITLE_AFTER_FIRST_COLON.replace_all(title, "$1").into_owned();
        }
    }

    current
}

/// The title of the article in `document`.
pub fn get_article_title(document: &Html) -> String {
    let original = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let mut current = clean_title_candidate(&original);
    let length = current.chars().count();
    if length > 150 || length < 15 {
        let h1s: Vec<ElementRef> = document.select(&H1_SELECTOR).collect();
        if h1s.len() == 1 {
            current = element_text(h1s[0]);
        }
    }

    current = current.trim().to_string();
    if pieces(&current) <= 4 {
        current = original;
    }

    let meta_title = document
        .select(&META_SELECTOR)
        .filter(|meta| {
            ["property", "name", "id"].iter().any(|attribute| {
                meta.value()
                    .attr(attribute)
                    .map_or(false, |value| value.to_lowercase().contains("title"))
            })
        })
        .last()
        .and_then(|meta| meta.value().attr("content"))
        .filter(|content| !content.is_empty());

    match meta_title {
        Some(meta_title) => {
            let meta_title = clean_title_candidate(meta_title).trim().to_string();
            if meta_title.chars().count() > current.chars().count() {
                meta_title
            } else {
                current
            }
        }
        None => current,
    }
}
