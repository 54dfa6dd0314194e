//! The "is this an article" gate.
//!
//! This module provides [`is_probably_readerable`], a yes/no decision on
//! whether a page holds one dominant block of prose. It runs the candidate
//! scan with the classification tuning and then applies a fixed decision table
//! to the winner.
//!
//! ## Use Case
//!
//! Run the gate before extraction to skip home pages, search results and
//! link farms:
//!
//! ```rust
//! use readerview::Reader;
//!
//! let html = "<html><body><p>Short</p></body></html>";
//! let reader = Reader::new(html, Some("https://example.com/news/story"), None).unwrap();
//!
//! if reader.is_probably_article() {
//!     let _article = reader.parse();
//! } else {
//!     println!("Not an article page, skipping parse");
//! }
//! ```
//!
//! ## Decision table
//!
//! In order, the first matching rule decides:
//!
//! 1. two or more other candidates score at least 85% of the winner: not an article;
//! 2. the winner is mostly links and has a low class weight: not an article;
//! 3. there is no winner, or it is `<body>` or `<form>`: not an article;
//! 4. one of the score/length/row clauses holds: an article, unless the winner
//!    scores 40 or more with fewer than 100 characters of text.

use crate::candidates::CandidateSelector;
use crate::dom_utils;
use crate::rules::RuleSet;
use crate::scoring::ScoreTable;
use crate::text_metrics::{class_weight, link_density, visible_text, word_count};
use crate::url_utils::host_with_port;
use kuchikikiki::NodeRef;
use tracing::{debug, warn};
use url::Url;

const NEIGHBOUR_RATIO: f64 = 0.85;
const MAX_NEIGHBOURS: usize = 2;

/// Measurements of the winning candidate that the decision table reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateStats {
    /// Lowercase tag name of the winner.
    pub tag: String,
    /// Link-density-adjusted content score.
    pub score: f64,
    /// Other candidates scoring at least 85% of the winner.
    pub neighbours: usize,
    pub link_density: f64,
    pub class_weight: i32,
    /// `<tr>` rows under the winner when it is a `<tr>` or `<tbody>`, else 0.
    pub rows: usize,
    /// Characters of raw visible text.
    pub text_length: usize,
    pub paragraphs: usize,
    pub words: usize,
    /// Whether CJK text was seen during the scan.
    pub cjk: bool,
}

impl CandidateStats {
    /// Measure `top` against the rest of the scored candidates.
    pub fn measure(top: &NodeRef, scores: &ScoreTable, rules: &RuleSet, cjk: bool) -> Self {
        let score = scores.score(top).unwrap_or_default();
        let tag = dom_utils::tag_name(top).unwrap_or_default();
        let text = visible_text(top, false);

        let rows = if tag == "tr" || tag == "tbody" {
            dom_utils::count_by_tag(top, "tr")
        } else {
            0
        };

        Self {
            neighbours: neighbour_count(top, scores),
            link_density: link_density(top),
            class_weight: class_weight(top, rules),
            rows,
            text_length: text.chars().count(),
            paragraphs: dom_utils::count_by_tag(top, "p"),
            words: word_count(&text),
            cjk,
            score,
            tag,
        }
    }
}

/// Candidates other than `top` whose score is at least 85% of its score.
pub fn neighbour_count(top: &NodeRef, scores: &ScoreTable) -> usize {
    let Some(top_score) = scores.score(top) else {
        return 0;
    };
    scores
        .candidates()
        .iter()
        .filter(|candidate| *candidate != top)
        .filter(|candidate| {
            scores
                .score(candidate)
                .map_or(false, |score| score >= top_score * NEIGHBOUR_RATIO)
        })
        .count()
}

/// Apply the decision table to the winner's measurements.
pub fn classify_candidate(stats: &CandidateStats) -> bool {
    if stats.neighbours >= MAX_NEIGHBOURS {
        return false;
    }
    if stats.link_density > 0.5 && stats.class_weight < 25 {
        return false;
    }
    if stats.tag == "body" || stats.tag == "form" {
        return false;
    }

    let score = stats.score;
    let length = stats.text_length;
    let few_rows = stats.rows < 3;
    let mid_score = (20.0..30.0).contains(&score);

    let accepted = (score >= 40.0 && few_rows)
        || (mid_score && length > 900 && stats.paragraphs >= 2 && few_rows && !stats.cjk)
        || (mid_score && length > 1900 && few_rows && !stats.cjk)
        || (score > 15.0 && score <= 40.0 && stats.words >= 100 && few_rows)
        || (score >= 100.0 && length > 2000 && stats.words >= 250 && stats.rows > 200);

    accepted && !(score >= 40.0 && length < 100)
}

/// Whether `url` is a site root or matches the never-an-article patterns.
pub fn is_non_article_url(url: &Url, rules: &RuleSet) -> bool {
    let without_scheme = url
        .as_str()
        .strip_prefix(&format!("{}://", url.scheme()))
        .unwrap_or(url.as_str());
    let site_root = format!("{}/", host_with_port(url)) == without_scheme;

    site_root || rules.non_article_urls.is_match(url.as_str())
}

/// Decide whether `document` (a document node or its `<body>`) is an article.
///
/// The tree is only read; every score is retracted before returning.
///
/// ```rust
/// use readerview::{dom_utils, is_probably_readerable, RuleSet};
/// use url::Url;
///
/// let document = dom_utils::parse_document("<html><body><p>Short</p></body></html>");
/// let url = Url::parse("https://example.com/").unwrap();
/// assert!(!is_probably_readerable(&document, Some(&url), &RuleSet::classification()));
/// ```
pub fn is_probably_readerable(document: &NodeRef, url: Option<&Url>, rules: &RuleSet) -> bool {
    if let Some(url) = url {
        if is_non_article_url(url, rules) {
            debug!(url = %url, "not an article URL");
            return false;
        }
    }

    let body = if dom_utils::is_tag(document, "body") {
        document.clone()
    } else {
        match dom_utils::body_of(document) {
            Some(body) => body,
            None => return false,
        }
    };

    let selection = match CandidateSelector::new(rules).select(&body) {
        Ok(selection) => selection,
        Err(err) => {
            warn!(error = %err, "classification scan failed");
            return false;
        }
    };

    let Some(top) = selection.top_candidate.as_ref() else {
        debug!("no candidate, not an article");
        return false;
    };

    let stats = CandidateStats::measure(top, &selection.scores, rules, selection.saw_cjk);
    let decision = classify_candidate(&stats);
    debug!(
        tag = %stats.tag,
        score = stats.score,
        neighbours = stats.neighbours,
        link_density = stats.link_density,
        text_length = stats.text_length,
        words = stats.words,
        rows = stats.rows,
        decision,
        "article classification"
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom_utils::parse_document;

    fn stats(score: f64, text_length: usize) -> CandidateStats {
        CandidateStats {
            tag: "div".to_string(),
            score,
            neighbours: 0,
            link_density: 0.0,
            class_weight: 0,
            rows: 1,
            text_length,
            paragraphs: 3,
            words: 80,
            cjk: false,
        }
    }

    #[test]
    fn test_high_score_with_text_is_article() {
        assert!(classify_candidate(&stats(45.0, 500)));
    }

    #[test]
    fn test_high_score_with_short_text_is_not() {
        assert!(!classify_candidate(&stats(45.0, 50)));
    }

    #[test]
    fn test_neighbours_reject() {
        let mut ambiguous = stats(100.0, 5000);
        ambiguous.neighbours = 2;
        assert!(!classify_candidate(&ambiguous));
    }

    #[test]
    fn test_link_farm_rejected() {
        let mut links = stats(60.0, 800);
        links.link_density = 0.7;
        assert!(!classify_candidate(&links));
        links.class_weight = 30;
        assert!(classify_candidate(&links));
    }

    #[test]
    fn test_mid_scores() {
        let mut mid = stats(25.0, 950);
        assert!(classify_candidate(&mid));
        mid.cjk = true;
        assert!(!classify_candidate(&mid));
        mid.words = 120;
        assert!(classify_candidate(&mid));
        assert!(!classify_candidate(&stats(12.0, 5000)));
    }

    #[test]
    fn test_table_rows() {
        let mut table = stats(45.0, 500);
        table.rows = 5;
        assert!(!classify_candidate(&table));
        table.score = 150.0;
        table.text_length = 2500;
        table.words = 300;
        table.rows = 250;
        assert!(classify_candidate(&table));
    }

    #[test]
    fn test_body_and_form_rejected() {
        let mut form = stats(80.0, 900);
        form.tag = "form".to_string();
        assert!(!classify_candidate(&form));
    }

    #[test]
    fn test_non_article_urls() {
        let rules = RuleSet::classification();
        let url = |s: &str| Url::parse(s).unwrap();
        assert!(is_non_article_url(&url("http://example.com/"), &rules));
        assert!(is_non_article_url(&url("http://example.com:8080"), &rules));
        assert!(is_non_article_url(&url("https://example.com/search?q=rust"), &rules));
        assert!(is_non_article_url(&url("https://example.com/login"), &rules));
        assert!(!is_non_article_url(&url("https://example.com/news/2024/story"), &rules));
    }

    #[test]
    fn test_scan_leaves_tree_untouched() {
        let paragraphs: String = (0..6)
            .map(|i| format!("<p>Sentence {} runs long, with commas, so it scores as real article prose here.</p>", i))
            .collect();
        let document = parse_document(&format!(
            r#"<html><body><div id="story" class="article">{}</div></body></html>"#,
            paragraphs
        ));
        let before = document.to_string();

        let url = Url::parse("https://example.com/news/story").unwrap();
        assert!(is_probably_readerable(&document, Some(&url), &RuleSet::classification()));
        assert_eq!(document.to_string(), before);
    }
}
