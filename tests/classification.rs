//! The article gate on whole documents and on its decision table.

use readerview::dom_utils::parse_document;
use readerview::{classify_candidate, CandidateStats, Reader, RuleSet};
use url::Url;

const STORY_URL: &str = "https://example.com/news/otters-return";

fn block(label: &str, paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                "<p>{} sentence {}, with commas, clauses, and words to be prose.</p>",
                label, i
            )
        })
        .collect();
    format!("<div>{}</div>", body)
}

fn stats(score: f64, rows: usize, text_length: usize) -> CandidateStats {
    CandidateStats {
        tag: "div".to_string(),
        score,
        neighbours: 0,
        link_density: 0.1,
        class_weight: 0,
        rows,
        text_length,
        paragraphs: 4,
        words: 90,
        cjk: false,
    }
}

#[test]
fn test_score_45_with_text_is_article() {
    assert!(classify_candidate(&stats(45.0, 1, 500)));
}

#[test]
fn test_score_45_with_short_text_is_not() {
    assert!(!classify_candidate(&stats(45.0, 1, 50)));
}

#[test]
fn test_close_runners_up_reject_regardless_of_score() {
    let mut ambiguous = stats(100.0, 0, 4000);
    ambiguous.neighbours = 2;
    ambiguous.words = 600;
    assert!(!classify_candidate(&ambiguous));
}

#[test]
fn test_single_dominant_block_is_article() {
    let html = format!("<html><body>{}</body></html>", block("Only", 10));
    let reader = Reader::new(&html, Some(STORY_URL), None).unwrap();
    assert!(reader.is_probably_article());
}

#[test]
fn test_two_equal_blocks_look_like_a_home_page() {
    // Each block scores 35; their shared parent collects half of both (30),
    // which puts two candidates within 85% of the winner.
    let html = format!(
        "<html><body>{}{}</body></html>",
        block("Left", 6),
        block("Right", 6)
    );
    let document = parse_document(&html);
    let url = Url::parse(STORY_URL).unwrap();
    assert!(!readerview::is_probably_readerable(
        &document,
        Some(&url),
        &RuleSet::classification()
    ));
}

#[test]
fn test_site_root_is_never_an_article() {
    let html = format!("<html><body>{}</body></html>", block("Only", 10));
    let reader = Reader::new(&html, Some("https://example.com/"), None).unwrap();
    assert!(!reader.is_probably_article());

    let reader = Reader::new(&html, Some("https://example.com/search?q=otters"), None).unwrap();
    assert!(!reader.is_probably_article());
}

#[test]
fn test_link_list_is_not_an_article() {
    let links: String = (0..12)
        .map(|i| {
            format!(
                r#"<p><a href="/story/{i}">Headline number {i} about something, somewhere, today</a></p>"#,
                i = i
            )
        })
        .collect();
    let html = format!("<html><body><div>{}</div></body></html>", links);
    let reader = Reader::new(&html, Some(STORY_URL), None).unwrap();
    assert!(!reader.is_probably_article());
}
