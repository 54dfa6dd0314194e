//! Text measurements shared by scoring, cleaning and classification.
//!
//! All lengths are counted in `char`s so that CJK text is measured the same
//! way as Latin text.

use crate::constants::NORMALIZE;
use crate::dom_utils;
use crate::rules::RuleSet;
use kuchikikiki::NodeRef;

/// Concatenated text under `node`, excluding text inside `<script>`.
///
/// With `normalize_whitespace`, runs of two or more whitespace characters are
/// collapsed to one space and the result is trimmed.
pub fn visible_text(node: &NodeRef, normalize_whitespace: bool) -> String {
    let mut text = String::new();
    for descendant in node.inclusive_descendants() {
        let Some(contents) = descendant.as_text() else {
            continue;
        };
        let in_script = descendant
            .parent()
            .map_or(false, |parent| dom_utils::is_tag(&parent, "script"));
        if !in_script {
            text.push_str(&contents.borrow());
        }
    }

    if normalize_whitespace {
        NORMALIZE.replace_all(text.trim(), " ").into_owned()
    } else {
        text
    }
}

/// Normalized visible text length in chars.
pub fn text_length(node: &NodeRef) -> usize {
    visible_text(node, true).chars().count()
}

/// Share of the visible text of `node` that sits inside anchors.
///
/// Always in `[0, 1]`; a node without text has density `0`.
pub fn link_density(node: &NodeRef) -> f64 {
    let total = text_length(node);
    if total == 0 {
        return 0.0;
    }

    let link_length: usize = dom_utils::elements_by_tag(node, "a")
        .iter()
        .map(text_length)
        .sum();

    (link_length as f64 / total as f64).min(1.0)
}

/// Keyword bonus or penalty from the `class` and `id` attributes.
///
/// Each attribute is matched independently, so both can fire.
pub fn class_weight(node: &NodeRef, rules: &RuleSet) -> i32 {
    let mut weight = 0;

    for value in [dom_utils::class_name(node), dom_utils::id(node)] {
        if value.is_empty() {
            continue;
        }
        if rules.negative.is_match(&value) {
            weight -= rules.negative_weight;
        }
        if rules.positive.is_match(&value) {
            weight += rules.positive_weight;
        }
    }

    weight
}

/// Whether `c` falls in one of the CJK blocks (radicals, kana, ideographs,
/// Hangul syllables, compatibility forms and two supplementary ideograph ranges).
pub fn is_cjk(c: char) -> bool {
    const RANGES: [(u32, u32); 9] = [
        (11904, 12031),
        (12352, 12543),
        (12736, 19903),
        (19968, 40959),
        (44032, 55215),
        (63744, 64255),
        (65072, 65103),
        (131072, 173791),
        (194560, 195103),
    ];
    let code = c as u32;
    RANGES.iter().any(|&(low, high)| code > low && code < high)
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

pub fn count_commas(text: &str) -> usize {
    text.matches(',').count()
}

/// Number of space-separated words, counting a run of spaces as one separator.
pub fn word_count(text: &str) -> usize {
    let split_length = text.split(' ').count();
    let chars: Vec<char> = text.chars().collect();
    let doubled_spaces = chars
        .windows(2)
        .filter(|pair| pair[0] == ' ' && pair[1] == ' ')
        .count();
    split_length - doubled_spaces
}
