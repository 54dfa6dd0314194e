//! Heuristic rule sets injected into the scoring and cleaning passes.
//!
//! A [`RuleSet`] bundles every keyword pattern and numeric threshold a pass
//! needs. Two presets exist because extraction and classification were tuned
//! independently: [`RuleSet::extraction`] and [`RuleSet::classification`].
//!
//! ```rust
//! use readerview::{RuleSet, ScanFlags};
//!
//! let rules = RuleSet::classification();
//! assert!(rules.flags.contains(ScanFlags::OK_MAYBE_OVERRIDE));
//! assert_eq!(rules.positive_weight, 30);
//! ```

use crate::constants::{Regexps, CLASSIFICATION_REGEXPS, DIV_BLOCK_PREFIXES, EXTRACTION_REGEXPS};
use bitflags::bitflags;
use regex::Regex;

bitflags! {
    /// Behavioral switches of a candidate scan.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScanFlags: u8 {
        /// An "unlikely" element is kept when it also matches the ok-maybe pattern.
        const OK_MAYBE_OVERRIDE = 0b0000_0001;
        /// `<ul>` elements are scored like paragraphs.
        const SCORE_LISTS = 0b0000_0010;
        /// Once CJK text is seen in the document, paragraph scores are tripled.
        const CJK_BOOST = 0b0000_0100;
    }
}

/// Immutable keyword patterns and thresholds for one heuristic pass.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Class/id keywords of boilerplate containers.
    pub unlikely_candidates: Regex,
    /// Class/id keywords that rescue an unlikely container when
    /// [`ScanFlags::OK_MAYBE_OVERRIDE`] is set.
    pub ok_maybe_its_a_candidate: Regex,
    /// Class/id keywords rewarded by the class weight.
    pub positive: Regex,
    /// Class/id keywords penalized by the class weight.
    pub negative: Regex,
    /// Link text and href keywords of print/share/comment links.
    pub extraneous: Regex,
    /// Embed URLs that keep an `<object>` or embed alive.
    pub videos: Regex,
    /// Link text of "next page" anchors.
    pub next_link: Regex,
    /// Link text of "previous page" anchors.
    pub prev_link: Regex,
    /// Page URLs that are never articles.
    pub non_article_urls: Regex,
    /// Tag-name prefixes that turn a `<div>` into a structural wrapper.
    pub div_block_prefixes: Vec<&'static str>,
    /// Class weight added per positive class or id match.
    pub positive_weight: i32,
    /// Class weight subtracted per negative class or id match.
    pub negative_weight: i32,
    /// Paragraphs with fewer visible characters are not scored.
    pub min_text_length: usize,
    pub flags: ScanFlags,
}

impl RuleSet {
    /// The tuning used when extracting article content.
    pub fn extraction() -> Self {
        Self::from_regexps(
            &EXTRACTION_REGEXPS,
            DIV_BLOCK_PREFIXES.to_vec(),
            25,
            25,
            25,
            ScanFlags::empty(),
        )
    }

    /// The tuning used when deciding whether a page is an article.
    pub fn classification() -> Self {
        let mut prefixes = DIV_BLOCK_PREFIXES.to_vec();
        prefixes.push("script");
        Self::from_regexps(
            &CLASSIFICATION_REGEXPS,
            prefixes,
            30,
            25,
            30,
            ScanFlags::all(),
        )
    }

    fn from_regexps(
        regexps: &Regexps,
        div_block_prefixes: Vec<&'static str>,
        positive_weight: i32,
        negative_weight: i32,
        min_text_length: usize,
        flags: ScanFlags,
    ) -> Self {
        Self {
            unlikely_candidates: regexps.unlikely_candidates.clone(),
            ok_maybe_its_a_candidate: regexps.ok_maybe_its_a_candidate.clone(),
            positive: regexps.positive.clone(),
            negative: regexps.negative.clone(),
            extraneous: regexps.extraneous.clone(),
            videos: regexps.videos.clone(),
            next_link: regexps.next_link.clone(),
            prev_link: regexps.prev_link.clone(),
            non_article_urls: regexps.non_article_urls.clone(),
            div_block_prefixes,
            positive_weight,
            negative_weight,
            min_text_length,
            flags,
        }
    }

    /// Replace the embed pattern.
    pub fn with_videos(mut self, videos: Regex) -> Self {
        self.videos = videos;
        self
    }

    /// Replace the minimum scoreable text length.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    /// Replace the scan flags.
    pub fn with_flags(mut self, flags: ScanFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether `tag` makes a `<div>` a wrapper, by prefix match.
    pub fn is_div_block_tag(&self, tag: &str) -> bool {
        self.div_block_prefixes
            .iter()
            .any(|prefix| tag.starts_with(prefix))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::extraction()
    }
}
