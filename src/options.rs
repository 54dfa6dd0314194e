//! Configuration options for the reader.
//!
//! This module provides [`ReaderOptions`] and [`ReaderOptionsBuilder`].
//!
//! ## Example
//!
//! ```rust
//! use readerview::{Reader, ReaderOptions};
//!
//! let html = "<html><body><article><p>Content...</p></article></body></html>";
//!
//! // Using default options
//! let reader = Reader::new(html, None, None).unwrap();
//!
//! // Using builder for custom options
//! let options = ReaderOptions::builder()
//!     .sibling_levels(0)
//!     .max_pages(5)
//!     .build();
//!
//! let reader = Reader::new(html, None, Some(options)).unwrap();
//! ```

use crate::rules::RuleSet;

/// Configuration options for extraction, classification and stitching.
///
/// ## Creating Options
///
/// ```rust
/// use readerview::ReaderOptions;
///
/// let defaults = ReaderOptions::default();
/// assert_eq!(defaults.max_pages, 30);
///
/// let options = ReaderOptions::builder()
///     .strip_media(false)
///     .build();
/// assert!(!options.strip_media);
/// ```
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Number of ancestor levels above the top candidate's parent whose
    /// children are considered for sibling expansion.
    ///
    /// `0` scans only the candidate's own siblings; `1` adds the siblings of
    /// its parent.
    ///
    /// Default: `1`
    pub sibling_levels: usize,

    /// Page ceiling for pagination stitching.
    ///
    /// Once this many pages are stitched, the next link is rendered as a
    /// plain hyperlink instead of being fetched.
    ///
    /// Default: `30`
    pub max_pages: usize,

    /// Heuristic tuning used for content extraction.
    ///
    /// Default: [`RuleSet::extraction`]
    pub extraction_rules: RuleSet,

    /// Heuristic tuning used by the article classifier.
    ///
    /// Default: [`RuleSet::classification`]
    pub classification_rules: RuleSet,

    /// Remove `<audio>` and `<video>` blocks from the markup before scoring.
    ///
    /// Default: `true`
    pub strip_media: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            sibling_levels: 1,
            max_pages: 30,
            extraction_rules: RuleSet::extraction(),
            classification_rules: RuleSet::classification(),
            strip_media: true,
        }
    }
}

impl ReaderOptions {
    /// Creates a new builder for ReaderOptions
    pub fn builder() -> ReaderOptionsBuilder {
        ReaderOptionsBuilder::default()
    }
}

/// Builder for [`ReaderOptions`].
///
/// ```rust
/// use readerview::{ReaderOptions, RuleSet};
///
/// let options = ReaderOptions::builder()
///     .sibling_levels(2)
///     .extraction_rules(RuleSet::extraction().with_min_text_length(40))
///     .build();
/// assert_eq!(options.extraction_rules.min_text_length, 40);
/// ```
#[derive(Default)]
pub struct ReaderOptionsBuilder {
    sibling_levels: Option<usize>,
    max_pages: Option<usize>,
    extraction_rules: Option<RuleSet>,
    classification_rules: Option<RuleSet>,
    strip_media: Option<bool>,
}

impl ReaderOptionsBuilder {
    /// Set how many ancestor levels sibling expansion climbs
    pub fn sibling_levels(mut self, levels: usize) -> Self {
        self.sibling_levels = Some(levels);
        self
    }

    /// Set the page ceiling for stitching
    pub fn max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Set the extraction rule set
    pub fn extraction_rules(mut self, rules: RuleSet) -> Self {
        self.extraction_rules = Some(rules);
        self
    }

    /// Set the classification rule set
    pub fn classification_rules(mut self, rules: RuleSet) -> Self {
        self.classification_rules = Some(rules);
        self
    }

    /// Keep or strip media blocks before scoring
    pub fn strip_media(mut self, strip: bool) -> Self {
        self.strip_media = Some(strip);
        self
    }

    /// Build the ReaderOptions
    pub fn build(self) -> ReaderOptions {
        let defaults = ReaderOptions::default();
        ReaderOptions {
            sibling_levels: self.sibling_levels.unwrap_or(defaults.sibling_levels),
            max_pages: self.max_pages.unwrap_or(defaults.max_pages),
            extraction_rules: self.extraction_rules.unwrap_or(defaults.extraction_rules),
            classification_rules: self
                .classification_rules
                .unwrap_or(defaults.classification_rules),
            strip_media: self.strip_media.unwrap_or(defaults.strip_media),
        }
    }
}
