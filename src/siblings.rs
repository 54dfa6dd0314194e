//! Sibling expansion: grow the article from the top candidate outward.
//!
//! Content of one article is often split across several siblings that share
//! the candidate's class. Those are pulled into a fresh container together
//! with the candidate; a lead image sitting before the candidate is recovered
//! as well.

use crate::constants::{CONTENT_ID, SENTENCE_END};
use crate::dom_utils;
use crate::error::{ReaderError, Result};
use crate::scoring::ScoreTable;
use crate::style::{image_size, StyleQuery};
use crate::text_metrics::{link_density, visible_text};
use kuchikikiki::NodeRef;
use tracing::debug;

const FLOATED_IMAGE_AREA: u32 = 40_000;
const BLOCK_IMAGE_AREA: u32 = 15_000;

/// The assembled article container and the scores carried over to its nodes.
#[derive(Debug)]
pub struct Expansion {
    pub container: NodeRef,
    pub scores: ScoreTable,
}

pub struct SiblingExpander<'a> {
    scores: &'a ScoreTable,
    styles: &'a dyn StyleQuery,
    levels: usize,
}

impl<'a> SiblingExpander<'a> {
    /// `levels` is how many ancestors above the candidate's parent are scanned.
    pub fn new(scores: &'a ScoreTable, styles: &'a dyn StyleQuery, levels: usize) -> Self {
        Self {
            scores,
            styles,
            levels,
        }
    }

    /// Build the detached article container around `top_candidate`.
    ///
    /// Everything placed in the container is a copy; the scanned tree is not
    /// modified. Copies inherit the scores of the nodes they were made from.
    pub fn expand(&self, top_candidate: &NodeRef) -> Result<Expansion> {
        let top_score = self
            .scores
            .score(top_candidate)
            .ok_or(ReaderError::UnscoredNode)?;
        let top_class = dom_utils::class_name(top_candidate);

        let container = dom_utils::create_element("div")?;
        dom_utils::set_attr(&container, "id", CONTENT_ID);
        let mut scores = ScoreTable::new();

        let threshold = f64::max(10.0, top_score * 0.2);
        let mut check_node = top_candidate.clone();

        for _ in 0..=self.levels {
            let Some(parent) = check_node.parent() else {
                break;
            };

            let mut probe_images = true;
            for sibling in parent.children() {
                if sibling == *top_candidate || sibling == check_node {
                    probe_images = false;
                }
                if !dom_utils::is_element(&sibling) {
                    continue;
                }

                let append = sibling == *top_candidate
                    || self.shares_class_and_score(&sibling, &top_class, top_score, threshold)
                    || is_matching_paragraph(&sibling, &top_class);

                if append {
                    container.append(self.rebox(&sibling, &mut scores)?);
                } else if probe_images {
                    if let Some(image) = self.worthy_image(&sibling) {
                        container.prepend(dom_utils::shallow_clone(&image));
                    }
                }
            }

            check_node = parent;
        }

        debug!(
            children = container.children().count(),
            threshold, "article container assembled"
        );
        Ok(Expansion { container, scores })
    }

    /// Copy of `sibling` shaped as a `<div>` or `<p>`.
    fn rebox(&self, sibling: &NodeRef, scores: &mut ScoreTable) -> Result<NodeRef> {
        if dom_utils::is_tag(sibling, "div") || dom_utils::is_tag(sibling, "p") {
            let copy = dom_utils::deep_clone(sibling);
            scores.inherit(self.scores, sibling, &copy);
            return Ok(copy);
        }

        let wrapper = dom_utils::create_element("div")?;
        let id = dom_utils::id(sibling);
        if !id.is_empty() {
            dom_utils::set_attr(&wrapper, "id", &id);
        }
        for child in sibling.children() {
            let copy = dom_utils::deep_clone(&child);
            scores.inherit(self.scores, &child, &copy);
            wrapper.append(copy);
        }
        Ok(wrapper)
    }

    fn shares_class_and_score(
        &self,
        sibling: &NodeRef,
        top_class: &str,
        top_score: f64,
        threshold: f64,
    ) -> bool {
        if top_class.is_empty() || dom_utils::class_name(sibling) != top_class {
            return false;
        }
        let bonus = top_score * 0.2;
        self.scores
            .score(sibling)
            .map_or(false, |score| score + bonus >= threshold)
    }

    /// The last image under `node` large enough to be a lead image, judged by
    /// the float/display of `node` itself.
    pub fn worthy_image(&self, node: &NodeRef) -> Option<NodeRef> {
        if !dom_utils::is_element(node) {
            return None;
        }

        let float = self.styles.property(node, "float");
        let display = self.styles.property(node, "display");

        dom_utils::elements_by_tag(node, "img")
            .into_iter()
            .filter(|img| {
                let (width, height) = image_size(img);
                let area = width.saturating_mul(height);
                match float.as_str() {
                    "left" | "right" => area >= FLOATED_IMAGE_AREA,
                    "none" => display == "block" && area >= BLOCK_IMAGE_AREA,
                    _ => false,
                }
            })
            .last()
    }
}

/// A `<p>` with the candidate's class that reads like prose.
fn is_matching_paragraph(sibling: &NodeRef, top_class: &str) -> bool {
    if !dom_utils::is_tag(sibling, "p")
        || top_class.is_empty()
        || dom_utils::class_name(sibling) != top_class
    {
        return false;
    }

    let density = link_density(sibling);
    let text = visible_text(sibling, true);
    let length = text.chars().count();

    (length > 80 && density < 0.25)
        || (length < 80 && density == 0.0 && SENTENCE_END.is_match(&text))
}
