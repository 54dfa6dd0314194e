//! Candidate selection: find the element most likely to hold the article.
//!
//! Paragraph-like nodes are scored by their text and the score is pushed to
//! their parent and (halved) grandparent. Each scored ancestor is then
//! discounted by its link density and the best one wins.

use crate::dom_utils;
use crate::error::Result;
use crate::rules::{RuleSet, ScanFlags};
use crate::scoring::ScoreTable;
use crate::text_metrics::{contains_cjk, count_commas, link_density, visible_text};
use kuchikikiki::NodeRef;
use tracing::debug;

/// Outcome of one scoring walk.
///
/// The score table is owned here; dropping the selection retracts all scores.
#[derive(Debug, Default)]
pub struct Selection {
    pub scores: ScoreTable,
    pub top_candidate: Option<NodeRef>,
    /// Whether CJK text was seen while scoring (only tracked with [`ScanFlags::CJK_BOOST`]).
    pub saw_cjk: bool,
}

pub struct CandidateSelector<'a> {
    rules: &'a RuleSet,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Whether the class/id of `node` marks it as boilerplate.
    pub fn is_unlikely(&self, node: &NodeRef) -> bool {
        if dom_utils::is_tag(node, "body") {
            return false;
        }
        let match_string = format!("{}{}", dom_utils::class_name(node), dom_utils::id(node));
        if !self.rules.unlikely_candidates.is_match(&match_string) {
            return false;
        }
        !(self.rules.flags.contains(ScanFlags::OK_MAYBE_OVERRIDE)
            && self.rules.ok_maybe_its_a_candidate.is_match(&match_string))
    }

    /// Paragraph-like nodes under `root`, in document order.
    ///
    /// An unlikely element is not scored itself, but its descendants still are.
    pub fn nodes_to_score(&self, root: &NodeRef) -> Vec<NodeRef> {
        let mut nodes = Vec::new();

        for node in dom_utils::descendant_elements(root) {
            if self.is_unlikely(&node) {
                continue;
            }

            let tag = dom_utils::tag_name(&node).unwrap_or_default();
            match tag.as_str() {
                "p" | "pre" => nodes.push(node),
                "td" if dom_utils::count_by_tag(&node, "table") == 0 => nodes.push(node),
                "ul" if self.rules.flags.contains(ScanFlags::SCORE_LISTS) => nodes.push(node),
                "div" => {
                    let wrapper = dom_utils::descendant_elements(&node)
                        .iter()
                        .filter_map(dom_utils::tag_name)
                        .any(|tag| self.rules.is_div_block_tag(&tag));
                    if !wrapper {
                        nodes.push(node);
                    } else {
                        nodes.extend(node.children().filter(|child| child.as_text().is_some()));
                    }
                }
                _ => {}
            }
        }

        nodes
    }

    /// Score every paragraph-like node under `root` and pick the top candidate.
    pub fn select(&self, root: &NodeRef) -> Result<Selection> {
        let mut selection = Selection::default();

        for node in self.nodes_to_score(root) {
            let Some(parent) = node.parent().filter(dom_utils::is_element) else {
                continue;
            };

            let text = visible_text(&node, true);
            let length = text.chars().count();
            if length < self.rules.min_text_length {
                continue;
            }

            if !selection.scores.is_scored(&parent) {
                selection.scores.initialize(&parent, self.rules);
            }
            let grandparent = parent.parent().filter(dom_utils::is_element);
            if let Some(grandparent) = &grandparent {
                if !selection.scores.is_scored(grandparent) {
                    selection.scores.initialize(grandparent, self.rules);
                }
            }

            let mut content_score = 1.0 + (count_commas(&text) + 1) as f64 + (length / 100).min(3) as f64;
            if self.rules.flags.contains(ScanFlags::CJK_BOOST) {
                selection.saw_cjk |= contains_cjk(&text);
                if selection.saw_cjk {
                    content_score *= 3.0;
                }
            }

            selection.scores.accumulate(&parent, content_score)?;
            if let Some(grandparent) = &grandparent {
                selection.scores.accumulate(grandparent, content_score / 2.0)?;
            }
        }

        let candidates = selection.scores.candidates().to_vec();
        let mut top: Option<(NodeRef, f64)> = None;
        for candidate in candidates {
            let raw = selection.scores.score(&candidate).unwrap_or_default();
            let adjusted = raw * (1.0 - link_density(&candidate));
            selection.scores.set(&candidate, adjusted)?;

            if top.as_ref().map_or(true, |(_, best)| adjusted > *best) {
                top = Some((candidate, adjusted));
            }
        }

        if let Some((node, score)) = &top {
            debug!(
                tag = %dom_utils::tag_name(node).unwrap_or_default(),
                class = %dom_utils::class_name(node),
                score,
                candidates = selection.scores.len(),
                "top candidate selected"
            );
        }
        selection.top_candidate = top.map(|(node, _)| node);

        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom_utils::{elements_by_tag, parse_body};

    const PROSE: &str = "Readers rarely notice the scaffolding around an article, yet it shapes everything.";

    #[test]
    fn test_unlikely_needs_override_flag() {
        let body = parse_body(r#"<div class="sidebar main"></div>"#).unwrap();
        let div = elements_by_tag(&body, "div").remove(0);

        let extraction = RuleSet::extraction();
        let classification = RuleSet::classification();
        assert!(CandidateSelector::new(&extraction).is_unlikely(&div));
        assert!(!CandidateSelector::new(&classification).is_unlikely(&div));
    }

    #[test]
    fn test_div_with_blocks_scores_text_children() {
        let rules = RuleSet::extraction();
        let selector = CandidateSelector::new(&rules);
        let body = parse_body(&format!(
            "<div>{prose}<p>{prose}</p></div><div>{prose}</div>",
            prose = PROSE
        ))
        .unwrap();

        let nodes = selector.nodes_to_score(&body);
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].as_text().is_some());
        assert!(dom_utils::is_tag(&nodes[1], "p"));
        assert!(dom_utils::is_tag(&nodes[2], "div"));
    }

    #[test]
    fn test_nested_prefixed_tag_makes_div_a_wrapper() {
        let rules = RuleSet::extraction();
        let body = parse_body(&format!(
            "<div><span><abbr>x</abbr></span> {}</div>",
            PROSE
        ))
        .unwrap();

        let nodes = CandidateSelector::new(&rules).nodes_to_score(&body);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].as_text().is_some());
    }

    #[test]
    fn test_nested_table_cells_only_innermost() {
        let rules = RuleSet::extraction();
        let selector = CandidateSelector::new(&rules);
        let body = parse_body(
            "<table><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>",
        )
        .unwrap();

        let cells = selector.nodes_to_score(&body);
        assert_eq!(cells.len(), 1);
        assert_eq!(visible_text(&cells[0], true), "inner");
    }

    #[test]
    fn test_content_score_accumulates_to_ancestors() {
        let rules = RuleSet::extraction();
        let body = parse_body(&format!(
            r#"<section><div><p>{}</p></div></section>"#,
            "word, ".repeat(20)
        ))
        .unwrap();

        let selection = CandidateSelector::new(&rules).select(&body).unwrap();
        let div = elements_by_tag(&body, "div").remove(0);
        let section = elements_by_tag(&body, "section").remove(0);

        // text is 119 chars with 20 commas: 1 + 21 + 1 = 23
        assert_eq!(selection.scores.score(&div), Some(5.0 + 23.0));
        assert_eq!(selection.scores.score(&section), Some(23.0 / 2.0));
        assert_eq!(selection.top_candidate, Some(div));
    }

    #[test]
    fn test_short_text_is_not_scored() {
        let rules = RuleSet::extraction();
        let body = parse_body("<div><p>Too short.</p></div>").unwrap();
        let selection = CandidateSelector::new(&rules).select(&body).unwrap();
        assert!(selection.scores.is_empty());
        assert!(selection.top_candidate.is_none());
    }

    #[test]
    fn test_cjk_boost_is_sticky() {
        let rules = RuleSet::classification();
        let cjk = "这是一个很长的中文句子，用来测试中日韩文字的加权计算是否正确执行了没有问题吧";
        let latin = "This is a plain latin sentence that is long enough to be scored.";
        let body = parse_body(&format!(
            r#"<div id="a"><p>{}</p></div><div id="b"><p>{}</p></div>"#,
            cjk, latin
        ))
        .unwrap();

        let selection = CandidateSelector::new(&rules).select(&body).unwrap();
        assert!(selection.saw_cjk);
        let b = elements_by_tag(&body, "div").remove(1);
        // 1 + 1 + 0 = 2, tripled after CJK was seen; div base 5
        assert_eq!(selection.scores.score(&b), Some(5.0 + 6.0));
    }
}
