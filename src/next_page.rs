//! Next-page link detection.
//!
//! Every same-site anchor whose target shares the article's base URL is
//! scored from its text, class, id, ancestors and href shape. Anchors that
//! point at the same URL are merged. The best link wins only if it scores
//! above 100.

use crate::constants::{FIRST_OR_LAST, PAGE_NUMBER_HREF, PAGINATION_HINT, PAGING_HREF};
use crate::dom_utils;
use crate::pagination::PageRegistry;
use crate::rules::RuleSet;
use crate::text_metrics::visible_text;
use crate::url_utils::{find_base_url, host_with_port, normalize_href, normalize_url};
use kuchikikiki::NodeRef;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

const NEXT_PAGE_MIN_SCORE: i32 = 100;

/// A candidate next-page URL with its accumulated score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkObjective {
    pub href: String,
    pub score: i32,
    /// Text of every anchor pointing at `href`, joined with `" | "`.
    pub link_text: String,
}

pub struct NextPageFinder<'a> {
    rules: &'a RuleSet,
    current_url: String,
    base_url: String,
    host: String,
}

impl<'a> NextPageFinder<'a> {
    /// `page_url` is the URL of the first page of the article.
    pub fn new(rules: &'a RuleSet, page_url: &Url) -> Self {
        Self {
            rules,
            current_url: normalize_url(page_url),
            base_url: find_base_url(page_url),
            host: host_with_port(page_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Score every eligible anchor under `root`. Relative hrefs resolve
    /// against `resolve_against`, the URL the markup was loaded from.
    pub fn score_links(
        &self,
        root: &NodeRef,
        resolve_against: &Url,
        registry: &PageRegistry,
    ) -> Vec<LinkObjective> {
        let mut objectives: Vec<LinkObjective> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for link in dom_utils::elements_by_tag(root, "a") {
            let Some(href) = dom_utils::get_attr(&link, "href")
                .and_then(|href| normalize_href(&href, resolve_against))
            else {
                continue;
            };
            if href.is_empty()
                || href == self.base_url
                || href == self.current_url
                || registry.is_visited(&href)
            {
                continue;
            }

            let same_host = Url::parse(&href)
                .map(|url| host_with_port(&url) == self.host)
                .unwrap_or(false);
            if !same_host {
                continue;
            }

            let link_text = visible_text(&link, true);
            if self.rules.extraneous.is_match(&link_text) {
                continue;
            }

            let leftover = href.replacen(&self.base_url, "", 1);
            if !leftover.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }

            let position = match index.get(&href) {
                Some(&position) => {
                    let merged = &mut objectives[position].link_text;
                    merged.push_str(" | ");
                    merged.push_str(&link_text);
                    position
                }
                None => {
                    index.insert(href.clone(), objectives.len());
                    objectives.push(LinkObjective {
                        href: href.clone(),
                        score: 0,
                        link_text: link_text.clone(),
                    });
                    objectives.len() - 1
                }
            };
            let delta = self.score_link(&link, &href, &link_text, &objectives[position].link_text);
            objectives[position].score = objectives[position].score.saturating_add(delta);
        }

        for objective in &objectives {
            debug!(
                href = %objective.href,
                score = objective.score,
                text = %objective.link_text,
                "next-page link scored"
            );
        }
        objectives
    }

    /// Score contribution of one anchor. `merged_text` is the text of every
    /// anchor seen so far for the same href.
    fn score_link(&self, link: &NodeRef, href: &str, link_text: &str, merged_text: &str) -> i32 {
        let mut score: i32 = 0;

        if !href.starts_with(&self.base_url) {
            score -= 25;
        }

        let link_data = format!(
            "{} {} {}{}",
            link_text,
            dom_utils::class_name(link),
            dom_utils::id(link),
            dom_utils::inner_html(link)
        );
        if self.rules.next_link.is_match(&link_data) {
            score += 50;
        }
        if PAGINATION_HINT.is_match(&link_data) {
            score += 25;
        }
        if FIRST_OR_LAST.is_match(&link_data) && !self.rules.next_link.is_match(merged_text) {
            score -= 65;
        }
        if self.rules.negative.is_match(&link_data) || self.rules.extraneous.is_match(&link_data) {
            score -= 50;
        }
        if self.rules.prev_link.is_match(&link_data) {
            score -= 200;
        }

        let mut pagination_ancestor = false;
        let mut negative_ancestor = false;
        for ancestor in link.ancestors().filter(dom_utils::is_element) {
            let class_and_id = format!(
                "{} {}",
                dom_utils::class_name(&ancestor),
                dom_utils::id(&ancestor)
            );
            if !pagination_ancestor && PAGINATION_HINT.is_match(&class_and_id) {
                pagination_ancestor = true;
                score += 25;
            }
            if !negative_ancestor
                && self.rules.negative.is_match(&class_and_id)
                && !self.rules.positive.is_match(&class_and_id)
            {
                negative_ancestor = true;
                score -= 25;
            }
        }

        if PAGE_NUMBER_HREF.is_match(href) || PAGING_HREF.is_match(href) {
            score += 25;
        }
        if self.rules.extraneous.is_match(href) {
            score -= 15;
        }

        match leading_integer(link_text) {
            Some(1) => score -= 10,
            Some(number) if number != 0 => {
                score = score.saturating_add(
                    10i64.saturating_sub(number).clamp(0, i32::MAX as i64) as i32,
                )
            }
            _ => {}
        }

        score
    }

    /// Pick the next-page URL under `root` and record it as consumed.
    pub fn find(
        &self,
        root: &NodeRef,
        resolve_against: &Url,
        registry: &mut PageRegistry,
    ) -> Option<String> {
        let objectives = self.score_links(root, resolve_against, registry);

        let mut top: Option<&LinkObjective> = None;
        for objective in &objectives {
            if objective.score > NEXT_PAGE_MIN_SCORE
                && top.map_or(true, |best| best.score < objective.score)
            {
                top = Some(objective);
            }
        }

        let next = top.map(|objective| objective.href.clone())?;
        registry.mark_visited(&next);
        Some(next)
    }
}

/// Find the next page of the article at `page_url` within its own markup.
pub fn find_next_page_link(
    root: &NodeRef,
    page_url: &Url,
    rules: &RuleSet,
    registry: &mut PageRegistry,
) -> Option<String> {
    NextPageFinder::new(rules, page_url).find(root, page_url, registry)
}

/// The integer at the start of `text`, like `parseInt`.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|number| sign * number)
}
