//! Multi-page stitching.
//!
//! A session starts from the first page of an article, follows the best
//! next-page link, extracts each fetched page on its own and collects the
//! wrapped fragments. Fetching goes through the host's [`PageFetcher`], one
//! request at a time.

use crate::constants::{NOSCRIPT_TAG, REPLACE_BRS, REPLACE_FONTS, SCRIPT_BLOCK};
use crate::content_extractor::{extract_container, prepare_page};
use crate::dom_utils;
use crate::error::{ReaderError, Result};
use crate::fetch::{CancelFlag, PageFetcher};
use crate::next_page::NextPageFinder;
use crate::options::ReaderOptions;
use crate::style::StyleQuery;
use kuchikikiki::NodeRef;
use std::collections::HashSet;
use tracing::{info, trace, warn};
use url::Url;

/// URLs and content fingerprints consumed by one session.
///
/// Grows monotonically and is dropped with the session.
#[derive(Debug, Default, Clone)]
pub struct PageRegistry {
    visited: HashSet<String>,
    fingerprints: HashSet<String>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Record a response fingerprint. Returns `false` if it was already seen.
    pub fn record_fingerprint(&mut self, fingerprint: String) -> bool {
        self.fingerprints.insert(fingerprint)
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty() && self.fingerprints.is_empty()
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoNextLink,
    FetchFailed,
    /// The page ceiling was reached; the next link is left for the reader.
    PageLimit,
    /// A fetched page had no extractable content.
    NoContent,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Fetching(String),
    Scoring(String),
    /// The page with this number was appended.
    Appended(usize),
    Stopped(StopReason),
}

/// Result of a stitching session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchedPages {
    /// Wrapped HTML of every appended page, in order, plus the follow-on
    /// link when the ceiling was hit.
    pub fragments: Vec<String>,
    /// The next link that was not fetched because of the page ceiling.
    pub next_page_url: Option<String>,
    pub stop_reason: StopReason,
    /// Number of pages in the article, the first page included.
    pub pages: usize,
}

pub struct PaginationStitcher<'a, F: PageFetcher> {
    fetcher: &'a F,
    options: &'a ReaderOptions,
    styles: &'a dyn StyleQuery,
    page_url: Url,
    cancel: CancelFlag,
    registry: PageRegistry,
    state: SessionState,
}

impl<'a, F: PageFetcher> PaginationStitcher<'a, F> {
    /// `page_url` is the URL of the first page of the article.
    pub fn new(
        fetcher: &'a F,
        options: &'a ReaderOptions,
        styles: &'a dyn StyleQuery,
        page_url: Url,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            fetcher,
            options,
            styles,
            page_url,
            cancel,
            registry: PageRegistry::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    fn transition(&mut self, state: SessionState) {
        trace!(from = ?self.state, to = ?state, "pagination state");
        self.state = state;
    }

    /// Follow next-page links starting from `first_page`, the body of the
    /// article's first page as the host loaded it.
    pub async fn run(&mut self, first_page: &NodeRef) -> StitchedPages {
        let options: &'a ReaderOptions = self.options;
        let finder = NextPageFinder::new(&options.extraction_rules, &self.page_url);

        let mut stitched = StitchedPages {
            fragments: Vec::new(),
            next_page_url: None,
            stop_reason: StopReason::NoNextLink,
            pages: 1,
        };
        let mut source_page = first_page.clone();
        let mut source_url = self.page_url.clone();
        let mut next = finder.find(&source_page, &source_url, &mut self.registry);

        let stop_reason = loop {
            let Some(next_url) = next.take() else {
                break StopReason::NoNextLink;
            };

            let page_number = stitched.pages + 1;
            if page_number > options.max_pages {
                match view_next_page_link(&next_url) {
                    Ok(link) => stitched.fragments.push(link),
                    Err(err) => warn!(error = %err, "cannot render follow-on link"),
                }
                stitched.next_page_url = Some(next_url);
                break StopReason::PageLimit;
            }

            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            self.transition(SessionState::Fetching(next_url.clone()));
            let response = match self.fetcher.fetch(&next_url).await {
                Ok(response) if response.ok => response,
                Ok(_) => {
                    warn!(url = %next_url, "next page answered with an error status");
                    break StopReason::FetchFailed;
                }
                Err(ReaderError::Cancelled) => {
                    info!(url = %next_url, "fetch cancelled by the host");
                    break StopReason::Cancelled;
                }
                Err(err) => {
                    warn!(url = %next_url, error = %err, "next page fetch failed");
                    break StopReason::FetchFailed;
                }
            };

            if !self.registry.record_fingerprint(response.fingerprint()) {
                info!(url = %next_url, "duplicate page skipped");
                next = finder.find(&source_page, &source_url, &mut self.registry);
                continue;
            }

            self.transition(SessionState::Scoring(next_url.clone()));
            let fetched_url = match Url::parse(&next_url) {
                Ok(url) => url,
                Err(err) => {
                    warn!(url = %next_url, error = %err, "next page URL does not parse");
                    break StopReason::FetchFailed;
                }
            };
            let page = match self.load_page(&response.body) {
                Ok(page) => page,
                Err(err) => {
                    warn!(url = %next_url, error = %err, "next page could not be prepared");
                    break StopReason::NoContent;
                }
            };

            let following = finder.find(&page, &fetched_url, &mut self.registry);
            let fragment = match self.extract_page(&page, page_number) {
                Ok(Some(fragment)) => fragment,
                Ok(None) => {
                    info!(url = %next_url, "no content found in next page");
                    break StopReason::NoContent;
                }
                Err(err) => {
                    warn!(url = %next_url, error = %err, "next page extraction failed");
                    break StopReason::NoContent;
                }
            };

            stitched.fragments.push(fragment);
            stitched.pages = page_number;
            info!(page = page_number, url = %next_url, "page appended");
            self.transition(SessionState::Appended(page_number));

            source_page = page;
            source_url = fetched_url;
            next = following;
        };

        info!(reason = ?stop_reason, pages = stitched.pages, "pagination stopped");
        self.transition(SessionState::Stopped(stop_reason));
        stitched.stop_reason = stop_reason;
        stitched
    }

    fn load_page(&self, html: &str) -> Result<NodeRef> {
        let markup = prepare_fetched_page(html);
        let document = dom_utils::parse_document(&markup);
        let body = dom_utils::body_of(&document)
            .ok_or_else(|| ReaderError::InvalidDocument("fetched page has no body".to_string()))?;
        prepare_page(&dom_utils::inner_html(&body), self.options.strip_media)
    }

    fn extract_page(&self, page: &NodeRef, page_number: usize) -> Result<Option<String>> {
        let container = extract_container(
            page,
            &self.options.extraction_rules,
            self.options.sibling_levels,
            self.styles,
        )?;
        container
            .map(|container| wrap_page(page_number, &container))
            .transpose()
    }
}

/// Markup fixes applied to a fetched page before it is parsed.
pub fn prepare_fetched_page(html: &str) -> String {
    let html = SCRIPT_BLOCK.replace_all(html, "");
    let html = NOSCRIPT_TAG.replace_all(&html, "<${1}div");
    let html = REPLACE_BRS.replace_all(&html, "</p><p>");
    REPLACE_FONTS.replace_all(&html, "<${1}span>").into_owned()
}

/// The page wrapper holding one stitched page.
pub fn wrap_page(page_number: usize, container: &NodeRef) -> Result<String> {
    let wrapper = dom_utils::create_element("div")?;
    dom_utils::set_attr(&wrapper, "id", &format!("readability-page-{}", page_number));
    dom_utils::set_attr(&wrapper, "class", "page");

    let separator = dom_utils::create_element("p")?;
    let label = format!("Page {}", page_number);
    dom_utils::set_attr(&separator, "class", "page-separator");
    dom_utils::set_attr(&separator, "title", &label);
    separator.append(NodeRef::new_text(label));
    wrapper.append(separator);

    for child in container.children() {
        wrapper.append(dom_utils::deep_clone(&child));
    }
    Ok(dom_utils::outer_html(&wrapper))
}

fn view_next_page_link(url: &str) -> Result<String> {
    let wrapper = dom_utils::create_element("div")?;
    dom_utils::set_attr(&wrapper, "style", "text-align: center");
    let link = dom_utils::create_element("a")?;
    dom_utils::set_attr(&link, "href", url);
    link.append(NodeRef::new_text("View Next Page"));
    wrapper.append(link);
    Ok(dom_utils::outer_html(&wrapper))
}
