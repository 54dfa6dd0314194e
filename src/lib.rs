//! # readerview
//!
//! A reader-mode engine: decide whether an HTML page holds a single article,
//! extract and sanitize that article, and stitch multi-page articles into one
//! continuous document.
//!
//! ## Overview
//!
//! Extraction is driven by hand-tuned heuristics. Paragraph-like elements
//! are scored by their text, the score flows up to their ancestors, and the
//! best ancestor (discounted by its link density) becomes the seed of the
//! article. Siblings that look like part of the same article are pulled in,
//! then a rule-based cleaner removes forms, embeds, link lists and other
//! boilerplate from the result.
//!
//! ## Key Features
//!
//! - **Article gate**: [`Reader::is_probably_article`] rejects home pages, link farms and search pages
//! - **Content extraction**: [`Reader::parse`] returns the cleaned article and its title
//! - **Pagination**: [`Reader::parse_paginated`] follows next-page links through a host-provided [`PageFetcher`]
//! - **Tunable rules**: every keyword pattern and threshold lives in an injectable [`RuleSet`]
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use readerview::{Reader, ReaderOptions};
//!
//! let html = r#"<html><body><article><h1>Title</h1><p>Content...</p></article></body></html>"#;
//! let url = "https://example.com/news/article";
//!
//! let reader = Reader::new(html, Some(url), Some(ReaderOptions::default())).unwrap();
//!
//! if reader.is_probably_article() {
//!     if let Some(article) = reader.parse() {
//!         println!("Title: {}", article.title);
//!         println!("Content: {}", article.content);
//!     }
//! }
//! ```
//!
//! ## Pagination
//!
//! ```rust,no_run
//! use readerview::{CancelFlag, FetchResponse, PageFetcher, Reader, Result};
//!
//! struct Client;
//!
//! impl PageFetcher for Client {
//!     async fn fetch(&self, url: &str) -> Result<FetchResponse> {
//!         // Issue the request with the host's HTTP stack.
//!         Ok(FetchResponse::ok(format!("<html><body>{}</body></html>", url)))
//!     }
//! }
//!
//! # async fn run(html: &str) -> Result<()> {
//! let reader = Reader::new(html, Some("https://example.com/news/story"), None)?;
//! let cancel = CancelFlag::new();
//! if let Some(article) = reader.parse_paginated(&Client, cancel).await {
//!     println!("{} pages", article.pages);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use readerview::{Reader, ReaderError};
//!
//! let html = "<html>...</html>";
//! let url = "not a valid url";
//!
//! match Reader::new(html, Some(url), None) {
//!     Ok(reader) => {
//!         if let Some(article) = reader.parse() {
//!             println!("Success!");
//!         }
//!     }
//!     Err(ReaderError::InvalidUrl(url)) => {
//!         eprintln!("Invalid URL: {}", url);
//!     }
//!     Err(e) => {
//!         eprintln!("Error: {}", e);
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (candidate choice, classifier inputs,
//! next-link scores, pagination progress) and never installs a subscriber.

mod article;
pub mod candidates;
pub mod cleaner;
mod constants;
pub mod content_extractor;
pub mod dom_utils;
mod error;
mod fetch;
pub mod next_page;
mod options;
pub mod pagination;
mod reader;
mod readerable;
mod rules;
pub mod scoring;
pub mod siblings;
pub mod style;
pub mod text_metrics;
pub mod title;
pub mod url_utils;

// Public exports
pub use article::Article;
pub use candidates::{CandidateSelector, Selection};
pub use cleaner::StructuralCleaner;
pub use content_extractor::grab_article;
pub use error::{ReaderError, Result};
pub use fetch::{CancelFlag, FetchResponse, PageFetcher};
pub use next_page::{find_next_page_link, LinkObjective};
pub use options::{ReaderOptions, ReaderOptionsBuilder};
pub use pagination::{PageRegistry, SessionState, StitchedPages, StopReason};
pub use reader::Reader;
pub use readerable::{classify_candidate, is_probably_readerable, CandidateStats};
pub use rules::{RuleSet, ScanFlags};
pub use scoring::ScoreTable;
pub use siblings::SiblingExpander;
pub use style::{InlineStyles, SourceStyles, StyleQuery};
pub use title::get_article_title;
