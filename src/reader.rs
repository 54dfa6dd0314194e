//! The [`Reader`] struct and the extraction entry points.
//!
//! ## Example
//!
//! ```rust,no_run
//! use readerview::Reader;
//!
//! let html = std::fs::read_to_string("article.html").unwrap();
//! let url = "https://example.com/news/big-story";
//!
//! let reader = Reader::new(&html, Some(url), None)?;
//!
//! if reader.is_probably_article() {
//!     if let Some(article) = reader.parse() {
//!         println!("Title: {}", article.title);
//!         std::fs::write("output.html", article.to_reader_html()?)?;
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    article::Article,
    content_extractor::grab_article,
    dom_utils,
    error::{ReaderError, Result},
    fetch::{CancelFlag, PageFetcher},
    options::ReaderOptions,
    pagination::PaginationStitcher,
    readerable::is_probably_readerable,
    style::{InlineStyles, StyleQuery},
    title::get_article_title,
};
use kuchikikiki::NodeRef;
use scraper::Html;
use tracing::{debug, warn};
use url::Url;

/// Reader-mode engine for one HTML document.
///
/// ## Lifecycle
///
/// Construct with [`Reader::new()`], optionally gate with
/// [`is_probably_article()`](Reader::is_probably_article), then call
/// [`parse()`](Reader::parse) or, when the host can fetch pages,
/// [`parse_paginated()`](Reader::parse_paginated).
///
/// The document is never modified: every extraction works on its own copy,
/// so the methods can be called repeatedly.
///
/// ## With Custom Options
///
/// ```rust
/// use readerview::{Reader, ReaderOptions};
///
/// let options = ReaderOptions::builder()
///     .sibling_levels(0)
///     .strip_media(false)
///     .build();
///
/// let reader = Reader::new("<html>...</html>", None, Some(options))?;
/// assert!(reader.parse().is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Reader {
    /// Mutable-tree view of the document, used by every scan
    document: NodeRef,

    /// Title computed from the `scraper` view at construction
    title: String,

    /// Page URL, required for classification by URL and for pagination
    url: Option<Url>,

    options: ReaderOptions,

    styles: Box<dyn StyleQuery>,
}

impl Reader {
    /// Create a new Reader instance
    ///
    /// # Arguments
    /// * `html` - The HTML document
    /// * `url` - Optional URL the document was loaded from
    /// * `options` - Optional configuration options
    ///
    /// # Errors
    /// [`ReaderError::InvalidUrl`] when `url` is not an absolute URL.
    pub fn new(html: &str, url: Option<&str>, options: Option<ReaderOptions>) -> Result<Self> {
        let url = parse_url(url)?;
        let title = get_article_title(&Html::parse_document(html));
        let document = dom_utils::parse_document(html);

        Ok(Self {
            document,
            title,
            url,
            options: options.unwrap_or_default(),
            styles: Box::new(InlineStyles),
        })
    }

    /// Create a Reader over a tree the host already holds.
    ///
    /// The tree is shared, not copied, so a [`StyleQuery`] installed with
    /// [`with_styles()`](Reader::with_styles) is asked about the host's own
    /// elements. It is still never modified.
    pub fn from_document(
        document: NodeRef,
        url: Option<&str>,
        options: Option<ReaderOptions>,
    ) -> Result<Self> {
        let url = parse_url(url)?;
        let title = get_article_title(&Html::parse_document(&document.to_string()));

        Ok(Self {
            document,
            title,
            url,
            options: options.unwrap_or_default(),
            styles: Box::new(InlineStyles),
        })
    }

    /// Use `styles` for the float/display lookups of the lead-image probe.
    ///
    /// Lookups for the first page receive elements of [`document()`](Reader::document).
    /// Pages fetched during pagination exist only as parsed copies, so their
    /// lookups receive those.
    pub fn with_styles(mut self, styles: impl StyleQuery + 'static) -> Self {
        self.styles = Box::new(styles);
        self
    }

    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Whether the page looks like a single article.
    pub fn is_probably_article(&self) -> bool {
        is_probably_readerable(
            &self.document,
            self.url.as_ref(),
            &self.options.classification_rules,
        )
    }

    /// Extract the article from this page only.
    pub fn parse(&self) -> Option<Article> {
        let first_page = self.first_page()?;
        self.assemble(vec![first_page], 1, None)
    }

    /// Extract the article and follow its next-page links through `fetcher`.
    ///
    /// Without a page URL this behaves like [`parse()`](Reader::parse).
    pub async fn parse_paginated<F: PageFetcher>(
        &self,
        fetcher: &F,
        cancel: CancelFlag,
    ) -> Option<Article> {
        let first_page = self.first_page()?;

        let (Some(url), Some(body)) = (self.url.clone(), dom_utils::body_of(&self.document)) else {
            debug!("no page URL, pagination skipped");
            return self.assemble(vec![first_page], 1, None);
        };

        let mut stitcher =
            PaginationStitcher::new(fetcher, &self.options, self.styles.as_ref(), url, cancel);
        let stitched = stitcher.run(&body).await;

        let mut fragments = Vec::with_capacity(stitched.fragments.len() + 1);
        fragments.push(first_page);
        fragments.extend(stitched.fragments);
        self.assemble(fragments, stitched.pages, stitched.next_page_url)
    }

    fn first_page(&self) -> Option<String> {
        match grab_article(
            &self.document,
            &self.options.extraction_rules,
            &self.options,
            self.styles.as_ref(),
        ) {
            Ok(Some(content)) => Some(content),
            Ok(None) => {
                debug!("no article content found");
                None
            }
            Err(err) => {
                warn!(error = %err, "article extraction failed");
                None
            }
        }
    }

    fn assemble(
        &self,
        fragments: Vec<String>,
        pages: usize,
        next_page_url: Option<String>,
    ) -> Option<Article> {
        Article::from_pages(self.title.clone(), fragments, pages, next_page_url)
            .map_err(|err| warn!(error = %err, "article assembly failed"))
            .ok()
    }
}

fn parse_url(url: Option<&str>) -> Result<Option<Url>> {
    url.map(|raw| Url::parse(raw).map_err(|_| ReaderError::InvalidUrl(raw.to_string())))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = Reader::new("<html></html>", Some("not a url"), None);
        assert!(matches!(result, Err(ReaderError::InvalidUrl(url)) if url == "not a url"));
    }

    #[test]
    fn test_parse_simple() {
        let paragraphs: String = (0..5)
            .map(|i| format!("<p>Paragraph {} says something, with commas, at a length that counts as prose.</p>", i))
            .collect();
        let html = format!(
            "<html><head><title>Otters return to the river after forty years</title></head><body><div id=\"content\">{}</div></body></html>",
            paragraphs
        );

        let reader = Reader::new(&html, Some("https://example.com/nature/otters"), None).unwrap();
        let article = reader.parse().unwrap();

        assert_eq!(article.title, "Otters return to the river after forty years");
        assert_eq!(article.pages, 1);
        assert!(article.text_content.contains("Paragraph 4 says something"));
        assert_eq!(article.length, article.text_content.chars().count());
        assert!(reader.parse().is_some());
    }
}
