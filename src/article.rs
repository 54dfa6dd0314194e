//! Article data structure representing the extracted output.
//!
//! ## Example
//!
//! ```rust,no_run
//! use readerview::Reader;
//!
//! let html = r#"<html><body><article><h1>My Article</h1><p>Content...</p></article></body></html>"#;
//! let reader = Reader::new(html, Some("https://example.com/my-article"), None).unwrap();
//!
//! if let Some(article) = reader.parse() {
//!     println!("Title: {}", article.title);
//!     println!("Length: {} characters", article.length);
//!     println!("HTML: {}", article.content);
//!     println!("Reader view: {}", article.to_reader_html().unwrap());
//! }
//! ```

use crate::dom_utils;
use crate::error::Result;
use crate::text_metrics::visible_text;
use serde::{Deserialize, Serialize};

/// An extracted article, possibly stitched from several pages.
///
/// ## Serialization
///
/// ```rust,no_run
/// use readerview::Reader;
/// # let html = "<html></html>";
/// # let reader = Reader::new(html, None, None).unwrap();
///
/// if let Some(article) = reader.parse() {
///     let json = serde_json::to_string_pretty(&article).unwrap();
///     println!("{}", json);
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Title derived from `<title>`, a lone `<h1>` or a title `<meta>`.
    pub title: String,

    /// Cleaned HTML of every page: the first page's article markup followed
    /// by one wrapper per stitched page.
    pub content: String,

    /// Plain text of `content` with whitespace collapsed.
    pub text_content: String,

    /// Length of `text_content` in characters.
    pub length: usize,

    /// Number of pages the article was stitched from.
    pub pages: usize,

    /// Next page left unfetched because the page ceiling was reached.
    pub next_page_url: Option<String>,

    /// `content` split per page; the first entry is the unwrapped first page.
    pub page_fragments: Vec<String>,
}

impl Article {
    /// Assemble an article from per-page fragments.
    pub fn from_pages(
        title: String,
        page_fragments: Vec<String>,
        pages: usize,
        next_page_url: Option<String>,
    ) -> Result<Self> {
        let content = page_fragments.concat();
        let text_content = visible_text(&dom_utils::parse_body(&content)?, true);
        Ok(Self {
            title,
            length: text_content.chars().count(),
            text_content,
            content,
            pages,
            next_page_url,
            page_fragments,
        })
    }

    /// Render the reader document: a title header, then the first page in its
    /// own page wrapper, then the stitched pages.
    pub fn to_reader_html(&self) -> Result<String> {
        let header = dom_utils::create_element("div")?;
        dom_utils::set_attr(&header, "id", "article_header");
        dom_utils::set_attr(&header, "class", "header");
        header.append(kuchikikiki::NodeRef::new_text(self.title.as_str()));

        let mut fragments = self.page_fragments.iter();
        let first_page = fragments.next().map(String::as_str).unwrap_or_default();

        let mut html = dom_utils::outer_html(&header);
        html.push_str(r#"<div id="readability-page-1" class="page"><p class="page-separator" title="No Page"></p>"#);
        html.push_str(first_page);
        html.push_str("</div>");
        for fragment in fragments {
            html.push_str(fragment);
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pages_counts_text() {
        let article = Article::from_pages(
            "Otters".to_string(),
            vec![
                "<p>First  page.</p>".to_string(),
                r#"<div id="readability-page-2" class="page"><p>Second.</p></div>"#.to_string(),
            ],
            2,
            None,
        )
        .unwrap();

        assert_eq!(article.text_content, "First page.Second.");
        assert_eq!(article.length, 18);
        assert!(article.content.starts_with("<p>First  page.</p>"));
    }

    #[test]
    fn test_reader_html_layout() {
        let article = Article::from_pages(
            "Rivers & <Otters>".to_string(),
            vec!["<p>One.</p>".to_string(), "<div>Two.</div>".to_string()],
            2,
            None,
        )
        .unwrap();

        let html = article.to_reader_html().unwrap();
        assert!(html.contains("Rivers &amp; &lt;Otters&gt;"));
        assert!(html.contains(
            r#"<div id="readability-page-1" class="page"><p class="page-separator" title="No Page"></p><p>One.</p></div><div>Two.</div>"#
        ));
    }
}
