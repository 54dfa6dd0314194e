//! URL helpers for pagination.

use crate::constants::{PAGE_SEGMENT_SUFFIX, SHORT_NUMBER_SEGMENT};
use url::Url;

/// `host[:port]` of a URL, empty for URLs without a host.
pub fn host_with_port(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

/// Resolve `href` against `base`, drop the fragment and one trailing slash.
pub fn normalize_href(href: &str, base: &Url) -> Option<String> {
    let mut resolved = base.join(href.trim()).ok()?;
    resolved.set_fragment(None);
    Some(strip_trailing_slash(resolved.as_str()).to_string())
}

/// A URL in the same normalized form as [`normalize_href`] produces.
pub fn normalize_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    strip_trailing_slash(url.as_str()).to_string()
}

fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// The URL of the article with page-number decorations removed from the path.
///
/// Pages of one article share this prefix: `/story/page2` and `/story/3`
/// both reduce to `/story`. The query string is dropped.
pub fn find_base_url(url: &Url) -> String {
    let segments: Vec<&str> = url.path().split('/').rev().collect();
    let last_segment_has_letters = segments
        .first()
        .map_or(false, |segment| segment.chars().any(|c| c.is_ascii_alphabetic()));

    let mut cleaned = Vec::with_capacity(segments.len());
    for (i, raw) in segments.iter().enumerate() {
        let mut segment = raw.to_string();

        if let Some((stem, extension)) = segment.split_once('.') {
            let extension = extension.split('.').next().unwrap_or_default();
            if extension.chars().all(|c| c.is_ascii_alphabetic()) {
                segment = stem.to_string();
            }
        }

        if segment.contains(",00") {
            segment = segment.replacen(",00", "", 1);
        }

        if i < 2 {
            segment = PAGE_SEGMENT_SUFFIX.replace(&segment, "").into_owned();
        }

        let delete = (i < 2 && SHORT_NUMBER_SEGMENT.is_match(&segment))
            || (i == 0 && segment.eq_ignore_ascii_case("index"))
            || (i < 2 && segment.chars().count() < 3 && !last_segment_has_letters);

        if !delete {
            cleaned.push(segment);
        }
    }

    cleaned.reverse();
    format!(
        "{}://{}{}",
        url.scheme(),
        host_with_port(url),
        cleaned.join("/")
    )
}
