//! Compiled patterns and fixed tables used across the crate.
//!
//! The two keyword tables are kept apart on purpose: extraction and
//! classification were tuned separately and disagree on a few keywords.
//! Components never read these statics directly; they receive a
//! [`RuleSet`](crate::RuleSet) built from them.

use once_cell::sync::Lazy;
use regex::Regex;

/// Keyword patterns of one heuristic tuning.
#[derive(Debug, Clone)]
pub struct Regexps {
    pub unlikely_candidates: Regex,
    pub ok_maybe_its_a_candidate: Regex,
    pub positive: Regex,
    pub negative: Regex,
    pub extraneous: Regex,
    pub videos: Regex,
    pub next_link: Regex,
    pub prev_link: Regex,
    pub non_article_urls: Regex,
}

const UNLIKELY_CANDIDATES: &str = r"(?i)combx|comment|community|disqus|extra|foot|header|menu|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|tweet|twitter";
const OK_MAYBE_ITS_A_CANDIDATE: &str = r"(?i)and|article|body|column|main|shadow";
const EXTRANEOUS: &str = r"(?i)print|archive|comment|discuss|e[\-]?mail|share|reply|all|login|sign|single";
const VIDEOS: &str = r"(?i)https?://(www\.)?(youtube|vimeo)\.com";
const NEXT_LINK: &str = r"(?i)(next|right|weiter|continue|>([^\|]|$)|\x{00BB}([^\|]|$))";
const PREV_LINK: &str = r"(?i)(prev|earl|old|<|\x{226A})";
const NON_ARTICLE_URLS: &str = r"(?i)(\?mview=desktop|\?ref=smartphone|apple\.com|query=|search\?|\?from=mobile|signup|login|twitter|facebook|linkedin|dromaeo|gsshop|cinderella|gdive)";

/// Patterns used while extracting article content.
pub static EXTRACTION_REGEXPS: Lazy<Regexps> = Lazy::new(|| Regexps {
    unlikely_candidates: Regex::new(UNLIKELY_CANDIDATES).unwrap(),
    ok_maybe_its_a_candidate: Regex::new(OK_MAYBE_ITS_A_CANDIDATE).unwrap(),
    positive: Regex::new(
        r"(?i)article|body|content|entry|hentry|main|page|pagination|post|text|blog|story|date",
    )
    .unwrap(),
    negative: Regex::new(
        r"(?i)combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|outbrain|promo|related|scroll|shoutbox|sidebar|sponsor|shopping|tags|script|tool|widget|scbox|reply|div_dispalyslide|galleryad|disqus_thread|cnn_strylftcntnt|topRightNarrow|fs-stylelist-thumbnails|replText|ttalk_layer|disqus_post_message|disqus_post_title|cnn_strycntntrgt|wpadvert|sharedaddy sd-like-enabled sd-sharing-enabled|fs-slideshow-wrapper|fs-stylelist-launch|reply_box|contentHeader|jive-paginator lw-label",
    )
    .unwrap(),
    extraneous: Regex::new(EXTRANEOUS).unwrap(),
    videos: Regex::new(VIDEOS).unwrap(),
    next_link: Regex::new(NEXT_LINK).unwrap(),
    prev_link: Regex::new(PREV_LINK).unwrap(),
    non_article_urls: Regex::new(NON_ARTICLE_URLS).unwrap(),
});

/// Patterns used by the "is this an article" gate.
pub static CLASSIFICATION_REGEXPS: Lazy<Regexps> = Lazy::new(|| Regexps {
    unlikely_candidates: Regex::new(UNLIKELY_CANDIDATES).unwrap(),
    ok_maybe_its_a_candidate: Regex::new(OK_MAYBE_ITS_A_CANDIDATE).unwrap(),
    positive: Regex::new(
        r"(?i)article|body|content|entry|hentry|main|page|pagination|post|text|blog|story|windowclassic",
    )
    .unwrap(),
    negative: Regex::new(
        r"(?i)contents|combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|outbrain|promo|related|scroll|shoutbox|sidebar|date|sponsor|shopping|tags|script|tool|widget|scbox|rail|reply|div_dispalyslide|galleryad|disqus_thread|cnn_strylftcntnt|topRightNarrow|fs-stylelist-thumbnails|replText|ttalk_layer|disqus_post_message|disqus_post_title|cnn_strycntntrgt|wpadvert|sharedaddy sd-like-enabled sd-sharing-enabled|fs-slideshow-wrapper|fs-stylelist-launch|fs-stylelist-next|fs-thumbnail-194230|reply_box|textClass errorContent|mainHeadlineBrief|mainSlideDetails|curvedContent|photo|home_|XMOD",
    )
    .unwrap(),
    extraneous: Regex::new(EXTRANEOUS).unwrap(),
    videos: Regex::new(VIDEOS).unwrap(),
    next_link: Regex::new(NEXT_LINK).unwrap(),
    prev_link: Regex::new(PREV_LINK).unwrap(),
    non_article_urls: Regex::new(NON_ARTICLE_URLS).unwrap(),
});

/// Tag-name prefixes that make a `<div>` a structural wrapper rather than a paragraph.
///
/// Matching is by prefix, so `a` also covers `abbr`, `audio` and `article`.
pub const DIV_BLOCK_PREFIXES: [&str; 11] = [
    "a",
    "blockquote",
    "dl",
    "div",
    "img",
    "ol",
    "p",
    "pre",
    "table",
    "ul",
    "article",
];

/// Classes whose presence anywhere in the document protects divs from conditional removal.
pub const WHITELIST_CLASSES: [&str; 4] = [
    "whois_record",
    "sixteen columns hreview hentry hnews full",
    "list",
    "view_cnt",
];

/// Id of the element that, when non-empty, protects divs from conditional removal.
pub const WHITELIST_ID: &str = "description";

/// Elements carrying exactly this class keep their inline `style`.
pub const STYLED_MARKER_CLASS: &str = "readability-styled";

/// Id given to the assembled article container.
pub const CONTENT_ID: &str = "readability-content";

pub static NORMALIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
pub static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.( |$)").unwrap());

pub static AUDIO_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<audio[\s\S]*?</?audio>").unwrap());
pub static VIDEO_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<video[\s\S]*?</?video>").unwrap());
pub static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").unwrap());
pub static NOSCRIPT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(/?)noscript").unwrap());
pub static REPLACE_BRS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(<br[^>]*>[ \n\r\t]*){2,}").unwrap());
pub static REPLACE_FONTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(/?)font[^>]*>").unwrap());

pub static PAGINATION_HINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pag(e|ing|inat)").unwrap());
pub static FIRST_OR_LAST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(first|last)").unwrap());
pub static PAGE_NUMBER_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)p(a|g|ag)?(e|ing|ination)?(=|/)[0-9]{1,2}").unwrap());
pub static PAGING_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(page|paging)").unwrap());
pub static PAGE_SEGMENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)((_|-)?p[a-z]*|(_|-))[0-9]{1,2}$").unwrap());
pub static SHORT_NUMBER_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}$").unwrap());

pub static TITLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r" [\|\-] ").unwrap());
pub static TITLE_BEFORE_LAST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*)[\|\-] .*").unwrap());
pub static TITLE_AFTER_FIRST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\|\-]*[\|\-](.*)").unwrap());
pub static TITLE_AFTER_LAST_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r".*:(.*)").unwrap());
pub static TITLE_AFTER_FIRST_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^:]*[:](.*)").unwrap());
