//! Allow-list HTML sanitization.
//!
//! This is the last step before article HTML becomes live DOM in the reader,
//! so every tag and attribute not listed here is dropped. `script` and
//! `style` are removed together with their contents.

use std::borrow::Cow;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use ammonia::Builder;
use regex::Regex;
use scraper::{Html, Selector};

use crate::legibility::correct_style;

pub const ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "b",
    "i",
    "u",
    "s",
    "strong",
    "em",
    "strike",
    "del",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "ul",
    "ol",
    "li",
    "a",
    "img",
    "table",
    "thead",
    "tbody",
    "tr",
    "th",
    "td",
    "div",
    "span",
    "code",
    "pre",
    "hr",
    "sup",
    "sub",
];

/// Attributes allowed on any of [`ALLOWED_TAGS`]. No `data-*` attributes.
pub const ALLOWED_ATTRIBUTES: &[&str] =
    &["href", "src", "alt", "title", "class", "id", "style"];

pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Elements removed together with their text content.
const STRIPPED_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Wiki licensing boilerplate; removed with its whole subtree.
pub const LICENSE_BOX_CLASS: &str = "licensebox";

/// What a `javascript:` href is replaced with.
pub const INERT_HREF: &str = "#";

#[derive(thiserror::Error, Debug)]
pub enum SanitizeError {
    #[error("HTML sanitizer failed: {0}")]
    Internal(String),
}

static LICENSE_BOXES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!(".{LICENSE_BOX_CLASS}")).unwrap()
});

// Browsers ignore leading whitespace and control characters before a scheme.
static JAVASCRIPT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\x00-\x20]*j\s*a\s*v\s*a\s*s\s*c\s*r\s*i\s*p\s*t\s*:")
        .unwrap()
});

static SANITIZER: LazyLock<Builder<'static>> =
    LazyLock::new(|| policy(neutralize_script_urls));

static CORRECTING_SANITIZER: LazyLock<Builder<'static>> =
    LazyLock::new(|| policy(neutralize_and_correct));

fn policy<F>(attribute_filter: F) -> Builder<'static>
where
    F: for<'u> Fn(&str, &str, &'u str) -> Option<Cow<'u, str>>
        + Send
        + Sync
        + 'static,
{
    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .clean_content_tags(STRIPPED_CONTENT_TAGS.iter().copied().collect())
        .tag_attributes(HashMap::new())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect())
        .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
        .link_rel(None)
        .strip_comments(true)
        .attribute_filter(attribute_filter);
    builder
}

/// True when `href` would execute script if followed.
pub fn is_javascript_url(href: &str) -> bool {
    JAVASCRIPT_URL.is_match(href)
}

fn neutralize_script_urls<'u>(
    _element: &str,
    attribute: &str,
    value: &'u str,
) -> Option<Cow<'u, str>> {
    if attribute == "href" && is_javascript_url(value) {
        return Some(Cow::Borrowed(INERT_HREF));
    }
    Some(Cow::Borrowed(value))
}

fn neutralize_and_correct<'u>(
    element: &str,
    attribute: &str,
    value: &'u str,
) -> Option<Cow<'u, str>> {
    if attribute == "style" {
        return Some(match correct_style(value) {
            Some(corrected) => Cow::Owned(corrected),
            None => Cow::Borrowed(value),
        });
    }
    neutralize_script_urls(element, attribute, value)
}

/// Drop every `.licensebox` element and its subtree.
pub fn remove_license_boxes(html: &str) -> String {
    let mut document = Html::parse_fragment(html);
    let boxes: Vec<_> =
        document.select(&LICENSE_BOXES).map(|el| el.id()).collect();
    if boxes.is_empty() {
        return html.to_string();
    }
    for id in boxes {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    document.root_element().inner_html()
}

fn run(builder: &Builder<'static>, html: &str) -> Result<String, SanitizeError> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let html = remove_license_boxes(html);
        builder.clean(&html).to_string()
    }))
    .map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::warn!(%message, "HTML sanitization failed");
        SanitizeError::Internal(message)
    })
}

/// Reduce `html` to the allow-listed tags and attributes, remove licensing
/// boilerplate and neutralize `javascript:` links.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = html.len()))]
pub fn sanitize(html: &str) -> Result<String, SanitizeError> {
    run(&SANITIZER, html)
}

/// [`sanitize`] with legibility correction applied to every surviving
/// `style` attribute in the same pass.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = html.len()))]
pub fn sanitize_and_correct(html: &str) -> Result<String, SanitizeError> {
    run(&CORRECTING_SANITIZER, html)
}
