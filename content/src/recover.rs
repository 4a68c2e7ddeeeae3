//! Recovery of images the upstream wiki renderer dropped.
//!
//! The upstream converter renders plain `[[image file]]` blocks but loses
//! the aligned variants (`[[=image]]`, `[[<image]]`, `[[>image]]`,
//! `[[f<image]]`, `[[f>image]]`) and `component:image-block` includes. This
//! module finds those references in the source markup, resolves them to
//! file URLs and splices them back into the rendered HTML near the section
//! they came from.
//!
//! Placement is approximate: sections are matched by counting horizontal
//! rules in the source and in the rendered HTML. When the counts disagree,
//! images are clamped to the nearest boundary instead of failing.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use html_escape::encode_double_quoted_attribute;
use payloads::ArticleSlug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use url::Url;

use crate::config::ContentConfig;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const FILENAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static RENDERED_IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#,
    )
    .unwrap()
});

static RENDERED_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<hr\b[^>]*>").unwrap());

static RENDERED_LICENSE_BOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<div\b[^>]*\bclass\s*=\s*["'](?:[^"']*\s)?licensebox(?:\s|["'])"#,
    )
    .unwrap()
});

static SOURCE_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\[\[include\s+:?(?:scp-wiki:)?component:license-box|\[\[div\s+class\s*=\s*"footer-wikiwalk-nav""#,
    )
    .unwrap()
});

static SOURCE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-{4,}[ \t]*\r?$").unwrap());

static BRACKET_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\[(f?[<>]|=)?image\s+([^\s\]]+)([^\]]*)\]\]").unwrap()
});

static STYLE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static IMAGE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[\[include\s+:?(?:scp-wiki:)?component:image-block\b([^\]]*)\]\]",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Alignment for a bracket-image prefix such as `=` or `f<`.
    fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix.map(|p| p.to_ascii_lowercase()).as_deref() {
            Some("<" | "f<") => Self::Left,
            Some(">" | "f>") => Self::Right,
            _ => Self::Center,
        }
    }

    fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// An image referenced by the source markup but absent from the rendered
/// HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredImageRef {
    pub resolved_src: String,
    pub inline_style: String,
    pub alignment: Alignment,
    /// Number of horizontal rules preceding the reference in the source.
    pub segment_index: usize,
    /// Byte offset of the reference in the boilerplate-stripped source.
    pub source_offset: usize,
}

/// Every `src` already rendered, plus each one's basename.
#[derive(Debug, Default)]
pub struct RenderedSrcSet(HashSet<String>);

impl RenderedSrcSet {
    pub fn from_html(html: &str) -> Self {
        let mut set = Self::default();
        for caps in RENDERED_IMG_SRC.captures_iter(html) {
            if let Some(src) =
                caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))
            {
                set.insert(src.as_str().trim());
            }
        }
        set
    }

    pub fn insert(&mut self, src: &str) {
        if src.is_empty() {
            return;
        }
        let name = basename(src);
        self.0.insert(src.to_string());
        self.0.insert(name.to_string());
        self.0.insert(decode(name));
    }

    /// True when `src`, its basename, or its decoded basename was rendered.
    pub fn contains(&self, src: &str) -> bool {
        let name = basename(src);
        self.0.contains(src)
            || (!name.is_empty()
                && (self.0.contains(name) || self.0.contains(&decode(name))))
    }

}

fn basename(src: &str) -> &str {
    src.rsplit('/').next().unwrap_or(src)
}

fn decode(name: &str) -> String {
    percent_decode_str(name).decode_utf8_lossy().into_owned()
}

/// Resolve an image reference from source markup to the URL it should be
/// loaded from.
///
/// Absolute URLs are kept (upgraded to https) only on trusted hosts, other
/// references containing a colon are namespaced and unresolvable, and bare
/// filenames map to the per-article file area.
pub fn resolve_reference(
    reference: &str,
    slug_segment: &str,
    config: &ContentConfig,
) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let absolute = if reference.starts_with("//") {
        Some(format!("https:{reference}"))
    } else {
        let lower = reference.to_ascii_lowercase();
        (lower.starts_with("http://") || lower.starts_with("https://"))
            .then(|| reference.to_string())
    };
    if let Some(absolute) = absolute {
        let mut url = Url::parse(&absolute).ok()?;
        if !config.trusts_host(url.host_str()?) {
            return None;
        }
        url.set_scheme("https").ok()?;
        return Some(url.to_string());
    }

    if reference.contains(':') {
        return None;
    }
    Some(format!(
        "{}/{}/{}",
        config.files_base_url.trim_end_matches('/'),
        slug_segment,
        utf8_percent_encode(reference, FILENAME)
    ))
}

/// Cut the source at the first trailing boilerplate block (license box or
/// wikiwalk footer).
pub fn strip_source_boilerplate(source: &str) -> &str {
    match SOURCE_BOILERPLATE.find(source) {
        Some(m) => &source[..m.start()],
        None => source,
    }
}

struct Candidate<'a> {
    offset: usize,
    reference: &'a str,
    style: String,
    alignment: Alignment,
}

fn bracket_candidates(body: &str) -> impl Iterator<Item = Candidate<'_>> {
    BRACKET_IMAGE.captures_iter(body).filter_map(|caps| {
        let whole = caps.get(0)?;
        let reference = caps.get(2)?.as_str();
        let style = caps
            .get(3)
            .and_then(|params| STYLE_PARAM.captures(params.as_str()))
            .and_then(|style| style.get(1).or_else(|| style.get(2)))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        Some(Candidate {
            offset: whole.start(),
            reference,
            style,
            alignment: Alignment::from_prefix(caps.get(1).map(|m| m.as_str())),
        })
    })
}

fn block_candidates(body: &str) -> impl Iterator<Item = Candidate<'_>> {
    IMAGE_BLOCK.captures_iter(body).filter_map(|caps| {
        let whole = caps.get(0)?;
        let params = caps.get(1)?.as_str();

        let mut reference = None;
        let mut alignment = Alignment::Right;
        let mut style = String::new();
        for param in params.split('|') {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim().to_ascii_lowercase().as_str() {
                "name" if !value.is_empty() => reference = Some(value),
                "align" => {
                    alignment = Alignment::from_param(value).unwrap_or(alignment)
                }
                "width" if !value.is_empty() => {
                    let unit = if value.chars().all(|c| c.is_ascii_digit()) {
                        "px"
                    } else {
                        ""
                    };
                    style = format!("width: {value}{unit};");
                }
                _ => {}
            }
        }

        Some(Candidate {
            offset: whole.start(),
            reference: reference?,
            style,
            alignment,
        })
    })
}

/// Find every image referenced in `source` that `content` does not already
/// show, in source order.
pub fn find_missing_images(
    content: &str,
    source: &str,
    slug: &str,
    config: &ContentConfig,
) -> Vec<RecoveredImageRef> {
    let slug = ArticleSlug::from(slug);
    if content.trim().is_empty() || source.trim().is_empty() || slug.is_blank()
    {
        return Vec::new();
    }

    let rendered = RenderedSrcSet::from_html(content);
    let body = strip_source_boilerplate(source);
    let rules: Vec<usize> =
        SOURCE_RULE.find_iter(body).map(|m| m.start()).collect();
    let slug_segment = slug.file_segment();

    let mut candidates: Vec<Candidate> =
        bracket_candidates(body).chain(block_candidates(body)).collect();
    candidates.sort_by_key(|c| c.offset);

    let mut seen = HashSet::new();
    let mut images = Vec::new();
    for candidate in candidates {
        let Some(src) =
            resolve_reference(candidate.reference, &slug_segment, config)
        else {
            tracing::trace!(
                reference = candidate.reference,
                "skipping unresolvable image reference"
            );
            continue;
        };
        if rendered.contains(&src) || !seen.insert(src.clone()) {
            continue;
        }
        images.push(RecoveredImageRef {
            resolved_src: src,
            inline_style: candidate.style,
            alignment: candidate.alignment,
            segment_index: rules.partition_point(|&rule| rule < candidate.offset),
            source_offset: candidate.offset,
        });
    }
    images
}

/// The block-level markup inserted for one recovered image.
pub fn image_fragment(image: &RecoveredImageRef) -> String {
    let style = image.inline_style.trim();
    let style_attr = if style.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, encode_double_quoted_attribute(style))
    };
    format!(
        r#"<div style="text-align: {};"><img src="{}"{} alt="" loading="lazy" /></div>"#,
        image.alignment.as_css(),
        encode_double_quoted_attribute(&image.resolved_src),
        style_attr,
    )
}

/// Splice recovered images into `content`.
///
/// Segment 0 goes to the top of the document, segment `k` directly before
/// the `k`-th rendered `<hr>`, and anything past the last rendered rule
/// before the license box (or the end of the document). With no rendered
/// rules at all, every image goes to the top.
pub fn insert_images(content: &str, images: &[RecoveredImageRef]) -> String {
    if images.is_empty() {
        return content.to_string();
    }

    let body_end = RENDERED_LICENSE_BOX
        .find(content)
        .map_or(content.len(), |m| m.start());
    let rules: Vec<usize> = RENDERED_RULE
        .find_iter(&content[..body_end])
        .map(|m| m.start())
        .collect();

    let mut plan: BTreeMap<usize, String> = BTreeMap::new();
    for image in images {
        let offset = match image.segment_index {
            _ if rules.is_empty() => 0,
            0 => 0,
            k if k <= rules.len() => rules[k - 1],
            _ => body_end,
        };
        plan.entry(offset)
            .or_default()
            .push_str(&image_fragment(image));
    }

    let mut html = content.to_string();
    for (offset, fragment) in plan.iter().rev() {
        html.insert_str(*offset, fragment);
    }
    html
}

/// Re-insert images that `source` references but `content` lacks.
///
/// Returns `content` unchanged when any input is blank or nothing needs
/// recovering.
#[tracing::instrument(
    level = "debug",
    skip(content, source, config),
    fields(recovered = tracing::field::Empty)
)]
pub fn recover_images(
    content: &str,
    source: &str,
    slug: &str,
    config: &ContentConfig,
) -> String {
    let images = find_missing_images(content, source, slug, config);
    tracing::Span::current().record("recovered", images.len());
    insert_images(content, &images)
}
