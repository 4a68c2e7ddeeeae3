//! Inline-style repair for articles written against a light page theme.
//!
//! The reader renders on a dark background, so legacy markup that sets a
//! light background without a text color (or dark text without any
//! background) becomes unreadable. Only those two patterns are fixed.

use std::sync::LazyLock;

use scraper::{Html, Node, Selector};

use crate::color::parse_color;

/// Text color forced onto elements that only declare a background.
pub const FALLBACK_TEXT_COLOR: &str = "#1a1a1a";
/// Background forced behind dark text that declares no background.
pub const FALLBACK_BACKGROUND_COLOR: &str = "#f5f5f5";
/// Foreground colors darker than this are assumed to target a light page.
pub const DARK_TEXT_LUMINANCE: f64 = 0.4;

const BACKGROUND_PROPERTIES: [&str; 3] =
    ["background", "background-color", "background-image"];
const NON_VISUAL_VALUES: [&str; 6] =
    ["", "transparent", "none", "inherit", "initial", "unset"];
/// Color values that are valid CSS but carry no concrete color.
const COLOR_KEYWORDS: [&str; 7] = [
    "currentcolor",
    "transparent",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
];

static STYLED_ELEMENTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[style]").unwrap());

/// A single `property: value` pair from an inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    /// Lower-cased property name.
    pub property: String,
    pub value: &'a str,
}

/// Split an inline style into declarations.
///
/// Semicolons inside parentheses or quotes (`url(data:...;base64,...)`) do
/// not end a declaration. Fragments without a colon are dropped.
pub fn parse_declarations(style: &str) -> Vec<Declaration<'_>> {
    let mut declarations = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                push_declaration(&mut declarations, &style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_declaration(&mut declarations, &style[start..]);
    declarations
}

fn push_declaration<'a>(out: &mut Vec<Declaration<'a>>, raw: &'a str) {
    let Some((property, value)) = raw.split_once(':') else {
        return;
    };
    let property = property.trim();
    if property.is_empty() {
        return;
    }
    out.push(Declaration {
        property: property.to_ascii_lowercase(),
        value: value.trim(),
    });
}

fn is_visual_background(value: &str) -> bool {
    !NON_VISUAL_VALUES.contains(&strip_important(value).as_str())
}

fn strip_important(value: &str) -> String {
    let value = value.trim().to_ascii_lowercase();
    match value.strip_suffix("!important") {
        Some(rest) => rest.trim_end().to_string(),
        None => value,
    }
}

/// True when a `color` value would survive CSS parsing. Empty or garbage
/// values are dropped by the browser, so the element has no inline color.
/// Functional notations (`var(...)`, `oklch(...)`) are trusted as written.
fn is_declared_color(value: &str) -> bool {
    let value = strip_important(value);
    !value.is_empty()
        && (parse_color(&value).is_some()
            || COLOR_KEYWORDS.contains(&value.as_str())
            || value.ends_with(')'))
}

/// Compute the corrected form of an inline style, or `None` when it should
/// be left alone.
///
/// 1. A visible background without a text color gets
///    [`FALLBACK_TEXT_COLOR`].
/// 2. A dark text color without any background declaration gets
///    [`FALLBACK_BACKGROUND_COLOR`].
///
/// Colors that do not parse are never guessed at.
pub fn correct_style(style: &str) -> Option<String> {
    if style.trim().is_empty() {
        return None;
    }
    let declarations = parse_declarations(style);

    let color = declarations
        .iter()
        .rev()
        .find(|d| d.property == "color" && is_declared_color(d.value))
        .map(|d| d.value);
    let backgrounds: Vec<&str> = declarations
        .iter()
        .filter(|d| BACKGROUND_PROPERTIES.contains(&d.property.as_str()))
        .map(|d| d.value)
        .collect();

    let addition = match color {
        None if backgrounds.iter().any(|v| is_visual_background(v)) => {
            format!("color: {FALLBACK_TEXT_COLOR};")
        }
        Some(color) if backgrounds.is_empty() => {
            let luminance = parse_color(color)?.luminance();
            if luminance >= DARK_TEXT_LUMINANCE {
                return None;
            }
            format!("background-color: {FALLBACK_BACKGROUND_COLOR};")
        }
        _ => return None,
    };

    let base = style.trim().trim_end_matches(';').trim_end();
    Some(format!("{base}; {addition}"))
}

/// Rewrite every inline `style` attribute in an HTML fragment with
/// [`correct_style`]. Elements without a style are untouched.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = html.len()))]
pub fn correct_legibility(html: &str) -> String {
    let mut document = Html::parse_fragment(html);

    let styled: Vec<_> =
        document.select(&STYLED_ELEMENTS).map(|el| el.id()).collect();
    let mut corrected = 0usize;
    for id in styled {
        let Some(mut node) = document.tree.get_mut(id) else {
            continue;
        };
        let Node::Element(element) = node.value() else {
            continue;
        };
        for (name, value) in element.attrs.iter_mut() {
            if &*name.local != "style" {
                continue;
            }
            if let Some(style) = correct_style(value) {
                *value = style.into();
                corrected += 1;
            }
        }
    }

    tracing::debug!(corrected, "legibility correction applied");
    document.root_element().inner_html()
}
