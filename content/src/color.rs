//! CSS color parsing and relative-luminance math.
//!
//! Only the color syntaxes that show up in legacy article markup are
//! recognized. Anything else parses to `None`, which callers treat as
//! "cannot judge legibility".

/// A color normalized to 8-bit sRGB channels plus alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// In `(0, 1]`; fully transparent colors never parse.
    pub a: f64,
}

impl ParsedColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn luminance(&self) -> f64 {
        relative_luminance(self)
    }
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("maroon", (128, 0, 0)),
    ("navy", (0, 0, 128)),
    ("teal", (0, 128, 128)),
    ("olive", (128, 128, 0)),
    ("lime", (0, 255, 0)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("darkred", (139, 0, 0)),
    ("darkblue", (0, 0, 139)),
    ("darkgreen", (0, 100, 0)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("dimgray", (105, 105, 105)),
    ("dimgrey", (105, 105, 105)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("whitesmoke", (245, 245, 245)),
    ("brown", (165, 42, 42)),
    ("pink", (255, 192, 203)),
    ("gold", (255, 215, 0)),
    ("crimson", (220, 20, 60)),
    ("beige", (245, 245, 220)),
    ("ivory", (255, 255, 240)),
];

/// Parse a CSS color expression.
///
/// Supports the named colors above, `#rgb`, `#rgba`, `#rrggbb`,
/// `#rrggbbaa`, `rgb()`/`rgba()` and `hsl()`/`hsla()` in both the legacy
/// comma syntax and the modern space/slash syntax. A trailing `!important`
/// is ignored. Returns `None` for anything else and for colors whose alpha
/// is zero or below.
pub fn parse_color(value: &str) -> Option<ParsedColor> {
    let value = value.trim().to_ascii_lowercase();
    let value = value
        .strip_suffix("!important")
        .unwrap_or(value.as_str())
        .trim_end();
    if value.is_empty() {
        return None;
    }

    let color = if let Some(hex) = value.strip_prefix('#') {
        parse_hex(hex)?
    } else if let Some((name, args)) = split_function(value) {
        match name {
            "rgb" | "rgba" => parse_rgb_args(args)?,
            "hsl" | "hsla" => parse_hsl_args(args)?,
            _ => return None,
        }
    } else {
        let (_, (r, g, b)) =
            NAMED_COLORS.iter().find(|(name, _)| *name == value)?;
        ParsedColor::rgb(*r, *g, *b)
    };

    (color.a > 0.0).then_some(color)
}

/// WCAG relative luminance of an sRGB color, in `[0, 1]`.
pub fn relative_luminance(color: &ParsedColor) -> f64 {
    0.2126 * linearize(color.r)
        + 0.7152 * linearize(color.g)
        + 0.0722 * linearize(color.b)
}

/// WCAG contrast ratio between two luminances. Symmetric and always >= 1.
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn parse_hex(hex: &str) -> Option<ParsedColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let (r, g, b, a) = match hex.len() {
        3 => (digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255),
        4 => (
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
            digit(3)? * 17,
        ),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(ParsedColor {
        r,
        g,
        b,
        a: f64::from(a) / 255.0,
    })
}

/// Split `name(args)` into its name and argument list.
fn split_function(value: &str) -> Option<(&str, &str)> {
    let open = value.find('(')?;
    let args = value[open + 1..].strip_suffix(')')?;
    Some((value[..open].trim(), args))
}

/// Split color-function arguments into three channels and an optional
/// alpha, accepting `a, b, c[, d]` or `a b c[ / d]`.
fn split_args(args: &str) -> Option<([&str; 3], Option<&str>)> {
    if args.contains(',') {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        return match parts.as_slice() {
            [a, b, c] => Some(([*a, *b, *c], None)),
            [a, b, c, alpha] => Some(([*a, *b, *c], Some(*alpha))),
            _ => None,
        };
    }

    let (channels, alpha) = match args.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha.trim())),
        None => (args, None),
    };
    let channels: Vec<&str> = channels.split_whitespace().collect();
    match channels.as_slice() {
        [a, b, c] => Some(([*a, *b, *c], alpha)),
        _ => None,
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A percentage (`50%`) as a fraction, or a bare number as-is.
fn parse_percent_or_number(token: &str) -> Option<(f64, bool)> {
    match token.strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|n| (n / 100.0, true)),
        None => parse_number(token).map(|n| (n, false)),
    }
}

fn parse_alpha(token: Option<&str>) -> Option<f64> {
    match token {
        None => Some(1.0),
        Some(token) => {
            let (value, _) = parse_percent_or_number(token)?;
            Some(value.clamp(0.0, 1.0))
        }
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

fn parse_rgb_args(args: &str) -> Option<ParsedColor> {
    let ([r, g, b], alpha) = split_args(args)?;
    let channel = |token: &str| -> Option<u8> {
        let (value, is_percent) = parse_percent_or_number(token)?;
        Some(if is_percent {
            to_channel(value)
        } else {
            value.round().clamp(0.0, 255.0) as u8
        })
    };
    Some(ParsedColor {
        r: channel(r)?,
        g: channel(g)?,
        b: channel(b)?,
        a: parse_alpha(alpha)?,
    })
}

fn parse_hue(token: &str) -> Option<f64> {
    let units: [(&str, f64); 4] = [
        ("grad", 0.9),
        ("turn", 360.0),
        ("rad", 180.0 / std::f64::consts::PI),
        ("deg", 1.0),
    ];
    for (suffix, scale) in units {
        if let Some(number) = token.strip_suffix(suffix) {
            return parse_number(number).map(|n| n * scale);
        }
    }
    parse_number(token)
}

fn parse_hsl_args(args: &str) -> Option<ParsedColor> {
    let ([h, s, l], alpha) = split_args(args)?;
    let hue = parse_hue(h)?;
    let fraction = |token: &str| -> Option<f64> {
        let (value, is_percent) = parse_percent_or_number(token)?;
        let value = if is_percent { value } else { value / 100.0 };
        Some(value.clamp(0.0, 1.0))
    };
    let (r, g, b) = hsl_to_rgb(hue, fraction(s)?, fraction(l)?);
    Some(ParsedColor {
        r: to_channel(r),
        g: to_channel(g),
        b: to_channel(b),
        a: parse_alpha(alpha)?,
    })
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    if saturation == 0.0 {
        return (lightness, lightness, lightness);
    }
    let h = hue.rem_euclid(360.0) / 360.0;
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    (
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
