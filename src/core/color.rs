//! Hex color helpers and the deterministic fallback palette.
//!
//! Every function here is pure. Hex parsing accepts exactly six hex digits
//! with an optional leading `#`; anything else is treated as malformed.

use serde::{Deserialize, Serialize};

/// Ink used on dark backgrounds.
pub const WHITE_INK: &str = "#fff";
/// Ink used on light backgrounds.
pub const DARK_INK: &str = "#0a0e14";
/// Luminance above which the dark ink is chosen.
pub const LUMINANCE_THRESHOLD: f64 = 0.4;
/// Factor applied by [`darken20`].
pub const DARKEN_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Relative luminance in [0, 1].
    pub fn luminance(&self) -> f64 {
        let channel = |c: u8| f64::from(c) / 255.0;
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }
}

/// Parses `#RRGGBB` or `RRGGBB`, case-insensitive.
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    Some(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Trims, adds a missing `#` and upper-cases. Digits are not validated.
/// Only the empty string stays empty; whitespace alone becomes `"#"`.
pub fn normalize_hex(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let trimmed = input.trim();
    if trimmed.starts_with('#') {
        trimmed.to_uppercase()
    } else {
        format!("#{trimmed}").to_uppercase()
    }
}

/// Text ink choice for a background color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastPalette {
    pub threshold: f64,
    pub dark_ink: String,
}

impl Default for ContrastPalette {
    fn default() -> Self {
        ContrastPalette {
            threshold: LUMINANCE_THRESHOLD,
            dark_ink: DARK_INK.to_string(),
        }
    }
}

impl ContrastPalette {
    /// Returns the dark ink for light backgrounds, white otherwise or when
    /// `hex` does not parse.
    pub fn text_on(&self, hex: &str) -> &str {
        match parse_hex(hex) {
            Some(rgb) if rgb.luminance() > self.threshold => &self.dark_ink,
            _ => WHITE_INK,
        }
    }
}

/// [`ContrastPalette::text_on`] with the default palette.
pub fn contrast_text(hex: &str) -> &'static str {
    match parse_hex(hex) {
        Some(rgb) if rgb.luminance() > LUMINANCE_THRESHOLD => DARK_INK,
        _ => WHITE_INK,
    }
}

/// Renders channels as lowercase `#rrggbb`. Fractions are truncated toward
/// zero and each channel is clamped to [0, 255].
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    // `as` saturates and maps NaN to 0
    let byte = |v: f64| (v.trunc() as i64).clamp(0, 255);
    format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
}

/// Scales every channel by `factor` and floors. `None` for malformed input.
pub fn darken(hex: &str, factor: f64) -> Option<String> {
    let rgb = parse_hex(hex)?;
    let scale = |c: u8| (f64::from(c) * factor).floor();
    Some(rgb_to_hex(scale(rgb.r), scale(rgb.g), scale(rgb.b)))
}

pub fn darken20(hex: &str) -> Option<String> {
    darken(hex, DARKEN_FACTOR)
}

/// 32-bit polynomial rolling hash over UTF-16 code units, wrapping on
/// overflow.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Hue in degrees, saturation and lightness in percent, derived from a hash.
///
/// The magnitude is taken in 64 bits for the hue, while the shifts operate
/// on its 32-bit reinterpretation. For `i32::MIN` that makes saturation and
/// lightness fall below their usual ranges, which is the reference behavior.
pub fn hsl_from_hash(hash: i32) -> (f64, f64, f64) {
    let magnitude = i64::from(hash).abs();
    let shifted = magnitude as i32;
    let hue = magnitude % 360;
    let saturation = 58 + (shifted >> 3) % 22;
    let lightness = 46 + (shifted >> 5) % 12;
    (hue as f64, f64::from(saturation), f64::from(lightness))
}

/// Stable color for a name that has no entry in the reference table.
pub fn deterministic_color(name: &str) -> String {
    let (hue, saturation, lightness) = hsl_from_hash(name_hash(name));
    hsl_to_hex(hue, saturation, lightness)
}

/// Sector-based HSL to hex. `s` and `l` are percentages.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let s = s / 100.0;
    let l = l / 100.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = if (0.0..60.0).contains(&h) {
        (c, x, 0.0)
    } else if (60.0..120.0).contains(&h) {
        (x, c, 0.0)
    } else if (120.0..180.0).contains(&h) {
        (0.0, c, x)
    } else if (180.0..240.0).contains(&h) {
        (0.0, x, c)
    } else if (240.0..300.0).contains(&h) {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    // halves round up
    let channel = |v: f64| ((v + m) * 255.0 + 0.5).floor();
    rgb_to_hex(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("  a1b2c3 "), "#A1B2C3");
        assert_eq!(normalize_hex("#ff00aa"), "#FF00AA");
        assert_eq!(normalize_hex("not-a-color"), "#NOT-A-COLOR");
        assert_eq!(normalize_hex(""), "");
        assert_eq!(normalize_hex("   "), "#");
        assert_eq!(normalize_hex(" # "), "#");
    }

    #[test]
    fn test_normalize_hex_is_idempotent() {
        for input in ["", "  ", "abc", "#abc", " 0a0e14", "#ZZZ", "é", "##1"] {
            let once = normalize_hex(input);
            assert_eq!(normalize_hex(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text("#ffffff"), DARK_INK);
        assert_eq!(contrast_text("#000000"), WHITE_INK);
        assert_eq!(contrast_text("777777"), DARK_INK);
        assert_eq!(contrast_text("#1A237E"), WHITE_INK);
    }

    #[test]
    fn test_contrast_text_defaults_to_white_for_malformed_input() {
        assert_eq!(contrast_text("zzzzzz"), WHITE_INK);
        assert_eq!(contrast_text(""), WHITE_INK);
        assert_eq!(contrast_text("#fff"), WHITE_INK);
        assert_eq!(contrast_text("#ffffff00"), WHITE_INK);
    }

    #[test]
    fn test_custom_palette() {
        let palette = ContrastPalette {
            threshold: 0.9,
            dark_ink: "#111111".to_string(),
        };
        assert_eq!(palette.text_on("#777777"), WHITE_INK);
        assert_eq!(palette.text_on("#ffffff"), "#111111");
    }

    #[test]
    fn test_rgb_to_hex_truncates_and_clamps() {
        assert_eq!(rgb_to_hex(-5.0, 300.7, 15.9), "#00ff0f");
        assert_eq!(rgb_to_hex(10.0, 171.0, 255.0), "#0aabff");
        assert_eq!(rgb_to_hex(f64::NAN, 0.0, 0.0), "#000000");
    }

    #[test]
    fn test_darken() {
        assert_eq!(darken20("#FF8040"), Some("#cc6633".to_string()));
        assert_eq!(darken20("abcdef"), Some("#88a4bf".to_string()));
        assert_eq!(darken("#808080", 0.5), Some("#404040".to_string()));
        assert_eq!(darken20("#abc"), None);
        assert_eq!(darken20("+f+f+f"), None);
        assert_eq!(darken20(""), None);
    }

    #[test]
    fn test_darken_never_brightens() {
        for hex in ["#000000", "#ffffff", "#123456", "#fedcba", "#0a0e14", "#b93131"] {
            let original = parse_hex(hex).unwrap();
            let darker = parse_hex(&darken20(hex).unwrap()).unwrap();
            assert!(darker.r <= original.r);
            assert!(darker.g <= original.g);
            assert!(darker.b <= original.b);
        }
    }

    #[test]
    fn test_deterministic_color_reference_values() {
        assert_eq!(deterministic_color(""), "#b93131");
        assert_eq!(deterministic_color("Quantum"), "#d9723a");
        assert_eq!(deterministic_color("Quant"), "#c94426");
        assert_eq!(deterministic_color("RANDOM"), "#b4e732");
        assert_eq!(deterministic_color("HDFC Mutual Fund"), "#da3487");
        assert_eq!(deterministic_color("Axis"), "#3c65e2");
        assert_eq!(deterministic_color("SBI"), "#2dc899");
        assert_eq!(deterministic_color("ÄMC Ünïcode"), "#36b4e2");
    }

    #[test]
    fn test_deterministic_color_is_stable() {
        for name in ["", "Nippon India", "日本", "🦀 crab fund"] {
            assert_eq!(deterministic_color(name), deterministic_color(name));
            assert!(parse_hex(&deterministic_color(name)).is_some());
        }
    }

    #[test]
    fn test_hsl_from_hash_matches_32_bit_shifts() {
        assert_eq!(hsl_from_hash(i32::MIN), (128.0, 44.0, 42.0));
        assert_eq!(hsl_from_hash(123_456_789), (189.0, 58.0, 46.0));
        assert_eq!(hsl_from_hash(-987_654_321), (81.0, 64.0, 51.0));
    }

    #[test]
    fn test_name_hash_wraps() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("ab"), 97 * 31 + 98);
        // long input must wrap instead of overflowing
        let _ = name_hash(&"z".repeat(1_000));
    }
}
