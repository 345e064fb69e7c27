//! # Background/Color Classifier
//!
//! The `background` field of a card spec is either a hex color string or an
//! image URI, disambiguated by the pattern `^#([0-9a-f]{3}){1,2}$`
//! (case-insensitive). Strings that are neither are handed to the image
//! resolver unvalidated; an unresolvable URI degrades to a blank fill, not
//! an error.

use image::Rgba;

/// True when `s` is a 3- or 6-digit `#`-prefixed hex color.
pub fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parse a hex color into an opaque RGBA pixel.
///
/// 3-digit shorthand expands per-channel (`#abc` → `#aabbcc`). Returns
/// `None` for anything [`is_hex_color`] rejects.
pub fn parse_hex(s: &str) -> Option<Rgba<u8>> {
    if !is_hex_color(s) {
        return None;
    }
    let digits = &s[1..];
    let channel = |hi: u8, lo: u8| -> u8 {
        let hex = |b: u8| match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => 0,
        };
        hex(hi) * 16 + hex(lo)
    };
    let b = digits.as_bytes();
    let (r, g, bl) = if digits.len() == 3 {
        (channel(b[0], b[0]), channel(b[1], b[1]), channel(b[2], b[2]))
    } else {
        (channel(b[0], b[1]), channel(b[2], b[3]), channel(b[4], b[5]))
    };
    Some(Rgba([r, g, bl, 255]))
}

/// Parse a hex color, falling back to the given default when the string is
/// not a hex color. Malformed style fields never error (the host is trusted
/// to supply well-formed specs).
pub fn parse_hex_or(s: &str, default: Rgba<u8>) -> Rgba<u8> {
    parse_hex(s).unwrap_or(default)
}

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
