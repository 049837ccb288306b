//! Marker color normalization.
//!
//! Hex colors are canonicalized to lowercase `#rrggbb` so that two specs
//! naming the same color compare equal. Other CSS color syntaxes (names,
//! `rgb(...)`) are passed through trimmed; the engine resolves them.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use crate::consts::DEFAULT_MARKER_COLOR;

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
///
/// Every character after `#` must be a hex digit; signs and whitespace inside
/// the value are rejected.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    let digits: Vec<u8> = hex.bytes().map(nibble).collect::<Option<_>>()?;
    match digits.as_slice() {
        &[r, g, b] => Some((r * 17, g * 17, b * 17)),
        &[r1, r0, g1, g0, b1, b0] => Some(((r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0)),
        _ => None,
    }
}

fn nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Resolve the color a marker is created with.
///
/// `None` and blank values fall back to [`DEFAULT_MARKER_COLOR`].
#[must_use]
pub fn resolve_marker_color(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return DEFAULT_MARKER_COLOR.to_owned();
    };
    match parse_hex_rgb(raw) {
        Some((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => raw.to_owned(),
    }
}
