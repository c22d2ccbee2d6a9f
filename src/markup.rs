//! Inline color markup for titles and body lines.
//!
//! A text field may start with a color segment such as `[#3fa9f5]Welcome`.
//! The `#` is optional and the color is always normalized to lowercase
//! `#rrggbb`.

/// A decoded text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub color: String,
}

/// Validate a hex color and normalize it to `#rrggbb`.
///
/// Accepts an optional leading `#` and surrounding whitespace.
pub fn sanitize_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", hex.to_ascii_lowercase()))
}

/// Split a leading color segment off `raw`.
///
/// Returns the color and the byte offset where the text starts.
fn split_color_segment(raw: &str) -> Option<(String, usize)> {
    if !raw.starts_with('[') {
        return None;
    }
    // Closing bracket may sit at most 8 characters after the opening one.
    let close = raw
        .char_indices()
        .take(9)
        .find(|(_, c)| *c == ']')
        .map(|(i, _)| i)?;
    if close <= 1 {
        return None;
    }
    let color = sanitize_color(&raw[1..close])?;
    Some((color, close + 1))
}

/// Whether `text` already begins with a valid color segment.
pub fn has_color_segment(text: &str) -> bool {
    split_color_segment(text).is_some()
}

/// Decode a possibly color-prefixed field.
///
/// Falls back to `fallback_color` and the unchanged input when there is no
/// valid segment.
pub fn decode(raw: &str, fallback_color: &str) -> Decoded {
    match split_color_segment(raw) {
        Some((color, start)) => Decoded {
            text: raw[start..].to_string(),
            color,
        },
        None => Decoded {
            text: raw.to_string(),
            color: fallback_color.to_string(),
        },
    }
}

/// Prefix `text` with a color segment.
///
/// Text that already carries a valid segment is returned unchanged, and an
/// empty color or empty text produces the bare text.
pub fn encode(color: &str, text: &str) -> String {
    if has_color_segment(text) {
        return text.to_string();
    }
    if !color.is_empty() && !text.is_empty() {
        return format!("[{}]{}", color, text);
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_color() {
        assert_eq!(sanitize_color("#AABBCC"), Some("#aabbcc".to_string()));
        assert_eq!(sanitize_color("aabbcc"), Some("#aabbcc".to_string()));
        assert_eq!(sanitize_color(" #123abc "), Some("#123abc".to_string()));
        assert_eq!(sanitize_color("#abc"), None);
        assert_eq!(sanitize_color("#gggggg"), None);
        assert_eq!(sanitize_color(""), None);
    }

    #[test]
    fn test_decode_with_color() {
        let decoded = decode("[#FF0000]Alert", "#ffffff");
        assert_eq!(decoded.text, "Alert");
        assert_eq!(decoded.color, "#ff0000");
    }

    #[test]
    fn test_decode_without_hash() {
        let decoded = decode("[00ff00]Go", "#ffffff");
        assert_eq!(decoded.text, "Go");
        assert_eq!(decoded.color, "#00ff00");
    }

    #[test]
    fn test_decode_invalid_segment_passes_through() {
        let decoded = decode("[note] read this", "#ffffff");
        assert_eq!(decoded.text, "[note] read this");
        assert_eq!(decoded.color, "#ffffff");

        // Bracket too far away
        let decoded = decode("[#ff00000]x", "#ffffff");
        assert_eq!(decoded.text, "[#ff00000]x");

        let decoded = decode("plain", "#010203");
        assert_eq!(decoded.text, "plain");
        assert_eq!(decoded.color, "#010203");
    }

    #[test]
    fn test_decode_segment_only() {
        let decoded = decode("[#abcdef]", "#ffffff");
        assert_eq!(decoded.text, "");
        assert_eq!(decoded.color, "#abcdef");
    }

    #[test]
    fn test_encode_wraps_plain_text() {
        assert_eq!(encode("#112233", "Hello"), "[#112233]Hello");
        assert_eq!(encode("", "Hello"), "Hello");
        assert_eq!(encode("#112233", ""), "");
    }

    #[test]
    fn test_encode_does_not_double_wrap() {
        assert_eq!(encode("#112233", "[#445566]Hi"), "[#445566]Hi");
        // An invalid segment is just text and gets wrapped
        assert_eq!(encode("#112233", "[nope]Hi"), "[#112233][nope]Hi");
    }

    #[test]
    fn test_round_trip_property() {
        let colors = ["#000000", "#ffffff", "#1a2b3c", "#abcdef"];
        let texts = ["Welcome", "a", "Visit https://example.com", "ünïcödé text", " spaced "];
        for color in colors {
            for text in texts {
                let decoded = decode(&encode(color, text), "#999999");
                assert_eq!(decoded.text, text);
                assert_eq!(decoded.color, color);
            }
        }
    }
}
