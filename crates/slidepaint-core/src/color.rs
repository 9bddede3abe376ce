//! CSS color strings as they appear in slide documents.

use peniko::Color;
use peniko::color::{Srgb, parse_color as parse_css_color};

/// Parse a CSS color string (`#rgb`, `#rrggbbaa`, `rgb()`, `hsl()`, named colors).
pub fn parse_color(value: &str) -> Option<Color> {
    parse_css_color(value.trim())
        .ok()
        .map(|color| color.to_alpha_color::<Srgb>())
}

/// Resolve a `fill`/`stroke` field to the paint it describes.
///
/// An absent field takes `default`. An empty string, `none`, or a fully
/// transparent color means "paint nothing". A string that is not a color
/// falls back to `default`.
pub fn resolve_paint(raw: Option<&str>, default: Option<Color>) -> Option<Color> {
    let Some(raw) = raw.map(str::trim) else {
        return default;
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return None;
    }
    match parse_color(raw) {
        Some(color) if color.components[3] <= 0.0 => None,
        Some(color) => Some(color),
        None => {
            log::debug!("Unrecognised color {raw:?}, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(color: Color) -> (u8, u8, u8, u8) {
        let c = color.to_rgba8();
        (c.r, c.g, c.b, c.a)
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(rgba(parse_color("#ff0000").unwrap()), (255, 0, 0, 255));
        assert_eq!(rgba(parse_color("#0f0").unwrap()), (0, 255, 0, 255));
        assert_eq!(rgba(parse_color(" #00000080 ").unwrap()).3, 128);
    }

    #[test]
    fn test_functional_and_named_colors() {
        assert_eq!(rgba(parse_color("rgb(0, 0, 255)").unwrap()), (0, 0, 255, 255));
        assert_eq!(rgba(parse_color("white").unwrap()), (255, 255, 255, 255));
        assert!(parse_color("not-a-color").is_none());
    }

    #[test]
    fn test_resolve_paint() {
        let black = Some(Color::BLACK);
        assert_eq!(resolve_paint(None, black).map(rgba), Some((0, 0, 0, 255)));
        assert!(resolve_paint(Some(""), black).is_none());
        assert!(resolve_paint(Some("transparent"), black).is_none());
        assert_eq!(resolve_paint(Some("bogus"), black).map(rgba), Some((0, 0, 0, 255)));
        let red = resolve_paint(Some("red"), black).unwrap();
        assert_eq!(rgba(red), (255, 0, 0, 255));
    }
}
