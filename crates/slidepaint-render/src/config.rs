//! Renderer configuration.

use serde::{Deserialize, Serialize};
use slidepaint_core::viewport::{NARROW_BREAKPOINT, NARROW_PADDING, WIDE_PADDING};
use slidepaint_core::TextObject;

/// Tunables shared by the viewer, thumbnails and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Pixel width of slide thumbnails.
    pub thumbnail_width: u32,
    /// Export resolution relative to the 1920x1080 virtual canvas.
    pub export_multiplier: f64,
    /// Container padding below the breakpoint.
    pub narrow_padding: f64,
    /// Container padding at or above the breakpoint.
    pub wide_padding: f64,
    pub narrow_breakpoint: f64,
    /// Family used when a text object's family is not installed.
    pub fallback_font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: 320,
            export_multiplier: 2.0,
            narrow_padding: NARROW_PADDING,
            wide_padding: WIDE_PADDING,
            narrow_breakpoint: NARROW_BREAKPOINT,
            fallback_font_family: TextObject::DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse a config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_thumbnail_width(mut self, width: u32) -> Self {
        self.thumbnail_width = width;
        self
    }

    pub fn with_export_multiplier(mut self, multiplier: f64) -> Self {
        self.export_multiplier = multiplier;
        self
    }

    pub fn with_padding(mut self, narrow: f64, wide: f64) -> Self {
        self.narrow_padding = narrow;
        self.wide_padding = wide;
        self
    }

    pub fn with_fallback_font_family(mut self, family: impl Into<String>) -> Self {
        self.fallback_font_family = family.into();
        self
    }

    /// Padding around the slide for a container of `viewport_width`.
    pub fn padding_for(&self, viewport_width: f64) -> f64 {
        if viewport_width < self.narrow_breakpoint {
            self.narrow_padding
        } else {
            self.wide_padding
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidepaint_core::container_padding;

    #[test]
    fn test_defaults_match_core_padding() {
        let config = RenderConfig::default();
        for width in [320.0, 767.9, 768.0, 1440.0] {
            assert_eq!(config.padding_for(width), container_padding(width));
        }
    }

    #[test]
    fn test_partial_json() {
        let config = RenderConfig::from_json(r#"{"thumbnailWidth": 200, "unknown": 1}"#).unwrap();
        assert_eq!(config.thumbnail_width, 200);
        assert_eq!(config.export_multiplier, 2.0);
        assert_eq!(config.fallback_font_family, "Arial");
    }

    #[test]
    fn test_builders() {
        let config = RenderConfig::default()
            .with_padding(8.0, 24.0)
            .with_export_multiplier(1.0);
        assert_eq!(config.padding_for(100.0), 8.0);
        assert_eq!(config.padding_for(1000.0), 24.0);
        assert_eq!(config.export_multiplier, 1.0);
    }
}
