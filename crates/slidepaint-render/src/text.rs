//! Text shaping with parley.

use crate::handle::{GlyphRun, PlacedGlyph};
use kurbo::Affine;
use parley::{
    Alignment, AlignmentOptions, FontContext, FontStack, LayoutContext, LineHeight,
    PositionedLayoutItem, StyleProperty,
};
use peniko::{Brush, Color};
use slidepaint_core::{FontStyle, TextAlign, TextObject};
use std::borrow::Cow;

/// Shaped text ready to become a handle.
#[derive(Debug, Clone)]
pub struct ShapedText {
    pub runs: Vec<GlyphRun>,
    /// Width of the laid-out text (or of the box it was aligned in).
    pub width: f64,
    pub height: f64,
}

/// Lays out text objects with system fonts.
///
/// Font and layout contexts are cached across calls, so one shaper should
/// live as long as the pipeline that owns it.
pub struct TextShaper {
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
    fallback_family: String,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new(TextObject::DEFAULT_FONT_FAMILY)
    }
}

impl TextShaper {
    /// Create a shaper that falls back to `fallback_family` (then any
    /// sans-serif) when a requested family is missing.
    pub fn new(fallback_family: impl Into<String>) -> Self {
        Self {
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            fallback_family: fallback_family.into(),
        }
    }

    pub fn fallback_family(&self) -> &str {
        &self.fallback_family
    }

    /// Shape a text object in its local box.
    ///
    /// Block text wraps at the object's width and is aligned inside it.
    /// Point text is a single run per explicit line.
    pub fn shape(&mut self, text: &TextObject) -> ShapedText {
        let color = text.fill.unwrap_or(Color::TRANSPARENT);
        let brush = Brush::Solid(color);
        let font_size = text.font_size as f32;
        let stack = format!("{}, {}, sans-serif", text.font_family, self.fallback_family);

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, &text.text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(stack))));
        builder.push_default(StyleProperty::FontWeight(parley::FontWeight::new(
            text.font_weight.0,
        )));
        if text.font_style == FontStyle::Italic {
            builder.push_default(StyleProperty::FontStyle(parley::FontStyle::Italic));
        }
        builder.push_default(StyleProperty::LineHeight(LineHeight::FontSizeRelative(
            text.line_height as f32,
        )));
        let spacing = text.letter_spacing() as f32;
        if spacing != 0.0 {
            builder.push_default(StyleProperty::LetterSpacing(spacing));
        }
        let mut layout = builder.build(&text.text);

        let max_width = text.width.filter(|_| text.is_block()).map(|w| w as f32);
        layout.break_all_lines(max_width);
        let alignment = match text.text_align {
            TextAlign::Left => Alignment::Left,
            TextAlign::Center => Alignment::Center,
            TextAlign::Right => Alignment::Right,
            TextAlign::Justify => Alignment::Justify,
        };
        layout.align(max_width, alignment, AlignmentOptions::default());

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let glyph_transform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));
                let glyphs: Vec<PlacedGlyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let placed = PlacedGlyph {
                            id: glyph.id,
                            x: x + glyph.x,
                            y: y - glyph.y,
                        };
                        x += glyph.advance;
                        placed
                    })
                    .collect();
                if glyphs.is_empty() {
                    continue;
                }
                runs.push(GlyphRun {
                    font: run.font().clone(),
                    font_size: run.font_size(),
                    color,
                    glyph_transform,
                    glyphs,
                });
            }
        }

        let width = max_width.unwrap_or_else(|| layout.width()) as f64;
        let height = layout.height() as f64;
        if runs.is_empty() && !text.text.trim().is_empty() {
            log::warn!(
                "No glyphs shaped for text in family '{}'; is a system font available?",
                text.font_family
            );
        }
        ShapedText {
            runs,
            width,
            height,
        }
    }
}
