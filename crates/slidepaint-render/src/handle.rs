//! Reconstructed, paint-ready scene objects.

use kurbo::{Affine, BezPath, Stroke, Vec2};
use peniko::{Color, FontData, ImageData};

/// A scene object turned into something a surface can paint.
///
/// Handles are display-only: they carry geometry and paint, nothing that can
/// be selected or receive events. A handle and any image it holds live until
/// the surface it was added to is cleared.
#[derive(Debug, Clone)]
pub struct Handle {
    /// Local → parent transform (parent is the virtual canvas or a group).
    pub transform: Affine,
    /// Opacity of the whole handle, taken from the descriptor.
    pub opacity: f32,
    /// Clip region in local coordinates.
    pub clip: Option<BezPath>,
    pub content: Content,
    /// Position of the originating descriptor.
    pub index: usize,
    /// Stacking key of the originating descriptor.
    pub z_index: f64,
}

/// What a handle draws.
#[derive(Debug, Clone)]
pub enum Content {
    Shape(ShapePaint),
    Text(Vec<GlyphRun>),
    /// Image pixels drawn with their top-left at `offset` in local space.
    Image { image: ImageData, offset: Vec2 },
    /// Children already in commit order.
    Group(Vec<Handle>),
}

impl Content {
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Shape(_) => "shape",
            Content::Text(_) => "text",
            Content::Image { .. } => "image",
            Content::Group(_) => "group",
        }
    }
}

/// A filled and/or stroked path.
#[derive(Debug, Clone)]
pub struct ShapePaint {
    pub path: BezPath,
    pub fill: Option<Color>,
    pub stroke: Option<(Stroke, Color)>,
}

/// Shaped glyphs sharing one font and size.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    pub font: FontData,
    pub font_size: f32,
    pub color: Color,
    /// Synthetic skew for fonts without a real italic.
    pub glyph_transform: Option<Affine>,
    pub glyphs: Vec<PlacedGlyph>,
}

/// One glyph positioned in the text box (y grows downwards, baseline-relative).
#[derive(Debug, Clone, Copy)]
pub struct PlacedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}
