//! Scene object descriptors.
//!
//! The wire format is untyped JSON; this module maps it into a closed set of
//! object kinds with every field default applied, so nothing downstream ever
//! has to look at raw JSON again.

use crate::color::resolve_paint;
use crate::wire::RawObject;
use kurbo::{Affine, Vec2};
use peniko::Color;
use serde_json::Value;

/// Anchor point of an object's box along one axis, as a fraction of its size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Origin(pub f64);

impl Origin {
    pub const START: Origin = Origin(0.0);
    pub const CENTER: Origin = Origin(0.5);
    pub const END: Origin = Origin(1.0);

    /// Read `originX`/`originY`: a keyword or a numeric fraction.
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(keyword)) => match keyword.trim().to_ascii_lowercase().as_str() {
                "center" | "middle" => Origin::CENTER,
                "right" | "bottom" => Origin::END,
                _ => Origin::START,
            },
            Some(Value::Number(n)) => n.as_f64().map(Origin).unwrap_or_default(),
            _ => Origin::START,
        }
    }
}

/// Position, rotation, scale and anchor of an object on the virtual canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    /// Rotation in degrees, clockwise.
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin_x: Origin,
    pub origin_y: Origin,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            origin_x: Origin::START,
            origin_y: Origin::START,
        }
    }
}

impl Placement {
    fn from_raw(raw: &RawObject) -> Self {
        Self {
            left: raw.left.unwrap_or(0.0),
            top: raw.top.unwrap_or(0.0),
            angle: raw.angle.unwrap_or(0.0),
            scale_x: raw.scale_x.unwrap_or(1.0),
            scale_y: raw.scale_y.unwrap_or(1.0),
            origin_x: Origin::from_value(raw.origin_x.as_ref()),
            origin_y: Origin::from_value(raw.origin_y.as_ref()),
        }
    }

    /// Transform from an object's local box (top-left at 0,0, unscaled
    /// `width` x `height`) into its parent's coordinate space.
    ///
    /// The origin point of the box lands on `(left, top)` and stays fixed
    /// under rotation and scaling.
    pub fn transform(&self, width: f64, height: f64) -> Affine {
        Affine::translate(Vec2::new(self.left, self.top))
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(Vec2::new(
                -self.origin_x.0 * width,
                -self.origin_y.0 * height,
            ))
    }
}

/// Stroke color and width. Invisible unless both are set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Outline {
    pub color: Option<Color>,
    pub width: f64,
}

impl Outline {
    fn from_raw(raw: &RawObject, default_color: Option<Color>, default_width: f64) -> Self {
        Self {
            color: resolve_paint(raw.stroke.as_deref(), default_color),
            width: raw.stroke_width.unwrap_or(default_width),
        }
    }

    /// The color to stroke with, if this outline draws anything.
    pub fn visible(&self) -> Option<Color> {
        self.color.filter(|_| self.width > 0.0)
    }
}

/// Numeric font weight (400 = normal, 700 = bold).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontWeight(pub f32);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400.0);
    pub const BOLD: FontWeight = FontWeight(700.0);

    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n
                .as_f64()
                .map(|w| FontWeight(w as f32))
                .unwrap_or(Self::NORMAL),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "bold" | "bolder" => Self::BOLD,
                "lighter" => FontWeight(300.0),
                other => other.parse::<f32>().map(FontWeight).unwrap_or(Self::NORMAL),
            },
            _ => Self::NORMAL,
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Horizontal alignment of text lines within the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    fn from_keyword(keyword: Option<&str>) -> Self {
        match keyword.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("center") => TextAlign::Center,
            Some("right") | Some("end") => TextAlign::Right,
            Some(k) if k.starts_with("justify") => TextAlign::Justify,
            _ => TextAlign::Left,
        }
    }
}

/// Text, either free (unbounded) or block (wrapping at `width`).
#[derive(Debug, Clone)]
pub struct TextObject {
    pub text: String,
    pub font_size: f64,
    pub fill: Option<Color>,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Extra spacing between characters, in thousandths of an em.
    pub char_spacing: f64,
    /// Wrap width. `None` means free text.
    pub width: Option<f64>,
}

impl TextObject {
    pub const DEFAULT_TEXT: &'static str = "Text";
    pub const DEFAULT_FONT_SIZE: f64 = 40.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_LINE_HEIGHT: f64 = 1.16;

    fn from_raw(raw: &RawObject) -> Self {
        let font_style = match raw.font_style.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("italic") || s.eq_ignore_ascii_case("oblique") => {
                FontStyle::Italic
            }
            _ => FontStyle::Normal,
        };
        Self {
            text: raw
                .text
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_TEXT.to_string()),
            font_size: raw.font_size.unwrap_or(Self::DEFAULT_FONT_SIZE),
            fill: resolve_paint(raw.fill.as_deref(), Some(Color::BLACK)),
            font_family: raw
                .font_family
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_FONT_FAMILY.to_string()),
            font_weight: FontWeight::from_value(raw.font_weight.as_ref()),
            font_style,
            text_align: TextAlign::from_keyword(raw.text_align.as_deref()),
            line_height: raw.line_height.unwrap_or(Self::DEFAULT_LINE_HEIGHT),
            char_spacing: raw.char_spacing.unwrap_or(0.0),
            width: raw.width,
        }
    }

    /// Whether this text wraps inside a fixed-width box.
    pub fn is_block(&self) -> bool {
        self.width.is_some()
    }

    /// Letter spacing in pixels.
    pub fn letter_spacing(&self) -> f64 {
        self.char_spacing * self.font_size / 1000.0
    }
}

/// Rectangle with optional elliptical corners.
#[derive(Debug, Clone)]
pub struct RectObject {
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub outline: Outline,
    pub rx: f64,
    pub ry: f64,
}

#[derive(Debug, Clone)]
pub struct CircleObject {
    pub radius: f64,
    pub fill: Option<Color>,
    pub outline: Outline,
}

/// Isosceles triangle with its apex at the top center of its box.
#[derive(Debug, Clone)]
pub struct TriangleObject {
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub outline: Outline,
}

/// Straight segment between absolute canvas coordinates.
#[derive(Debug, Clone)]
pub struct LineObject {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub outline: Outline,
}

/// Raster image loaded from `src`.
#[derive(Debug, Clone)]
pub struct ImageObject {
    pub src: String,
    /// Displayed width; the decoded image width when absent.
    pub width: Option<f64>,
    /// Displayed height; the decoded image height when absent.
    pub height: Option<f64>,
    pub crop_x: f64,
    pub crop_y: f64,
    pub border_radius: Option<f64>,
    /// Whether the descriptor carried a `clipPath`.
    pub clip_path: bool,
}

impl ImageObject {
    /// Corner radius of the rounded clip, if one should be applied.
    ///
    /// Only present when `borderRadius` and `clipPath` were both authored
    /// along with an explicit `width` and `height`. The radius is divided by
    /// `scale_x` so it stays the same on screen once the object's own scale
    /// is applied.
    pub fn clip_radius(&self, scale_x: f64) -> Option<f64> {
        if !self.clip_path || self.width.is_none() || self.height.is_none() {
            return None;
        }
        let radius = self.border_radius.filter(|r| *r > 0.0)?;
        let scale_x = if scale_x.abs() > f64::EPSILON { scale_x.abs() } else { 1.0 };
        Some(radius / scale_x)
    }
}

/// Nested objects drawn as one composite unit.
#[derive(Debug, Clone)]
pub struct GroupObject {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub objects: Vec<SceneObject>,
}

/// The closed set of drawable object kinds.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Text(TextObject),
    Rect(RectObject),
    Circle(CircleObject),
    Triangle(TriangleObject),
    Line(LineObject),
    Image(ImageObject),
    Group(GroupObject),
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Text(_) => "text",
            ObjectKind::Rect(_) => "rect",
            ObjectKind::Circle(_) => "circle",
            ObjectKind::Triangle(_) => "triangle",
            ObjectKind::Line(_) => "line",
            ObjectKind::Image(_) => "image",
            ObjectKind::Group(_) => "group",
        }
    }
}

/// One typed scene object.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Position in the descriptor array this object came from.
    pub index: usize,
    pub placement: Placement,
    pub opacity: f64,
    pub z_index: f64,
    pub kind: ObjectKind,
}

impl SceneObject {
    /// Build an object from one wire descriptor.
    ///
    /// Returns `None` for descriptors that are not objects, carry an
    /// unsupported `type`, or (for images) have no `src`.
    pub fn from_value(index: usize, value: &Value) -> Option<Self> {
        let raw = match RawObject::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("Skipping descriptor {index}: {e}");
                return None;
            }
        };
        let kind_name = raw
            .kind
            .as_deref()
            .map(|k| k.trim().to_ascii_lowercase())
            .unwrap_or_default();

        let kind = match kind_name.as_str() {
            "text" | "i-text" | "itext" | "textbox" => ObjectKind::Text(TextObject::from_raw(&raw)),
            "rect" => ObjectKind::Rect(RectObject {
                width: raw.width.unwrap_or(100.0),
                height: raw.height.unwrap_or(100.0),
                fill: resolve_paint(raw.fill.as_deref(), Some(Color::BLACK)),
                outline: Outline::from_raw(&raw, None, 0.0),
                rx: raw.rx.unwrap_or(0.0),
                ry: raw.ry.unwrap_or(0.0),
            }),
            "circle" => ObjectKind::Circle(CircleObject {
                radius: raw.radius.unwrap_or(50.0),
                fill: resolve_paint(raw.fill.as_deref(), Some(Color::BLACK)),
                outline: Outline::from_raw(&raw, None, 0.0),
            }),
            "triangle" => ObjectKind::Triangle(TriangleObject {
                width: raw.width.unwrap_or(100.0),
                height: raw.height.unwrap_or(100.0),
                fill: resolve_paint(raw.fill.as_deref(), Some(Color::BLACK)),
                outline: Outline::from_raw(&raw, None, 0.0),
            }),
            "line" => ObjectKind::Line(LineObject {
                x1: raw.x1.unwrap_or(0.0),
                y1: raw.y1.unwrap_or(0.0),
                x2: raw.x2.unwrap_or(100.0),
                y2: raw.y2.unwrap_or(100.0),
                outline: Outline::from_raw(&raw, Some(Color::BLACK), 1.0),
            }),
            "image" => {
                let Some(src) = raw.src.clone().filter(|s| !s.trim().is_empty()) else {
                    log::debug!("Skipping image {index}: no src");
                    return None;
                };
                ObjectKind::Image(ImageObject {
                    src,
                    width: raw.width,
                    height: raw.height,
                    crop_x: raw.crop_x.unwrap_or(0.0),
                    crop_y: raw.crop_y.unwrap_or(0.0),
                    border_radius: raw.border_radius,
                    clip_path: raw.clip_path.as_ref().is_some_and(|v| !v.is_null()),
                })
            }
            "group" => ObjectKind::Group(GroupObject {
                width: raw.width,
                height: raw.height,
                objects: parse_objects(raw.objects.as_ref()).unwrap_or_default(),
            }),
            other => {
                log::debug!("Skipping descriptor {index}: unsupported type {other:?}");
                return None;
            }
        };

        Some(Self {
            index,
            placement: Placement::from_raw(&raw),
            opacity: raw.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
            z_index: raw.z_index.unwrap_or(0.0),
            kind,
        })
    }
}

/// Parse an `objects` value. `None` when the value is missing or not an array.
pub(crate) fn parse_objects(value: Option<&Value>) -> Option<Vec<SceneObject>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| SceneObject::from_value(index, item))
            .collect(),
    )
}
