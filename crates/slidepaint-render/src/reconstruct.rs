//! Scene object reconstruction: descriptors in, paint-ready handles out.

use crate::fetch::{ImageFetcher, decode_image};
use crate::handle::{Content, Handle, ShapePaint};
use crate::text::TextShaper;
use futures_util::future::{join_all, ready};
use kurbo::{Affine, BezPath, Circle, Join, Line, Rect, RoundedRect, Shape, Stroke, Vec2};
use slidepaint_core::{
    BoxFuture, ImageObject, Layered, ObjectKind, Outline, SceneObject, composite,
};
use std::sync::Arc;

/// Flattening tolerance for curve → path conversion, in local units.
const TOLERANCE: f64 = 0.1;

/// Turns scene objects into handles.
///
/// Everything that can be done synchronously (parsing paint, building paths,
/// shaping text) happens inside [`reconstruct`](Self::reconstruct) itself.
/// The returned future only waits on image acquisition.
pub struct Reconstructor<'s> {
    shaper: &'s mut TextShaper,
    fetcher: Arc<dyn ImageFetcher>,
}

impl<'s> Reconstructor<'s> {
    pub fn new(shaper: &'s mut TextShaper, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { shaper, fetcher }
    }

    /// Reconstruct one object. Resolves to `None` when the object cannot be
    /// drawn (a failed image); the failure has already been logged.
    pub fn reconstruct(&mut self, object: &SceneObject) -> BoxFuture<'static, Option<Handle>> {
        match &object.kind {
            ObjectKind::Image(image) => self.image(object, image),
            ObjectKind::Group(group) => {
                let children: Vec<_> = group
                    .objects
                    .iter()
                    .map(|child| (child.z_index, child.index, self.reconstruct(child)))
                    .collect();
                let width = group.width.unwrap_or(0.0);
                let height = group.height.unwrap_or(0.0);
                let transform = object.placement.transform(width, height)
                    * Affine::translate((width / 2.0, height / 2.0));
                let (index, z_index, opacity) = (object.index, object.z_index, object.opacity);
                Box::pin(async move {
                    let (keys, pending): (Vec<_>, Vec<_>) = children
                        .into_iter()
                        .map(|(z, order, future)| ((z, order), future))
                        .unzip();
                    let resolved = join_all(pending).await;
                    let layered = keys
                        .into_iter()
                        .zip(resolved)
                        .filter_map(|((z, order), handle)| Some(Layered::new(z, order, handle?)))
                        .collect();
                    Some(Handle {
                        transform,
                        opacity: opacity as f32,
                        clip: None,
                        content: Content::Group(composite(layered)),
                        index,
                        z_index,
                    })
                })
            }
            _ => Box::pin(ready(self.reconstruct_static(object))),
        }
    }

    /// Reconstruct a kind that needs no acquisition.
    fn reconstruct_static(&mut self, object: &SceneObject) -> Option<Handle> {
        let placement = &object.placement;
        let (transform, content) = match &object.kind {
            ObjectKind::Rect(rect) => (
                placement.transform(rect.width, rect.height),
                shape(
                    rounded_rect_path(rect.width, rect.height, rect.rx, rect.ry),
                    rect.fill,
                    &rect.outline,
                ),
            ),
            ObjectKind::Circle(circle) => {
                let r = circle.radius;
                (
                    placement.transform(2.0 * r, 2.0 * r),
                    shape(
                        Circle::new((r, r), r).to_path(TOLERANCE),
                        circle.fill,
                        &circle.outline,
                    ),
                )
            }
            ObjectKind::Triangle(triangle) => {
                let (w, h) = (triangle.width, triangle.height);
                let mut path = BezPath::new();
                path.move_to((w / 2.0, 0.0));
                path.line_to((w, h));
                path.line_to((0.0, h));
                path.close_path();
                (
                    placement.transform(w, h),
                    shape(path, triangle.fill, &triangle.outline),
                )
            }
            ObjectKind::Line(line) => (
                Affine::IDENTITY,
                shape(
                    Line::new((line.x1, line.y1), (line.x2, line.y2)).to_path(TOLERANCE),
                    None,
                    &line.outline,
                ),
            ),
            ObjectKind::Text(text) => {
                let shaped = self.shaper.shape(text);
                (
                    placement.transform(shaped.width, shaped.height),
                    Content::Text(shaped.runs),
                )
            }
            ObjectKind::Image(_) | ObjectKind::Group(_) => return None,
        };
        Some(Handle {
            transform,
            opacity: object.opacity as f32,
            clip: None,
            content,
            index: object.index,
            z_index: object.z_index,
        })
    }

    fn image(&self, object: &SceneObject, image: &ImageObject) -> BoxFuture<'static, Option<Handle>> {
        let fetcher = self.fetcher.clone();
        let image = image.clone();
        let placement = object.placement;
        let (index, z_index, opacity) = (object.index, object.z_index, object.opacity);
        Box::pin(async move {
            let decoded = match fetcher.fetch(&image.src).await.and_then(|bytes| decode_image(&bytes)) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::warn!("Dropping image {index} ({}): {e}", abbreviate(&image.src));
                    return None;
                }
            };
            let width = image
                .width
                .unwrap_or((decoded.width as f64 - image.crop_x).max(0.0));
            let height = image
                .height
                .unwrap_or((decoded.height as f64 - image.crop_y).max(0.0));
            Some(Handle {
                transform: placement.transform(width, height),
                opacity: opacity as f32,
                clip: Some(image_clip(&image, placement.scale_x, width, height)),
                content: Content::Image {
                    image: decoded,
                    offset: Vec2::new(-image.crop_x, -image.crop_y),
                },
                index,
                z_index,
            })
        })
    }
}

/// Clip an image to its box, rounding the corners when a radius applies.
fn image_clip(image: &ImageObject, scale_x: f64, width: f64, height: f64) -> BezPath {
    let rect = Rect::new(0.0, 0.0, width, height);
    match image.clip_radius(scale_x) {
        Some(radius) => RoundedRect::from_rect(rect, radius).to_path(TOLERANCE),
        None => rect.to_path(TOLERANCE),
    }
}

/// Rectangle path with elliptical corners `rx` x `ry`, each clamped to half
/// the side it sits on.
fn rounded_rect_path(width: f64, height: f64, rx: f64, ry: f64) -> BezPath {
    let rx = rx.clamp(0.0, width.abs() / 2.0);
    let ry = ry.clamp(0.0, height.abs() / 2.0);
    let rect = Rect::new(0.0, 0.0, width, height);
    if rx <= 0.0 || ry <= 0.0 {
        return rect.to_path(TOLERANCE);
    }
    // Build circular corners in a space stretched to make them elliptical.
    let stretch = ry / rx;
    let squeezed = Rect::new(0.0, 0.0, width, height / stretch);
    Affine::scale_non_uniform(1.0, stretch) * RoundedRect::from_rect(squeezed, rx).to_path(TOLERANCE)
}

fn shape(path: BezPath, fill: Option<peniko::Color>, outline: &Outline) -> Content {
    let stroke = outline.visible().map(|color| {
        let stroke = Stroke::new(outline.width)
            .with_join(Join::Miter)
            .with_miter_limit(4.0);
        (stroke, color)
    });
    Content::Shape(ShapePaint { path, fill, stroke })
}

/// Keep data URIs out of log lines.
fn abbreviate(src: &str) -> &str {
    match src.char_indices().nth(48) {
        Some((cut, _)) => &src[..cut],
        None => src,
    }
}
