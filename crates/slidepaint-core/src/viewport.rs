//! Mapping the fixed virtual canvas onto output surfaces.

use kurbo::{Affine, Size};

/// Width of the virtual canvas every slide is authored on.
pub const VIRTUAL_WIDTH: f64 = 1920.0;
/// Height of the virtual canvas every slide is authored on.
pub const VIRTUAL_HEIGHT: f64 = 1080.0;

/// Container padding per side on narrow viewports.
pub const NARROW_PADDING: f64 = 16.0;
/// Container padding per side on wide viewports.
pub const WIDE_PADDING: f64 = 32.0;
/// Viewport width below which the narrow padding applies.
pub const NARROW_BREAKPOINT: f64 = 768.0;

/// Padding to leave around the slide inside an interactive container.
pub fn container_padding(viewport_width: f64) -> f64 {
    if viewport_width < NARROW_BREAKPOINT {
        NARROW_PADDING
    } else {
        WIDE_PADDING
    }
}

/// Where the rendered slide is going.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleContext {
    /// Fit inside an on-screen container, never enlarging past native size.
    Container { size: Size, padding: f64 },
    /// A fixed output width (thumbnails). The output is assumed to be 16:9.
    Fixed { width: f64 },
    /// An explicit resolution multiplier (export).
    Multiplier(f64),
}

/// Uniform scale from the virtual canvas to a surface, plus the surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Compute the viewport for an output context.
    pub fn compute(context: ScaleContext) -> Self {
        let scale = match context {
            ScaleContext::Container { size, padding } => {
                let fit_x = (size.width - 2.0 * padding) / VIRTUAL_WIDTH;
                let fit_y = (size.height - 2.0 * padding) / VIRTUAL_HEIGHT;
                fit_x.min(fit_y).min(1.0).max(0.0)
            }
            ScaleContext::Fixed { width } => (width / VIRTUAL_WIDTH).max(0.0),
            ScaleContext::Multiplier(multiplier) => multiplier.max(0.0),
        };
        Self::from_scale(scale)
    }

    /// Fit inside a container with the padding for its width.
    pub fn fit_container(size: Size) -> Self {
        Self::compute(ScaleContext::Container {
            size,
            padding: container_padding(size.width),
        })
    }

    /// Viewport for an explicit uniform scale.
    pub fn from_scale(scale: f64) -> Self {
        Self {
            scale,
            width: (VIRTUAL_WIDTH * scale).round() as u32,
            height: (VIRTUAL_HEIGHT * scale).round() as u32,
        }
    }

    /// Transform from virtual canvas coordinates to surface pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale)
    }

    /// Surface size in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    /// Whether the surface has no pixels to draw into.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
