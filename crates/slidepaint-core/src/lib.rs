//! slidepaint Core Library
//!
//! Platform-agnostic data model for portable slide scenes: the JSON wire
//! format, typed slide documents, slide ordering, the slide store adapter,
//! viewport scaling and z-order compositing.

pub mod color;
pub mod compositor;
pub mod deck;
pub mod document;
pub mod object;
pub mod store;
pub mod viewport;
mod wire;

pub use color::{parse_color, resolve_paint};
pub use compositor::{Layered, composite};
pub use deck::{OrderedSlide, order_slides, slide_number};
pub use document::{DocumentError, SlideDocument};
pub use object::{
    CircleObject, FontStyle, FontWeight, GroupObject, ImageObject, LineObject, ObjectKind, Origin,
    Outline, Placement, RectObject, SceneObject, TextAlign, TextObject, TriangleObject,
};
pub use store::{BoxFuture, MemorySlideStore, SlideStore, StoreError, StoreResult, load_deck};
pub use viewport::{ScaleContext, VIRTUAL_HEIGHT, VIRTUAL_WIDTH, Viewport, container_padding};

#[cfg(not(target_arch = "wasm32"))]
pub use store::DirSlideStore;
