//! Shared test fixtures.

use crate::fetch::{DefaultFetcher, ImageError, ImageFetcher};
use base64::{Engine, engine::general_purpose::STANDARD};
use slidepaint_core::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A solid-color PNG.
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let pixels: Vec<u8> = (0..width * height).flat_map(|_| rgba).collect();
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&pixels).unwrap();
    }
    data
}

pub fn png_data_uri(width: u32, height: u32, rgba: [u8; 4]) -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png_bytes(width, height, rgba))
    )
}

pub fn decode_data_uri(uri: &str) -> Vec<u8> {
    let (_, payload) = uri.split_once(',').unwrap();
    STANDARD.decode(payload).unwrap()
}

/// Resolves after being polled `remaining + 1` times.
pub struct YieldNow {
    remaining: usize,
}

impl YieldNow {
    pub fn times(remaining: usize) -> Self {
        Self { remaining }
    }
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.remaining == 0 {
            return Poll::Ready(());
        }
        self.remaining -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Maps made-up `src` names to real sources, each held back for a number of
/// polls so tests can control which image resolves first.
#[derive(Default)]
pub struct StaticFetcher {
    sources: HashMap<String, (String, usize)>,
    inner: DefaultFetcher,
    completed: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, src: String, delay: usize) -> Self {
        self.sources.insert(name.to_string(), (src, delay));
        self
    }

    /// Names in the order their fetches finished.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

impl ImageFetcher for StaticFetcher {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ImageError>> {
        Box::pin(async move {
            let Some((target, delay)) = self.sources.get(src) else {
                return Err(ImageError::UnsupportedSource(src.to_string()));
            };
            YieldNow::times(*delay).await;
            let bytes = self.inner.fetch(target).await;
            self.completed.lock().unwrap().push(src.to_string());
            bytes
        })
    }
}

/// Fails every fetch.
pub struct FailingFetcher;

impl ImageFetcher for FailingFetcher {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ImageError>> {
        Box::pin(futures_util::future::ready(Err(ImageError::Io {
            path: src.to_string(),
            message: "unreachable".to_string(),
        })))
    }
}
