//! Image sources: fetching bytes and decoding them to pixels.

use base64::{Engine, engine::general_purpose::STANDARD};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use slidepaint_core::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Reasons an image never made it onto the slide.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("Malformed data URI: {0}")]
    DataUri(String),
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Image has no pixels")]
    Empty,
}

/// Loads the raw bytes behind an image `src`.
///
/// Note: On native platforms, implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ImageError>>;
}

/// Loads the raw bytes behind an image `src` (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait ImageFetcher {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ImageError>>;
}

/// Fetcher for `data:` URIs, `file://` URLs and plain filesystem paths.
///
/// Relative paths resolve against the base directory when one is set.
/// Network schemes are rejected.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    base_dir: Option<PathBuf>,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, ImageError> {
        let resolved = self.resolve(path);
        std::fs::read(&resolved).map_err(|e| ImageError::Io {
            path: resolved.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl ImageFetcher for DefaultFetcher {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ImageError>> {
        Box::pin(async move {
            let src = src.trim();
            if let Some(rest) = strip_scheme(src, "data:") {
                return decode_data_uri(rest);
            }
            if let Some(rest) = strip_scheme(src, "file://") {
                return self.read_file(&percent_decode(rest));
            }
            if let Some((scheme, _)) = src.split_once("://") {
                return Err(ImageError::UnsupportedSource(format!("{scheme}://")));
            }
            self.read_file(src)
        })
    }
}

fn strip_scheme<'a>(src: &'a str, scheme: &str) -> Option<&'a str> {
    let head = src.get(..scheme.len())?;
    head.eq_ignore_ascii_case(scheme).then(|| &src[scheme.len()..])
}

/// Decode the part of a data URI after `data:`.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>, ImageError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::DataUri("missing ','".to_string()))?;
    let is_base64 = meta
        .split(';')
        .any(|param| param.trim().eq_ignore_ascii_case("base64"));
    if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ImageError::DataUri(e.to_string()))
    } else {
        Ok(percent_decode(payload).into_bytes())
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Decode encoded image bytes (PNG, JPEG, WebP) to straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<ImageData, ImageError> {
    let decoded = ::image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageError::Empty);
    }
    Ok(ImageData {
        data: Blob::new(Arc::new(rgba.into_vec())),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    })
}
