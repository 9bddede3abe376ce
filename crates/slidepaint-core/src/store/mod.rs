//! Slide store adapter.
//!
//! Slides live elsewhere (object storage, a local project folder, a test
//! fixture). The renderer only needs to list keys and read raw JSON text.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod dir;

pub use memory::MemorySlideStore;

#[cfg(not(target_arch = "wasm32"))]
pub use dir::DirSlideStore;

use crate::deck::{OrderedSlide, order_slides, slide_number};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Slide store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Slide not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Source of raw slide JSON keyed by path-like strings.
///
/// Note: On native platforms, implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait SlideStore: Send + Sync {
    /// List every key in the store.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>>;

    /// Read the raw text stored under `key`.
    fn read(&self, key: &str) -> BoxFuture<'_, StoreResult<String>>;
}

/// Source of raw slide JSON (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait SlideStore {
    /// List every key in the store.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>>;

    /// Read the raw text stored under `key`.
    fn read(&self, key: &str) -> BoxFuture<'_, StoreResult<String>>;
}

/// Read every slide file from a store and return the deck in order.
///
/// Only a failure to list the store is an error. A slide that cannot be read
/// is dropped just like one that cannot be parsed.
pub async fn load_deck(store: &dyn SlideStore) -> StoreResult<Vec<OrderedSlide>> {
    let keys = store.list().await?;
    let mut entries = Vec::new();
    for key in keys.into_iter().filter(|k| slide_number(k).is_some()) {
        match store.read(&key).await {
            Ok(text) => entries.push((key, text)),
            Err(e) => log::warn!("Dropping slide {key}: {e}"),
        }
    }
    Ok(order_slides(entries))
}
