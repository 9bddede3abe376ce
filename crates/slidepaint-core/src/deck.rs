//! Ordering raw slide files into a deck.

use crate::document::SlideDocument;

/// Path segment every slide key contains, followed by the slide number.
pub const SLIDE_KEY_MARKER: &str = "/slides/slide-";
/// Extension every slide key ends with.
pub const SLIDE_KEY_EXTENSION: &str = ".json";

/// A parsed slide with the key it was read from.
#[derive(Debug, Clone)]
pub struct OrderedSlide {
    pub key: String,
    /// Number parsed from the key; controls deck order.
    pub number: u64,
    pub document: SlideDocument,
}

/// Slide number encoded in a store key.
///
/// Returns `None` when the key does not follow the `/slides/slide-<N>.json`
/// convention. A key that follows it but whose `<N>` is not a non-negative
/// integer sorts as slide 0.
pub fn slide_number(key: &str) -> Option<u64> {
    let start = key.rfind(SLIDE_KEY_MARKER)? + SLIDE_KEY_MARKER.len();
    let suffix = key[start..].strip_suffix(SLIDE_KEY_EXTENSION)?;
    if suffix.contains('/') {
        return None;
    }
    Some(suffix.parse().unwrap_or(0))
}

/// Turn a key → raw text mapping into slides in deck order.
///
/// Keys that are not slide files are ignored. Slides sort by number; slides
/// sharing a number (including several unnumbered ones, which all count as
/// 0) fall back to key order. Slides whose text is not valid JSON are
/// dropped without a placeholder.
pub fn order_slides<I, K, V>(entries: I) -> Vec<OrderedSlide>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut numbered: Vec<(u64, String, V)> = entries
        .into_iter()
        .filter_map(|(key, text)| {
            let key = key.as_ref();
            slide_number(key).map(|number| (number, key.to_string(), text))
        })
        .collect();
    numbered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    numbered
        .into_iter()
        .filter_map(|(number, key, text)| match SlideDocument::from_json(text.as_ref()) {
            Ok(document) => Some(OrderedSlide {
                key,
                number,
                document,
            }),
            Err(e) => {
                log::warn!("Dropping slide {key}: {e}");
                None
            }
        })
        .collect()
}
