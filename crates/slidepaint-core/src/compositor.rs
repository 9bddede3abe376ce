//! Z-order compositing.
//!
//! Objects resolve asynchronously and out of order. Paint order must depend
//! only on `zIndex` and the original descriptor order, never on which image
//! happened to finish decoding first.

/// An item tagged with its stacking key.
#[derive(Debug, Clone)]
pub struct Layered<T> {
    pub z_index: f64,
    /// Position of the originating descriptor.
    pub order: usize,
    pub item: T,
}

impl<T> Layered<T> {
    pub fn new(z_index: f64, order: usize, item: T) -> Self {
        Self { z_index, order, item }
    }
}

/// Order a fully resolved batch for committing: ascending `z_index`, ties
/// broken by descriptor order. Back-most item first.
pub fn composite<T>(mut items: Vec<Layered<T>>) -> Vec<T> {
    items.sort_by(|a, b| {
        a.z_index
            .total_cmp(&b.z_index)
            .then_with(|| a.order.cmp(&b.order))
    });
    items.into_iter().map(|layered| layered.item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_by_z_index() {
        let items = vec![
            Layered::new(1.0, 0, "rect"),
            Layered::new(0.0, 1, "text"),
        ];
        assert_eq!(composite(items), vec!["text", "rect"]);
    }

    #[test]
    fn test_ties_keep_descriptor_order_whatever_the_arrival_order() {
        // Arrival order scrambled relative to descriptor order.
        let items = vec![
            Layered::new(0.0, 3, "d"),
            Layered::new(0.0, 0, "a"),
            Layered::new(2.0, 1, "b"),
            Layered::new(0.0, 2, "c"),
        ];
        assert_eq!(composite(items), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_negative_and_fractional_z() {
        let items = vec![
            Layered::new(0.5, 0, "half"),
            Layered::new(-1.0, 1, "under"),
            Layered::new(0.0, 2, "base"),
        ];
        assert_eq!(composite(items), vec!["under", "base", "half"]);
    }
}
