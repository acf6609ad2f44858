//! Stock Watch

use rusty_money::{Money, iso::Currency};

use crate::{inventory::InventoryPool, products::ProductId};

/// A shopper's request to hear when an out-of-stock product returns.
#[derive(Debug, Clone, PartialEq)]
pub struct StockWatchEntry {
    /// Watched product
    pub product: ProductId,

    /// Name shown in notifications
    pub display_name: String,

    /// Price when the watch was created
    pub last_known_price: Money<'static, Currency>,

    /// Availability observed at the last inventory change
    pub available: u32,
}

/// Watch entries in the order they were created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockWatch {
    entries: Vec<StockWatchEntry>,
}

impl StockWatch {
    /// Create an empty watch list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `product` is being watched.
    pub fn contains(&self, product: ProductId) -> bool {
        self.get(product).is_some()
    }

    /// Get the entry for `product`.
    pub fn get(&self, product: ProductId) -> Option<&StockWatchEntry> {
        self.entries.iter().find(|entry| entry.product == product)
    }

    /// Iterate over entries in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &StockWatchEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, entry: StockWatchEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn remove(&mut self, product: ProductId) -> Option<StockWatchEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.product == product)?;

        Some(self.entries.remove(index))
    }

    /// Overwrite cached availability from `pool` without reporting transitions.
    pub(crate) fn refresh(&mut self, pool: &InventoryPool) {
        for entry in &mut self.entries {
            entry.available = pool.available(entry.product);
        }
    }

    /// Refresh cached availability from `previous` to `next` and return the
    /// entries whose product went from zero to positive stock.
    ///
    /// Entries are never removed here.
    pub(crate) fn sync(
        &mut self,
        previous: &InventoryPool,
        next: &InventoryPool,
    ) -> Vec<StockWatchEntry> {
        let mut restocked = Vec::new();

        for entry in &mut self.entries {
            let before = previous.available(entry.product);
            let after = next.available(entry.product);

            entry.available = after;

            if before == 0 && after > 0 {
                restocked.push(entry.clone());
            }
        }

        restocked
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;

    use super::*;

    fn entry(product: u64) -> StockWatchEntry {
        StockWatchEntry {
            product: ProductId::new(product),
            display_name: format!("product {product}"),
            last_known_price: Money::from_minor(1_000, EUR),
            available: 0,
        }
    }

    #[test]
    fn sync_reports_only_zero_to_positive_transitions() {
        let mut watch = StockWatch::new();
        watch.push(entry(1));
        watch.push(entry(2));
        watch.push(entry(3));

        let previous = InventoryPool::from([(1, 0), (2, 0), (3, 1)]);
        let next = InventoryPool::from([(1, 4), (2, 0), (3, 2)]);

        let restocked = watch.sync(&previous, &next);

        assert_eq!(restocked.len(), 1);
        assert_eq!(restocked.first().map(|e| e.product), Some(ProductId::new(1)));
        assert_eq!(watch.get(ProductId::new(1)).map(|e| e.available), Some(4));
        assert_eq!(watch.get(ProductId::new(3)).map(|e| e.available), Some(2));
        assert_eq!(watch.len(), 3, "sync never removes entries");
    }

    #[test]
    fn remove_drops_single_entry() {
        let mut watch = StockWatch::new();
        watch.push(entry(1));
        watch.push(entry(2));

        assert!(watch.remove(ProductId::new(1)).is_some());
        assert!(watch.remove(ProductId::new(1)).is_none());
        assert!(!watch.contains(ProductId::new(1)));
        assert!(watch.contains(ProductId::new(2)));
    }
}
