//! Inventory Pool
//!
//! Available (unreserved) units per product. Products the pool has never seen
//! have zero availability.

use rustc_hash::FxHashMap;

use crate::products::ProductId;

/// Mapping of product id to available unit count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryPool {
    units: FxHashMap<ProductId, u32>,
}

impl InventoryPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units currently available for `product`.
    pub fn available(&self, product: ProductId) -> u32 {
        self.units.get(&product).copied().unwrap_or(0)
    }

    /// Set the available units for `product`.
    pub fn set(&mut self, product: ProductId, units: u32) {
        self.units.insert(product, units);
    }

    /// Take `units` out of the pool.
    ///
    /// Returns `false` and leaves the pool untouched when fewer than `units`
    /// are available.
    #[must_use]
    pub fn reserve(&mut self, product: ProductId, units: u32) -> bool {
        let available = self.available(product);

        if units > available {
            return false;
        }

        self.set(product, available - units);

        true
    }

    /// Return `units` to the pool.
    pub fn release(&mut self, product: ProductId, units: u32) {
        let available = self.available(product);

        self.set(product, available.saturating_add(units));
    }

    /// Iterate over every known product and its availability.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.units.iter().map(|(product, units)| (*product, *units))
    }

    /// Number of products tracked by the pool.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the pool tracks no products at all.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl FromIterator<(ProductId, u32)> for InventoryPool {
    fn from_iter<I: IntoIterator<Item = (ProductId, u32)>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(u64, u32); N]> for InventoryPool {
    fn from(entries: [(u64, u32); N]) -> Self {
        entries
            .into_iter()
            .map(|(product, units)| (ProductId::new(product), units))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_products_have_no_stock() {
        let pool = InventoryPool::new();

        assert_eq!(pool.available(ProductId::new(3)), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn reserve_takes_units_when_available() {
        let mut pool = InventoryPool::from([(1, 3)]);

        assert!(pool.reserve(ProductId::new(1), 2));
        assert_eq!(pool.available(ProductId::new(1)), 1);
    }

    #[test]
    fn reserve_refuses_shortfall_without_mutating() {
        let mut pool = InventoryPool::from([(1, 1)]);

        assert!(!pool.reserve(ProductId::new(1), 2));
        assert_eq!(pool.available(ProductId::new(1)), 1);
    }

    #[test]
    fn release_returns_units() {
        let mut pool = InventoryPool::from([(1, 0)]);

        pool.release(ProductId::new(1), 4);
        pool.release(ProductId::new(2), 1);

        assert_eq!(pool.available(ProductId::new(1)), 4);
        assert_eq!(pool.available(ProductId::new(2)), 1);
    }
}
