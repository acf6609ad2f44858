//! Cart

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::{products::ProductId, uuids::TypedUuid};

/// Cart line item id
pub type LineItemId = TypedUuid<CartLineItem>;

/// One row of the cart: a product/variant/quantity/price tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    /// Line item id
    pub id: LineItemId,

    /// Product held by this line
    pub product: ProductId,

    /// Units reserved by this line, always at least one.
    pub quantity: u32,

    /// Price of a single unit
    pub unit_price: Money<'static, Currency>,

    /// Optional variant label, e.g. a size.
    pub variant: Option<String>,
}

impl CartLineItem {
    /// Create a line item with a fresh id.
    #[must_use]
    pub fn new(
        product: ProductId,
        quantity: u32,
        unit_price: Money<'static, Currency>,
        variant: Option<String>,
    ) -> Self {
        Self {
            id: LineItemId::generate(),
            product,
            quantity,
            unit_price,
            variant,
        }
    }

    /// Whether this line holds the given product and variant.
    pub fn matches(&self, product: ProductId, variant: Option<&str>) -> bool {
        self.product == product && self.variant.as_deref() == variant
    }

    /// Copy of the line under a fresh id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self::new(
            self.product,
            self.quantity,
            self.unit_price,
            self.variant.clone(),
        )
    }

    /// Unit price multiplied by quantity, in minor units.
    pub fn line_total_minor(&self) -> Option<i64> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
    }
}

/// Ordered list of line items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart holding the given lines, in order.
    #[must_use]
    pub fn with_items(items: impl Into<Vec<CartLineItem>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Iterate over the line items in order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Line items as a slice.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Get a line item by id.
    pub fn get(&self, id: LineItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: LineItemId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// First line holding the given product and variant.
    pub fn find(&self, product: ProductId, variant: Option<&str>) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.matches(product, variant))
    }

    pub(crate) fn find_mut(
        &mut self,
        product: ProductId,
        variant: Option<&str>,
    ) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|item| item.matches(product, variant))
    }

    pub(crate) fn find_product_mut(&mut self, product: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.product == product)
    }

    pub(crate) fn push(&mut self, item: CartLineItem) {
        self.items.push(item);
    }

    pub(crate) fn remove(&mut self, id: LineItemId) -> Option<CartLineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;

        Some(self.items.remove(index))
    }

    pub(crate) fn take_items(&mut self) -> Vec<CartLineItem> {
        std::mem::take(&mut self.items)
    }

    /// Units held per product, ignoring variants and line order.
    pub fn quantities(&self) -> FxHashMap<ProductId, u32> {
        quantities(&self.items)
    }

    /// Units of `product` held across every line.
    pub fn reserved(&self, product: ProductId) -> u32 {
        self.items
            .iter()
            .filter(|item| item.product == product)
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }
}

/// Multiset of product id to total quantity over `items`.
pub fn quantities(items: &[CartLineItem]) -> FxHashMap<ProductId, u32> {
    let mut totals = FxHashMap::default();

    for item in items {
        let entry = totals.entry(item.product).or_insert(0_u32);
        *entry = entry.saturating_add(item.quantity);
    }

    totals
}

/// Sum of every line total in `currency`.
///
/// Returns `None` on arithmetic overflow.
pub fn total_price(
    items: &[CartLineItem],
    currency: &'static Currency,
) -> Option<Money<'static, Currency>> {
    items
        .iter()
        .try_fold(0_i64, |acc, item| acc.checked_add(item.line_total_minor()?))
        .map(|minor| Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    fn line(product: u64, quantity: u32, price: i64, variant: Option<&str>) -> CartLineItem {
        CartLineItem::new(
            ProductId::new(product),
            quantity,
            Money::from_minor(price, GBP),
            variant.map(str::to_string),
        )
    }

    #[test]
    fn find_matches_product_and_variant() {
        let cart = Cart::with_items([line(1, 1, 100, Some("M")), line(1, 2, 100, None)]);

        let medium = cart.find(ProductId::new(1), Some("M"));
        let plain = cart.find(ProductId::new(1), None);

        assert_eq!(medium.map(|item| item.quantity), Some(1));
        assert_eq!(plain.map(|item| item.quantity), Some(2));
        assert!(cart.find(ProductId::new(1), Some("L")).is_none());
    }

    #[test]
    fn quantities_fold_variants_together() {
        let cart = Cart::with_items([
            line(1, 1, 100, Some("M")),
            line(1, 2, 100, None),
            line(2, 5, 50, None),
        ]);

        let quantities = cart.quantities();

        assert_eq!(quantities.get(&ProductId::new(1)), Some(&3));
        assert_eq!(quantities.get(&ProductId::new(2)), Some(&5));
        assert_eq!(cart.reserved(ProductId::new(1)), 3);
        assert_eq!(cart.unit_count(), 8);
    }

    #[test]
    fn remove_keeps_order_of_remaining_lines() {
        let first = line(1, 1, 100, None);
        let second = line(2, 1, 100, None);
        let third = line(3, 1, 100, None);
        let mut cart = Cart::with_items([first.clone(), second.clone(), third.clone()]);

        let removed = cart.remove(second.id);

        assert_eq!(removed, Some(second));
        assert_eq!(
            cart.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![first.id, third.id]
        );
    }

    #[test]
    fn total_price_multiplies_quantities() {
        let items = [line(1, 2, 150, None), line(2, 1, 300, None)];

        assert_eq!(total_price(&items, GBP), Some(Money::from_minor(600, GBP)));
        assert_eq!(total_price(&[], GBP), Some(Money::from_minor(0, GBP)));
    }

    #[test]
    fn duplicate_assigns_fresh_id() {
        let original = line(1, 3, 100, Some("S"));
        let copy = original.duplicate();

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.quantity, 3);
        assert_eq!(copy.variant.as_deref(), Some("S"));
    }
}
