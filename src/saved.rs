//! Saved Carts & Saved-For-Later

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{CartLineItem, quantities},
    products::ProductId,
    uuids::TypedUuid,
};

/// Saved cart id
pub type SavedCartId = TypedUuid<SavedCart>;

/// A named, frozen copy of a past cart's contents.
///
/// The items are snapshots: they hold no reservation against the live pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCart {
    /// Saved cart id
    pub id: SavedCartId,

    /// Name given by the shopper
    pub name: String,

    /// When the cart was saved
    pub created_at: Timestamp,

    items: Vec<CartLineItem>,
}

impl SavedCart {
    /// Freeze `items` into a new saved cart.
    pub fn new(name: impl Into<String>, items: impl Into<Vec<CartLineItem>>) -> Self {
        Self::restore(SavedCartId::generate(), name, Timestamp::now(), items)
    }

    /// Rebuild a saved cart from persisted parts.
    pub fn restore(
        id: SavedCartId,
        name: impl Into<String>,
        created_at: Timestamp,
        items: impl Into<Vec<CartLineItem>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
            items: items.into(),
        }
    }

    /// Items in the order they were stored.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Units required per product to load this cart.
    pub fn quantities(&self) -> FxHashMap<ProductId, u32> {
        quantities(&self.items)
    }
}

/// Saved-for-later item id
pub type SavedItemId = TypedUuid<SavedForLaterItem>;

/// A cart line parked for later. It holds no inventory reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedForLaterItem {
    /// Saved item id
    pub id: SavedItemId,

    /// Product id
    pub product: ProductId,

    /// Units to reserve when moved back to the cart
    pub quantity: u32,

    /// Price of a single unit when it was saved
    pub unit_price: Money<'static, Currency>,

    /// Optional variant label
    pub variant: Option<String>,
}

impl From<CartLineItem> for SavedForLaterItem {
    fn from(line: CartLineItem) -> Self {
        Self {
            id: SavedItemId::generate(),
            product: line.product,
            quantity: line.quantity,
            unit_price: line.unit_price,
            variant: line.variant,
        }
    }
}

impl From<&SavedForLaterItem> for CartLineItem {
    fn from(item: &SavedForLaterItem) -> Self {
        CartLineItem::new(
            item.product,
            item.quantity,
            item.unit_price,
            item.variant.clone(),
        )
    }
}
