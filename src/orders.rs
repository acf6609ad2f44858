//! Orders

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{cart::CartLineItem, uuids::TypedUuid};

/// Order id
pub type OrderId = TypedUuid<Order>;

/// A completed checkout. Orders are append-only and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// When the order was placed
    pub created_at: Timestamp,

    /// Purchased lines
    pub items: Vec<CartLineItem>,

    /// Amount charged for all items
    pub total: Money<'static, Currency>,
}

impl Order {
    /// Number of units purchased.
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }
}
