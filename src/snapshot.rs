//! User Snapshots
//!
//! Serializable mirror of a shopper's state, as stored by the remote
//! persistence service. Money is stored as minor units plus an ISO code.
//! The inventory pool and undo history are not part of the mirror: the pool
//! comes from the catalog, and history is session-local.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartLineItem},
    ledger::CartLedger,
    orders::Order,
    pricing::{PriceError, money_from_minor},
    products::ProductId,
    saved::{SavedCart, SavedForLaterItem},
    watch::{StockWatch, StockWatchEntry},
};

/// Errors rebuilding a ledger from a snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// A stored price could not be converted.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// A stored price is in a currency other than the ledger's.
    #[error("stored price has currency {0}, but the ledger uses {1}")]
    CurrencyMismatch(String, &'static str),
}

/// Stored cart line, saved cart item or order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub id: Uuid,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// Stored saved cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCartRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: Timestamp,
    pub items: Vec<LineItemRecord>,
}

/// Stored stock watch entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockWatchRecord {
    pub product_id: ProductId,
    pub display_name: String,
    pub last_known_price: i64,
    pub currency: String,
}

/// Stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub items: Vec<LineItemRecord>,
    pub total: i64,
    pub currency: String,
}

/// Everything mirrored for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    #[serde(default)]
    pub cart_items: Vec<LineItemRecord>,
    #[serde(default)]
    pub saved_carts: Vec<SavedCartRecord>,
    #[serde(default)]
    pub saved_for_later: Vec<LineItemRecord>,
    #[serde(default)]
    pub stock_watch: Vec<StockWatchRecord>,
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
}

impl UserSnapshot {
    /// Whether nothing is stored for the user.
    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
            && self.saved_carts.is_empty()
            && self.saved_for_later.is_empty()
            && self.stock_watch.is_empty()
            && self.orders.is_empty()
    }
}

/// Outcome of rebuilding a ledger from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Cart lines reserved again
    pub restored: usize,

    /// Products whose stored cart lines could not be reserved and were dropped
    pub dropped: Vec<ProductId>,

    /// Malformed saved, saved-for-later and order items that were skipped
    pub discarded: usize,
}

impl From<&CartLineItem> for LineItemRecord {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.into_uuid(),
            product_id: item.product,
            quantity: item.quantity,
            unit_price: item.unit_price.to_minor_units(),
            currency: item.unit_price.currency().iso_alpha_code.to_string(),
            variant: item.variant.clone(),
        }
    }
}

impl From<&SavedForLaterItem> for LineItemRecord {
    fn from(item: &SavedForLaterItem) -> Self {
        Self {
            id: item.id.into_uuid(),
            product_id: item.product,
            quantity: item.quantity,
            unit_price: item.unit_price.to_minor_units(),
            currency: item.unit_price.currency().iso_alpha_code.to_string(),
            variant: item.variant.clone(),
        }
    }
}

impl CartLedger {
    /// Capture the mirrored parts of the ledger.
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            cart_items: self.cart().iter().map(LineItemRecord::from).collect(),
            saved_carts: self
                .saved_carts()
                .iter()
                .map(|cart| SavedCartRecord {
                    id: cart.id.into_uuid(),
                    name: cart.name.clone(),
                    created_at: cart.created_at,
                    items: cart.items().iter().map(LineItemRecord::from).collect(),
                })
                .collect(),
            saved_for_later: self
                .saved_for_later()
                .iter()
                .map(LineItemRecord::from)
                .collect(),
            stock_watch: self
                .watch_list()
                .iter()
                .map(|entry| StockWatchRecord {
                    product_id: entry.product,
                    display_name: entry.display_name.clone(),
                    last_known_price: entry.last_known_price.to_minor_units(),
                    currency: entry.last_known_price.currency().iso_alpha_code.to_string(),
                })
                .collect(),
            orders: self
                .orders()
                .iter()
                .map(|order| OrderRecord {
                    id: order.id.into_uuid(),
                    created_at: order.created_at,
                    items: order.items.iter().map(LineItemRecord::from).collect(),
                    total: order.total.to_minor_units(),
                    currency: order.total.currency().iso_alpha_code.to_string(),
                })
                .collect(),
        }
    }

    /// Rebuild the mirrored parts of the ledger on top of its current pool.
    ///
    /// Stored cart lines are reserved from the pool in order; lines the pool
    /// can no longer cover are dropped and reported. Stored items with a zero
    /// quantity or a negative price are discarded. The live cart, saved
    /// carts, saved-for-later items, watches and orders are replaced, and the
    /// undo history is cleared.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if a stored price cannot be converted into
    /// the ledger currency. The ledger is unchanged on error.
    pub fn hydrate(&mut self, snapshot: &UserSnapshot) -> Result<HydrationReport, SnapshotError> {
        let currency = self.currency();
        let mut discarded = 0;

        let lines = snapshot
            .cart_items
            .iter()
            .map(|record| Ok((record.product_id, line_from_record(record, currency)?)))
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        let mut saved_carts = Vec::with_capacity(snapshot.saved_carts.len());

        for record in &snapshot.saved_carts {
            saved_carts.push(SavedCart::restore(
                record.id.into(),
                record.name.clone(),
                record.created_at,
                valid_lines(&record.items, currency, &mut discarded)?,
            ));
        }

        let saved_for_later = valid_lines(&snapshot.saved_for_later, currency, &mut discarded)?
            .into_iter()
            .map(|line| SavedForLaterItem {
                id: line.id.into_uuid().into(),
                product: line.product,
                quantity: line.quantity,
                unit_price: line.unit_price,
                variant: line.variant,
            })
            .collect::<Vec<_>>();

        let mut orders = Vec::with_capacity(snapshot.orders.len());

        for record in &snapshot.orders {
            orders.push(Order {
                id: record.id.into(),
                created_at: record.created_at,
                items: valid_lines(&record.items, currency, &mut discarded)?,
                total: checked_money(record.total, &record.currency, currency)?,
            });
        }

        let mut pool = self.pool().clone();

        for item in self.cart().iter() {
            pool.release(item.product, item.quantity);
        }

        let mut watch = StockWatch::new();

        for record in &snapshot.stock_watch {
            watch.push(StockWatchEntry {
                product: record.product_id,
                display_name: record.display_name.clone(),
                last_known_price: checked_money(
                    record.last_known_price,
                    &record.currency,
                    currency,
                )?,
                available: 0,
            });
        }

        let mut report = HydrationReport {
            discarded,
            ..HydrationReport::default()
        };
        let mut cart = Cart::new();

        for (product, line) in lines {
            match line {
                Some(line) if pool.reserve(line.product, line.quantity) => {
                    report.restored += 1;
                    cart.push(line);
                }
                _ => report.dropped.push(product),
            }
        }

        watch.refresh(&pool);

        *self.cart_mut() = cart;
        *self.pool_mut() = pool;
        self.restore_parts(saved_for_later, saved_carts, watch, orders);

        Ok(report)
    }
}

fn checked_money(
    minor: i64,
    code: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, SnapshotError> {
    let money = money_from_minor(minor, code)?;

    if money.currency() != currency {
        return Err(SnapshotError::CurrencyMismatch(
            code.to_string(),
            currency.iso_alpha_code,
        ));
    }

    Ok(money)
}

fn valid_lines(
    records: &[LineItemRecord],
    currency: &'static Currency,
    discarded: &mut usize,
) -> Result<Vec<CartLineItem>, SnapshotError> {
    let mut items = Vec::with_capacity(records.len());

    for record in records {
        match line_from_record(record, currency)? {
            Some(item) => items.push(item),
            None => *discarded += 1,
        }
    }

    Ok(items)
}

/// Convert a stored item, or `None` if it has no units or a negative price.
fn line_from_record(
    record: &LineItemRecord,
    currency: &'static Currency,
) -> Result<Option<CartLineItem>, SnapshotError> {
    let unit_price = checked_money(record.unit_price, &record.currency, currency)?;

    if record.quantity == 0 || record.unit_price < 0 {
        return Ok(None);
    }

    Ok(Some(CartLineItem {
        id: record.id.into(),
        product: record.product_id,
        quantity: record.quantity,
        unit_price,
        variant: record.variant.clone(),
    }))
}
