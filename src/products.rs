//! Products

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical product identifier.
///
/// Identifiers arriving from the UI or backend as text are converted once, at
/// the edge, through [`FromStr`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a product id from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value of the id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Errors converting external identifiers into a [`ProductId`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The identifier was empty or only whitespace.
    #[error("product id is empty")]
    Empty,

    /// The identifier was not a non-negative integer.
    #[error("product id {0:?} is not a non-negative integer")]
    Malformed(String),
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }

        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_err| ProductIdError::Malformed(s.to_string()))
    }
}

/// A sellable variant of a product (size, colour, ...) with its own stock count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Variant label shown to the shopper, e.g. `"M"`.
    pub label: String,

    /// Units of this variant held in stock.
    pub inventory: u32,
}

/// Catalog product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Product price
    pub price: Money<'static, Currency>,

    /// Variants; empty for products sold without variants.
    pub variants: Vec<Variant>,

    /// Stock held for products without variants.
    pub inventory: u32,
}

impl Product {
    /// Total units in stock across every variant.
    pub fn total_inventory(&self) -> u32 {
        if self.variants.is_empty() {
            return self.inventory;
        }

        self.variants
            .iter()
            .fold(0_u32, |acc, variant| acc.saturating_add(variant.inventory))
    }

    /// Whether any unit of the product is in stock.
    pub fn in_stock(&self) -> bool {
        self.total_inventory() > 0
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn product(variants: Vec<Variant>, inventory: u32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Linen Shirt".to_string(),
            category: "clothing".to_string(),
            price: Money::from_minor(2_500, GBP),
            variants,
            inventory,
        }
    }

    #[test]
    fn parses_numeric_text_ids() -> TestResult {
        assert_eq!(" 42 ".parse::<ProductId>()?, ProductId::new(42));
        assert_eq!(ProductId::from(7), ProductId::new(7));

        Ok(())
    }

    #[test]
    fn rejects_empty_and_malformed_ids() {
        assert_eq!("".parse::<ProductId>(), Err(ProductIdError::Empty));
        assert_eq!(
            "sku-12".parse::<ProductId>(),
            Err(ProductIdError::Malformed("sku-12".to_string()))
        );
        assert_eq!(
            "-3".parse::<ProductId>(),
            Err(ProductIdError::Malformed("-3".to_string()))
        );
    }

    #[test]
    fn total_inventory_sums_variants() {
        let shirt = product(
            vec![
                Variant {
                    label: "S".to_string(),
                    inventory: 2,
                },
                Variant {
                    label: "M".to_string(),
                    inventory: 3,
                },
            ],
            99,
        );

        assert_eq!(shirt.total_inventory(), 5);
        assert!(shirt.in_stock());
    }

    #[test]
    fn total_inventory_without_variants_uses_flat_count() {
        assert_eq!(product(Vec::new(), 4).total_inventory(), 4);
        assert!(!product(Vec::new(), 0).in_stock());
    }
}
