//! Product Catalog
//!
//! Read-only product list loaded from YAML fixtures. The catalog is the
//! source of each product's initial availability.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    history::History,
    inventory::InventoryPool,
    ledger::CartLedger,
    pricing::{PriceError, parse_price},
    products::{Product, ProductId, Variant},
};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid product price
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded; currency unknown
    #[error("No products loaded; currency unknown")]
    NoCurrency,
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: FxHashMap<u64, ProductFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    name: String,

    #[serde(default)]
    category: String,

    /// e.g. `"2.99 GBP"`
    price: String,

    #[serde(default)]
    inventory: u32,

    #[serde(default)]
    variants: Vec<VariantFixture>,
}

#[derive(Debug, Deserialize)]
struct VariantFixture {
    label: String,
    inventory: u32,
}

/// Products keyed by id, all priced in one currency.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: FxHashMap<ProductId, Product>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if products
    /// are priced in different currencies.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, a price cannot be parsed, or
    /// products are priced in different currencies.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;
        let mut catalog = Self::default();

        for (id, product_fixture) in fixture.products {
            let price = parse_price(&product_fixture.price)?;

            // Validate currency consistency
            if let Some(existing) = catalog.currency {
                if existing != price.currency() {
                    return Err(CatalogError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        price.currency().iso_alpha_code.to_string(),
                    ));
                }
            } else {
                catalog.currency = Some(price.currency());
            }

            let id = ProductId::new(id);

            catalog.products.insert(
                id,
                Product {
                    id,
                    name: product_fixture.name,
                    category: product_fixture.category,
                    price,
                    variants: product_fixture
                        .variants
                        .into_iter()
                        .map(|variant| Variant {
                            label: variant.label,
                            inventory: variant.inventory,
                        })
                        .collect(),
                    inventory: product_fixture.inventory,
                },
            );
        }

        Ok(catalog)
    }

    /// Get a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// All products ordered by id.
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();
        products.sort_by_key(|product| product.id);

        products
    }

    /// Products in `category`, ordered by id.
    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        self.products()
            .into_iter()
            .filter(|product| product.category == category)
            .collect()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency shared by every product, once any product is loaded.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Starting pool: each product's total stock across variants.
    pub fn initial_pool(&self) -> InventoryPool {
        self.products
            .values()
            .map(|product| (product.id, product.total_inventory()))
            .collect()
    }

    /// A fresh ledger over this catalog's stock.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NoCurrency`] for an empty catalog.
    pub fn ledger(&self, history: History) -> Result<CartLedger, CatalogError> {
        let currency = self.currency.ok_or(CatalogError::NoCurrency)?;

        Ok(CartLedger::with_history(
            self.initial_pool(),
            currency,
            history,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = r#"
products:
  1:
    name: Oat Milk
    category: grocery
    price: "1.80 GBP"
    inventory: 12
  2:
    name: Linen Shirt
    category: clothing
    price: "35.00 GBP"
    variants:
      - label: S
        inventory: 1
      - label: M
        inventory: 2
  3:
    name: Desk Lamp
    category: home
    price: "24.50 GBP"
"#;

    #[test]
    fn parses_products_and_prices() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        let shirt = catalog.get(ProductId::new(2)).ok_or("missing shirt")?;

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.currency(), Some(GBP));
        assert_eq!(shirt.price, Money::from_minor(3_500, GBP));
        assert_eq!(shirt.variants.len(), 2);

        Ok(())
    }

    #[test]
    fn initial_pool_sums_variant_stock() -> TestResult {
        let pool = Catalog::from_yaml_str(CATALOG)?.initial_pool();

        assert_eq!(pool.available(ProductId::new(1)), 12);
        assert_eq!(pool.available(ProductId::new(2)), 3);
        assert_eq!(pool.available(ProductId::new(3)), 0);

        Ok(())
    }

    #[test]
    fn products_are_listed_by_id_and_category() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        let ids: Vec<u64> = catalog.products().iter().map(|p| p.id.get()).collect();
        let clothing: Vec<&str> = catalog
            .in_category("clothing")
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(clothing, vec!["Linen Shirt"]);

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let yaml = r#"
products:
  1:
    name: A
    price: "1.00 GBP"
  2:
    name: B
    price: "1.00 USD"
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn empty_catalog_cannot_build_ledger() -> TestResult {
        let catalog = Catalog::from_yaml_str("products: {}")?;

        assert!(matches!(
            catalog.ledger(History::default()),
            Err(CatalogError::NoCurrency)
        ));

        Ok(())
    }
}
