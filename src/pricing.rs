//! Pricing helpers shared by catalog fixtures and persisted snapshots.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

/// Errors parsing prices or currency codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Price text was not `AMOUNT CURRENCY`.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Currency code is not supported.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported ISO currency by its alpha code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for unsupported codes.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PriceError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Money from minor units and an ISO currency code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for unsupported codes.
pub fn money_from_minor(minor: i64, code: &str) -> Result<Money<'static, Currency>, PriceError> {
    Ok(Money::from_minor(minor, currency_from_code(code)?))
}

/// Parse a price string (e.g., `"2.99 GBP"`).
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`, if
/// the amount is not a decimal number, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, PriceError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?;

    money_from_minor(minor_units, code)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_decimal_amounts_into_minor_units() -> TestResult {
        assert_eq!(parse_price("2.99 GBP")?, Money::from_minor(299, GBP));
        assert_eq!(parse_price("10 USD")?, Money::from_minor(1_000, USD));

        Ok(())
    }

    #[test]
    fn rejects_malformed_prices() {
        assert!(matches!(
            parse_price("2.99"),
            Err(PriceError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("two GBP"),
            Err(PriceError::InvalidPrice(_))
        ));
        assert_eq!(
            parse_price("1.00 JPY"),
            Err(PriceError::UnknownCurrency("JPY".to_string()))
        );
    }
}
