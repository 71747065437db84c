//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the currency's standard unit (e.g. dollars) as
//! `NUMERIC` columns; `Decimal` avoids float rounding in order totals.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency.as_str())
    }
}

/// ISO 4217 currency codes, serialized lowercase to match stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
}

impl CurrencyCode {
    /// The lowercase code as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Cad => "cad",
            Self::Aud => "aud",
        }
    }

    /// Parse a currency code; unknown codes fall back to USD.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "eur" => Self::Eur,
            "gbp" => Self::Gbp,
            "cad" => Self::Cad,
            "aud" => Self::Aud,
            _ => Self::Usd,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimal_places() {
        let price = Price::new(Decimal::new(49_900, 2), CurrencyCode::Usd);
        assert_eq!(price.to_string(), "499.00 usd");
    }

    #[test]
    fn test_currency_serde_lowercase() {
        let json = serde_json::to_string(&CurrencyCode::Usd).unwrap();
        assert_eq!(json, "\"usd\"");

        let parsed: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(parsed, CurrencyCode::Eur);
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(CurrencyCode::parse_or_default("gbp"), CurrencyCode::Gbp);
        assert_eq!(CurrencyCode::parse_or_default("xyz"), CurrencyCode::Usd);
    }

    #[test]
    fn test_zero() {
        let zero = Price::zero(CurrencyCode::Usd);
        assert_eq!(zero.amount, Decimal::ZERO);
    }
}
