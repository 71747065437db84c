//! Status enums for carts and orders.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Cart lifecycle status.
///
/// A cart starts `active` and becomes `recovered` exactly once: either when
/// its recovery token is redeemed or when an order is finalised from it.
/// The transition implicitly invalidates any outstanding recovery token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    Active,
    Recovered,
}

impl CartStatus {
    /// The lowercase status as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Recovered => "recovered",
        }
    }

    /// Parse a stored status value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "recovered" => Some(Self::Recovered),
            _ => None,
        }
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status.
///
/// Checkout without a payment gateway finalises directly to `paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
}

impl OrderStatus {
    /// The lowercase status as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_status_roundtrip() {
        for status in [CartStatus::Active, CartStatus::Recovered] {
            assert_eq!(CartStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_cart_status_parse_unknown() {
        assert_eq!(CartStatus::parse("abandoned"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&CartStatus::Recovered).unwrap(),
            "\"recovered\""
        );
        let parsed: CartStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(parsed, CartStatus::Active);
    }

    #[test]
    fn test_order_status_as_str() {
        assert_eq!(OrderStatus::Paid.as_str(), "paid");
        assert_eq!(OrderStatus::Pending.as_str(), "pending");
    }
}
