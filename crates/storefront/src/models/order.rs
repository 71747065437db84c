//! Order types produced by checkout finalisation.

use rust_decimal::Decimal;
use serde::Serialize;

use neo_commerce_core::{CurrencyCode, OrderId};

/// Receipt returned once a cart has been finalised into an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub total: Decimal,
    pub currency: CurrencyCode,
}
