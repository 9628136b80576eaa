//! Order Model
//!
//! Body of `POST /api/orders`. Built from the cart at submission time and
//! never stored.

use super::MenuItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Table identifier (桌台号)
///
/// Opaque to the client: whatever the embedding caller scanned or typed is
/// sent back verbatim, as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableId {
    Number(i64),
    Name(String),
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableId::Number(n) => write!(f, "{}", n),
            TableId::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TableId {
    fn from(value: i64) -> Self {
        TableId::Number(value)
    }
}

impl From<u32> for TableId {
    fn from(value: u32) -> Self {
        TableId::Number(i64::from(value))
    }
}

impl From<String> for TableId {
    fn from(value: String) -> Self {
        TableId::Name(value)
    }
}

impl From<&str> for TableId {
    fn from(value: &str) -> Self {
        TableId::Name(value.to_string())
    }
}

/// One order line as sent to order intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemPayload {
    pub menu_item_id: MenuItemId,
    /// Name snapshot taken when the item was first added
    pub name: String,
    /// Unit price snapshot taken when the item was first added
    pub price: Decimal,
    pub quantity: u32,
    /// Kitchen note, empty when the patron left none
    #[serde(default)]
    pub note: String,
}

/// Order submission payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub table_id: TableId,
    pub items: Vec<OrderItemPayload>,
}

impl OrderRequest {
    /// Sum of `price * quantity` over all lines, saturating at `Decimal::MAX`
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.price.saturating_mul(Decimal::from(i.quantity)))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
