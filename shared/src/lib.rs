//! Shared types for the tableside ordering client
//!
//! Wire models exchanged with the menu and order-intake endpoints.

pub mod models;

// Re-exports
pub use models::{MenuItem, MenuItemId, OrderItemPayload, OrderRequest, TableId};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
