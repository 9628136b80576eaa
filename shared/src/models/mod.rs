//! Data models
//!
//! Shared between the client library and anything that renders or
//! forwards its state. Menu item IDs are `i64`, matching the menu API.

pub mod menu_item;
pub mod order;

// Re-exports
pub use menu_item::*;
pub use order::*;
