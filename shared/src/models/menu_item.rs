//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item identifier as issued by the menu API
pub type MenuItemId = i64;

/// Menu item entity (one entry of `GET /api/menu`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in the restaurant's currency, never negative
    pub price: Decimal,
    /// Category tag (e.g. "food", "drink", "combo")
    pub category: String,
    #[serde(default)]
    pub image_url: String,
}

impl MenuItem {
    /// Whether this item carries the given category tag
    pub fn is_in_category(&self, category: &str) -> bool {
        self.category == category
    }
}
