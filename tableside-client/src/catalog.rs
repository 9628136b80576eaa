//! Menu catalog read model and category filter

use crate::{ClientError, ClientResult};
use shared::{Decimal, MenuItem, MenuItemId};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Wildcard selector text
pub const ALL: &str = "all";

/// Maximum accepted unit price (1,000,000,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Immutable snapshot of the menu for one session
///
/// Only ever replaced as a whole; items keep the order the menu API sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    /// Build a catalog, rejecting data the cart could not work with
    pub fn new(items: Vec<MenuItem>) -> ClientResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.price < Decimal::ZERO {
                return Err(ClientError::CatalogUnavailable(format!(
                    "item {} has negative price {}",
                    item.id, item.price
                )));
            }
            if item.price > MAX_PRICE {
                return Err(ClientError::CatalogUnavailable(format!(
                    "item {} price {} exceeds maximum allowed ({})",
                    item.id, item.price, MAX_PRICE
                )));
            }
            if !seen.insert(item.id) {
                return Err(ClientError::CatalogUnavailable(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct category tags in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for item in &self.items {
            if !out.contains(&item.category.as_str()) {
                out.push(&item.category);
            }
        }
        out
    }
}

/// Category filter selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelector {
    /// Every item
    #[default]
    All,
    /// Items whose category tag equals this one
    Category(String),
}

impl CategorySelector {
    /// Parse selector text; "all" (any case) is the wildcard
    pub fn from_tag(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            CategorySelector::All
        } else {
            CategorySelector::Category(s.to_string())
        }
    }
}

impl FromStr for CategorySelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::All => f.write_str(ALL),
            CategorySelector::Category(tag) => f.write_str(tag),
        }
    }
}

/// Visible subset of the catalog for a selector, in catalog order
pub fn filter(catalog: &Catalog, selector: &CategorySelector) -> Vec<MenuItem> {
    match selector {
        CategorySelector::All => catalog.items.clone(),
        CategorySelector::Category(tag) => catalog
            .items
            .iter()
            .filter(|item| item.is_in_category(tag))
            .cloned()
            .collect(),
    }
}
