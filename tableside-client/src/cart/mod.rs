//! Cart aggregation
//!
//! The cart holds at most one line per menu item, in the order items were
//! first added. Name and price are copied from the menu item when its line
//! is created, so a later menu reload never changes what the patron saw.
//! Quantities are always at least 1: a line that would drop to 0 is removed.
//! Totals saturate at `Decimal::MAX` instead of overflowing.

use crate::{ClientError, ClientResult};
use shared::{Decimal, MenuItem, MenuItemId, OrderItemPayload, OrderRequest, TableId};

/// Maximum units per cart line
pub const MAX_QUANTITY: u32 = 9999;

/// One aggregated cart entry
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub menu_item_id: MenuItemId,
    /// Name snapshot
    pub name: String,
    /// Unit price snapshot
    pub price: Decimal,
    pub quantity: u32,
    pub note: String,
}

impl CartLine {
    fn from_item(item: &MenuItem) -> Self {
        Self {
            menu_item_id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
            note: String::new(),
        }
    }

    /// `price * quantity`
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl From<&CartLine> for OrderItemPayload {
    fn from(line: &CartLine) -> Self {
        Self {
            menu_item_id: line.menu_item_id,
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
            note: line.note.clone(),
        }
    }
}

/// The patron's cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`, merging into its existing line
    ///
    /// Quantity stops at `MAX_QUANTITY`; the note of an existing line is kept.
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.position(item.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = (line.quantity + 1).min(MAX_QUANTITY);
            }
            None => self.lines.push(CartLine::from_item(item)),
        }
    }

    /// Replace the note of an existing line
    pub fn set_note(&mut self, id: MenuItemId, note: impl Into<String>) -> ClientResult<()> {
        let idx = self.position(id).ok_or(ClientError::InvalidReference(id))?;
        self.lines[idx].note = note.into();
        Ok(())
    }

    /// Take one unit off a line, removing it when none are left
    ///
    /// Returns the remaining quantity (0 when the line was removed).
    pub fn decrement_item(&mut self, id: MenuItemId) -> ClientResult<u32> {
        let idx = self.position(id).ok_or(ClientError::InvalidReference(id))?;
        let line = &mut self.lines[idx];
        if line.quantity <= 1 {
            self.lines.remove(idx);
            return Ok(0);
        }
        line.quantity -= 1;
        Ok(line.quantity)
    }

    /// Drop a line entirely, returning it
    pub fn remove_item(&mut self, id: MenuItemId) -> ClientResult<CartLine> {
        let idx = self.position(id).ok_or(ClientError::InvalidReference(id))?;
        Ok(self.lines.remove(idx))
    }

    /// Sum of `price * quantity` over the current lines
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.menu_item_id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Order payload for the current lines
    pub fn to_order_request(&self, table_id: TableId) -> OrderRequest {
        OrderRequest {
            table_id,
            items: self.lines.iter().map(OrderItemPayload::from).collect(),
        }
    }

    fn position(&self, id: MenuItemId) -> Option<usize> {
        self.lines.iter().position(|l| l.menu_item_id == id)
    }
}
