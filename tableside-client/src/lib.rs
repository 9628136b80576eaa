//! Tableside Client - menu, cart and order submission for a dining table
//!
//! Loads the restaurant menu over HTTP, aggregates the patron's cart and
//! sends the order to order intake tagged with the table identifier.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod session;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CategorySelector, filter};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{MenuApi, NetworkHttpClient};
pub use session::{OrderSession, SubmissionReceipt};

// Re-export shared types for convenience
pub use shared::{Decimal, MenuItem, MenuItemId, OrderItemPayload, OrderRequest, TableId};
