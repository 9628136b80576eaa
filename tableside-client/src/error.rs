//! Client error types

use shared::MenuItemId;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Menu could not be fetched or contained unusable data
    #[error("Menu unavailable: {0}")]
    CatalogUnavailable(String),

    /// Submission attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Order intake rejected the order or could not be reached
    #[error("Order submission failed: {0}")]
    SubmissionFailed(String),

    /// Cart operation targeted an item with no cart line
    #[error("No cart line for menu item {0}")]
    InvalidReference(MenuItemId),

    /// Category selector not offered by the configured menu layout
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A submission is already waiting for its result
    #[error("An order submission is already in flight")]
    SubmissionInFlight,

    /// Submission result reported with no submission pending
    #[error("No order submission is in flight")]
    NoSubmissionInFlight,

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Short message suitable for showing to the patron
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::CatalogUnavailable(_) => "The menu is unavailable right now.",
            ClientError::EmptyCart => "Your cart is empty.",
            ClientError::SubmissionFailed(_) | ClientError::Http(_) => {
                "Your order could not be sent. Please try again."
            }
            ClientError::SubmissionInFlight => "Your order is being sent.",
            ClientError::UnknownCategory(_) => "This category is not available.",
            ClientError::InvalidReference(_)
            | ClientError::NoSubmissionInFlight
            | ClientError::Status { .. }
            | ClientError::InvalidResponse(_)
            | ClientError::Config(_) => "Something went wrong.",
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
