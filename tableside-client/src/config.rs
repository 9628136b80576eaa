//! Client configuration

use crate::catalog::CategorySelector;

/// Category tags offered by the default menu layout
pub const DEFAULT_CATEGORIES: [&str; 3] = ["food", "drink", "combo"];

/// Client configuration for talking to the menu and order-intake API
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | TABLESIDE_API_URL | http://localhost:8080 | API base URL |
/// | TABLESIDE_TIMEOUT_SECS | 30 | Request timeout in seconds |
/// | TABLESIDE_CATEGORIES | food,drink,combo | Supported category tags |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Category tags the patron may filter by (besides "all")
    pub categories: Vec<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var("TABLESIDE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());
        let mut config = Self::new(base_url);

        if let Some(timeout) = std::env::var("TABLESIDE_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout = timeout;
        }

        if let Ok(list) = std::env::var("TABLESIDE_CATEGORIES") {
            let categories: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            if !categories.is_empty() {
                config.categories = categories;
            }
        }

        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Replace the supported category tags
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a selector is one the menu layout offers
    pub fn supports(&self, selector: &CategorySelector) -> bool {
        match selector {
            CategorySelector::All => true,
            CategorySelector::Category(tag) => self.categories.iter().any(|c| c == tag),
        }
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
