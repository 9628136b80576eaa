//! HTTP transport for the menu and order-intake endpoints

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{MenuItem, OrderRequest};

/// Menu catalog path
pub const MENU_PATH: &str = "api/menu";
/// Order intake path
pub const ORDERS_PATH: &str = "api/orders";

/// Remote collaborators the session talks to
///
/// Each call suspends until the server answers and resolves exactly once.
/// Implementations report transport problems as-is; the session decides
/// what they mean for the catalog or the cart.
#[async_trait]
pub trait MenuApi: Send + Sync {
    /// Fetch the full, ordered menu catalog
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>>;

    /// Send an order; `Ok` means order intake accepted it
    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<()>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MenuApi for NetworkHttpClient {
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        tracing::debug!(url = %self.url(MENU_PATH), "Fetching menu");
        self.get(MENU_PATH).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<()> {
        tracing::debug!(url = %self.url(ORDERS_PATH), table = %order.table_id, "Posting order");
        let response = self
            .client
            .post(self.url(ORDERS_PATH))
            .json(order)
            .send()
            .await?;
        // Success carries no required body
        Self::check_status(response).await?;
        Ok(())
    }
}
