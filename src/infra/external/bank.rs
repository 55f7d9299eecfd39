use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};

use crate::domain::{AppError, BankClient};

use super::{HttpClientConfig, decode, transport_error};

const SERVICE: &str = "bank";

/// Mock bank feed queried with `?user_id=`.
pub struct HttpBankClient {
    http_client: Client,
    base_url: String,
}

impl HttpBankClient {
    pub fn new(base_url: &str, config: &HttpClientConfig) -> Result<Self, AppError> {
        let http_client = config.build()?;
        info!(base_url = %base_url, "Created bank client");
        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl BankClient for HttpBankClient {
    #[instrument(skip(self))]
    async fn fetch_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("user_id", user_id)])
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        decode(SERVICE, response).await
    }
}
