use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domain::{AppError, ExchangeRateClient, RateTable};

use super::{HttpClientConfig, decode, transport_error};

const SERVICE: &str = "exchange_rate";

#[derive(Debug, Deserialize)]
struct LatestRates {
    conversion_rates: RateTable,
}

/// Exchange-rate API client; requests `{base}/{key}/latest/USD`.
pub struct HttpExchangeRateClient {
    http_client: Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpExchangeRateClient {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        config: &HttpClientConfig,
    ) -> Result<Self, AppError> {
        let http_client = config.build()?;
        info!(base_url = %base_url, "Created exchange-rate client");
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl ExchangeRateClient for HttpExchangeRateClient {
    #[instrument(skip(self))]
    async fn latest_rates(&self) -> Result<RateTable, AppError> {
        let url = format!(
            "{}/{}/latest/USD",
            self.base_url,
            self.api_key.expose_secret()
        );
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e.without_url()))?;
        let body: LatestRates = decode(SERVICE, response).await?;
        Ok(body.conversion_rates)
    }
}
