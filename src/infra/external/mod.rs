//! HTTP adapters for the bank feed, exchange rates and the generative model.
//!
//! All three share one request shape: a single attempt bounded by the
//! client timeout, non-2xx statuses and undecodable bodies mapped onto
//! `ExternalServiceError`.

mod bank;
mod exchange;
mod gemini;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::domain::{AppError, ExternalServiceError};

pub use bank::HttpBankClient;
pub use exchange::HttpExchangeRateClient;
pub use gemini::GeminiClient;

/// Settings shared by the outbound HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl HttpClientConfig {
    fn build(&self) -> Result<Client, AppError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AppError::ExternalService(ExternalServiceError::HttpError(e.to_string())))
    }
}

fn transport_error(service: &str, error: reqwest::Error) -> AppError {
    let detail = format!("{}: {}", service, error);
    if error.is_timeout() {
        AppError::ExternalService(ExternalServiceError::Timeout(detail))
    } else {
        AppError::ExternalService(ExternalServiceError::Unavailable(detail))
    }
}

/// Checks the status and decodes the JSON body.
async fn decode<T: DeserializeOwned>(service: &str, response: Response) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ExternalService(ExternalServiceError::HttpError(
            format!("{} returned {}: {}", service, status, body),
        )));
    }
    response.json::<T>().await.map_err(|e| {
        AppError::ExternalService(ExternalServiceError::InvalidResponse(format!(
            "{}: {}",
            service, e
        )))
    })
}
