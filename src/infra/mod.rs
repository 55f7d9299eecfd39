//! Infrastructure layer implementations.

pub mod database;
pub mod external;
pub mod observability;

pub use database::{PostgresClient, PostgresConfig};
pub use external::{GeminiClient, HttpBankClient, HttpClientConfig, HttpExchangeRateClient};
pub use observability::{LogFormat, init_metrics, init_tracing};
