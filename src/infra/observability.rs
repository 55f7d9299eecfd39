//! Logging and metrics setup.
//!
//! Tracing goes to stdout through `tracing-subscriber`, filtered by
//! `RUST_LOG`. Metrics are recorded with the `metrics` facade and rendered
//! on demand by the Prometheus recorder at `GET /metrics`.

use std::str::FromStr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::ConfigError;

const DEFAULT_FILTER: &str = "finance_api=info,tower_http=info,sqlx=warn";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" | "plain" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                message: format!("expected 'pretty' or 'json', got '{}'", other),
            }),
        }
    }
}

/// Installs the global tracing subscriber.
///
/// Does nothing if a subscriber is already set, so tests may call it freely.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    let _ = match format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
}

/// Install the global metrics recorder and return a handle for rendering.
///
/// # Errors
/// Returns an error if a recorder is already installed or building fails.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("auth_signups_total", "Accounts created");
    metrics::describe_counter!("auth_login_failures_total", "Rejected login attempts");
    metrics::describe_counter!(
        "external_requests_total",
        "Calls to third-party services by service and outcome"
    );
    Ok(handle)
}
