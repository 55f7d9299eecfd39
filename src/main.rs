use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use finance_api::api::{RateLimitConfig, create_router_with_rate_limit};
use finance_api::app::{AppState, AuthService, ExternalClients};
use finance_api::config::AppConfig;
use finance_api::infra::{
    GeminiClient, HttpBankClient, HttpClientConfig, HttpExchangeRateClient, PostgresClient,
    init_metrics, init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    let metrics = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed");
            None
        }
    };

    let db = PostgresClient::with_defaults(config.database_url.expose_secret())
        .await
        .context("failed to connect to database")?;
    db.run_migrations()
        .await
        .context("failed to run migrations")?;

    let http = HttpClientConfig {
        timeout: config.external_timeout,
    };
    let external = ExternalClients::new(
        Arc::new(HttpBankClient::new(&config.bank_api_url, &http)?),
        Arc::new(HttpExchangeRateClient::new(
            &config.exchange_rate_api_url,
            config.exchange_rate_api_key.clone(),
            &http,
        )?),
        Arc::new(GeminiClient::new(
            &config.gemini_api_url,
            config.gemini_api_key.clone(),
            &http,
        )?),
    );
    let auth = Arc::new(AuthService::new(&config.jwt_secret, config.jwt_ttl_secs)?);

    let mut state = AppState::new(Arc::new(db), auth, external);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let router = create_router_with_rate_limit(
        Arc::new(state),
        RateLimitConfig::new(config.rate_limit_rps, config.rate_limit_burst),
        config.frontend_url.as_deref(),
    );

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(address = %addr, "Server starting");
    info!("Swagger UI at http://{}/swagger-ui", addr);
    info!("GraphiQL at http://{}/graphql", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
