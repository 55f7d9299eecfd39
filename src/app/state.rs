//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::domain::DatabaseClient;

use super::auth::AuthService;
use super::service::{AppService, ExternalClients};

/// Shared application state for the Axum web server.
///
/// Built once at startup and immutable afterwards. All contained types are
/// wrapped in `Arc`, so cloning is cheap and the state is safe to share
/// across request tasks.
///
/// # Example
///
/// ```ignore
/// let db = Arc::new(PostgresClient::with_defaults(&database_url).await?);
/// let auth = Arc::new(AuthService::new(&config.jwt_secret, config.jwt_ttl_secs)?);
/// let state = Arc::new(AppState::new(db, auth, external_clients));
///
/// let router = create_router(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The application service containing business logic.
    pub service: Arc<AppService>,

    /// Token verification for the authorization middleware.
    pub auth: Arc<AuthService>,

    /// Prometheus render handle, present when the recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates the state and wires the `AppService` to the given clients.
    #[must_use]
    pub fn new(
        db_client: Arc<dyn DatabaseClient>,
        auth: Arc<AuthService>,
        external: ExternalClients,
    ) -> Self {
        let service = Arc::new(AppService::new(db_client, Arc::clone(&auth), external));
        Self {
            service,
            auth,
            metrics: None,
        }
    }

    /// Attaches the Prometheus handle served at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
