//! Application service layer.
//!
//! `AppService` holds the trait-object handles for persistence, auth and the
//! third-party adapters. Each resource adds its use cases in a submodule;
//! every operation takes the verified caller id from the API layer and
//! passes it down as the ownership filter.

mod budgets;
mod categories;
mod external;
mod profile;
mod savings;
mod transactions;
mod users;

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::domain::{
    AdvisorClient, AppError, BankClient, DatabaseClient, ExchangeRateClient, HealthResponse,
    HealthStatus, ValidationError,
};

use super::auth::AuthService;

/// Third-party service handles.
#[derive(Clone)]
pub struct ExternalClients {
    pub bank: Arc<dyn BankClient>,
    pub rates: Arc<dyn ExchangeRateClient>,
    pub advisor: Arc<dyn AdvisorClient>,
}

impl ExternalClients {
    #[must_use]
    pub fn new(
        bank: Arc<dyn BankClient>,
        rates: Arc<dyn ExchangeRateClient>,
        advisor: Arc<dyn AdvisorClient>,
    ) -> Self {
        Self {
            bank,
            rates,
            advisor,
        }
    }
}

/// Application service containing core business logic.
///
/// # Example
///
/// ```ignore
/// let db = Arc::new(PostgresClient::with_defaults(&url).await?);
/// let auth = Arc::new(AuthService::new(&secret, 3600)?);
/// let service = AppService::new(db, auth, external_clients);
///
/// let response = service.signup(&request).await?;
/// ```
pub struct AppService {
    db: Arc<dyn DatabaseClient>,
    auth: Arc<AuthService>,
    external: ExternalClients,
}

impl AppService {
    #[must_use]
    pub fn new(
        db: Arc<dyn DatabaseClient>,
        auth: Arc<AuthService>,
        external: ExternalClients,
    ) -> Self {
        Self { db, auth, external }
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Reports database reachability.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let db_health = match self.db.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Database health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(db_health)
    }
}

/// Wraps a field-level validation failure.
pub(crate) fn invalid(field: &str, message: impl Into<String>) -> AppError {
    AppError::Validation(ValidationError::field(field, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockDatabaseClient, test_service_with_db};

    #[tokio::test]
    async fn test_health_check_healthy() {
        let service = test_service_with_db(Arc::new(MockDatabaseClient::new()));
        let health = service.health_check().await;
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.database, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_health_check_unhealthy_database() {
        let db = Arc::new(MockDatabaseClient::new());
        db.set_healthy(false);
        let service = test_service_with_db(db);

        let health = service.health_check().await;
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.database, HealthStatus::Unhealthy);
    }
}
