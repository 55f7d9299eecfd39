//! Test utilities and mock implementations.
//!
//! This module provides reusable mock implementations of domain traits
//! and a [`TestContext`] that wires them into a working service.

pub mod mocks;

use std::sync::Arc;

use argon2::Params;
use secrecy::SecretString;

use crate::app::{AppService, AppState, AuthService, ExternalClients};
use crate::domain::{Caller, SignupRequest};

pub use mocks::{
    GROCERIES_CATEGORY_ID, MockAdvisorClient, MockBankClient, MockDatabaseClient,
    MockExchangeRateClient, SALARY_CATEGORY_ID,
};

/// Password used by [`TestContext::signup`].
pub const TEST_PASSWORD: &str = "password";

/// Auth service with a fixed secret and the cheapest Argon2 parameters.
#[must_use]
pub fn test_auth_service() -> Arc<AuthService> {
    let secret = SecretString::from("test-jwt-secret".to_string());
    let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
        .expect("minimum argon2 params are valid");
    Arc::new(AuthService::with_hash_params(&secret, 3600, params).expect("test auth service"))
}

/// Service over the given database and default external mocks.
#[must_use]
pub fn test_service_with_db(db: Arc<MockDatabaseClient>) -> AppService {
    TestContext::with_db(db).service_owned()
}

/// Mocks plus a service wired to them, shared by unit and router tests.
pub struct TestContext {
    pub db: Arc<MockDatabaseClient>,
    pub bank: Arc<MockBankClient>,
    pub rates: Arc<MockExchangeRateClient>,
    pub advisor: Arc<MockAdvisorClient>,
    pub auth: Arc<AuthService>,
    pub service: Arc<AppService>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_db(Arc::new(MockDatabaseClient::new()))
    }

    #[must_use]
    pub fn with_db(db: Arc<MockDatabaseClient>) -> Self {
        let bank = Arc::new(MockBankClient::new());
        let rates = Arc::new(MockExchangeRateClient::new());
        let advisor = Arc::new(MockAdvisorClient::new());
        let auth = test_auth_service();
        let external = ExternalClients::new(bank.clone(), rates.clone(), advisor.clone());
        let service = Arc::new(AppService::new(db.clone(), auth.clone(), external));
        Self {
            db,
            bank,
            rates,
            advisor,
            auth,
            service,
        }
    }

    fn external_clients(&self) -> ExternalClients {
        ExternalClients::new(
            self.bank.clone(),
            self.rates.clone(),
            self.advisor.clone(),
        )
    }

    fn service_owned(&self) -> AppService {
        AppService::new(self.db.clone(), self.auth.clone(), self.external_clients())
    }

    /// Router state backed by the same mocks.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(
            self.db.clone(),
            self.auth.clone(),
            self.external_clients(),
        ))
    }

    /// Signs up a user named "Test User" with [`TEST_PASSWORD`].
    pub async fn signup(&self, email: &str) -> Caller {
        let response = self
            .service
            .signup(&SignupRequest::new("Test User", email, TEST_PASSWORD))
            .await
            .expect("test signup");
        Caller {
            id: response.user.id,
            email: response.user.email,
        }
    }

    /// A valid bearer token for `caller`.
    #[must_use]
    pub fn token_for(&self, caller: &Caller) -> String {
        self.auth
            .issue_token(&caller.id, &caller.email)
            .expect("test token")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
